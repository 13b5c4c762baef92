use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
///
/// No range validation is performed. The default value is the zero
/// position, which is also what a search returns when no candidate covers
/// any record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl From<Position> for geo::Coord<f64> {
    fn from(position: Position) -> Self {
        geo::coord! { x: position.longitude, y: position.latitude }
    }
}

impl From<geo::Coord<f64>> for Position {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self {
            latitude: coord.y,
            longitude: coord.x,
        }
    }
}

/// A named sub-municipal area (oaza) and its representative point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OazaRecord {
    /// Area label
    pub name: String,
    /// Containing municipality
    pub group: String,
    pub position: Position,
}

impl OazaRecord {
    pub fn new(name: impl Into<String>, group: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            position,
        }
    }
}

/// Axis-aligned rectangle spanned by a set of positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Position,
    pub max: Position,
}

impl BoundingBox {
    pub fn new(min: Position, max: Position) -> Self {
        Self { min, max }
    }

    pub fn lat_span(&self) -> f64 {
        self.max.latitude - self.min.latitude
    }

    pub fn long_span(&self) -> f64 {
        self.max.longitude - self.min.longitude
    }
}

/// Half-extents of the rectangular neighbourhood counted around a candidate
///
/// The same values are the grid step: latitude advances by `width`,
/// longitude by `height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub width: f64,
    pub height: f64,
}
