use geo::{BoundingRect, MultiPoint, Point};

use crate::models::{BoundingBox, OazaRecord, Position, Window};

/// Calculate the bounding box of all record positions
///
/// Component-wise minimum and maximum of latitude and longitude.
///
/// # Returns
/// `None` when `records` is empty, since no box is defined for zero points
pub fn bounding_box(records: &[OazaRecord]) -> Option<BoundingBox> {
    let points: MultiPoint<f64> = records
        .iter()
        .map(|record| Point::from(geo::Coord::from(record.position)))
        .collect();

    points
        .bounding_rect()
        .map(|rect| BoundingBox::new(rect.min().into(), rect.max().into()))
}

/// Check if a position lies inside the window centred on `center`
///
/// Both intervals are closed: a point exactly on an edge is inside.
/// Plain coordinate differences, no geodesic correction.
#[inline]
pub fn is_within_window(position: &Position, center: &Position, window: &Window) -> bool {
    center.latitude - window.width <= position.latitude
        && position.latitude <= center.latitude + window.width
        && center.longitude - window.height <= position.longitude
        && position.longitude <= center.longitude + window.height
}
