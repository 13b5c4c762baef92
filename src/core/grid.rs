use crate::core::finder::{checked_window, SearchError};
use crate::models::{BoundingBox, Position, Window};

/// Half-open range of candidate values along one axis
///
/// Values are produced by repeated addition from `start` and stop once the
/// running value reaches `end`, so `end` itself is never yielded and the
/// accumulated rounding matches a plain `value += step` loop.
#[derive(Debug, Clone, Copy)]
pub struct GridAxis {
    next: f64,
    end: f64,
    step: f64,
}

impl GridAxis {
    /// `step` must be strictly positive or iteration never terminates.
    pub(crate) fn new(start: f64, end: f64, step: f64) -> Self {
        debug_assert!(step > 0.0, "grid step must be positive");
        Self {
            next: start,
            end,
            step,
        }
    }
}

impl Iterator for GridAxis {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next < self.end {
            let value = self.next;
            self.next += self.step;
            Some(value)
        } else {
            None
        }
    }
}

/// Candidate centre points over a bounding box, in scan order
///
/// Latitude is the outer axis stepped by the window width, longitude the
/// inner axis stepped by the window height. Both ascend.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGrid {
    bounds: BoundingBox,
    window: Window,
}

impl CandidateGrid {
    /// Fails unless both window half-extents are finite and positive
    pub fn new(bounds: BoundingBox, window: Window) -> Result<Self, SearchError> {
        let window = checked_window(window.width, window.height)?;
        Ok(Self::from_checked(bounds, window))
    }

    /// `window` must already have passed [`checked_window`].
    pub(crate) fn from_checked(bounds: BoundingBox, window: Window) -> Self {
        Self { bounds, window }
    }

    pub fn latitudes(&self) -> GridAxis {
        GridAxis::new(
            self.bounds.min.latitude,
            self.bounds.max.latitude,
            self.window.width,
        )
    }

    pub fn longitudes(&self) -> GridAxis {
        GridAxis::new(
            self.bounds.min.longitude,
            self.bounds.max.longitude,
            self.window.height,
        )
    }

    /// Iterate every candidate, latitude-major
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.latitudes().flat_map(move |lat| {
            self.longitudes()
                .map(move |long| Position::new(lat, long))
        })
    }

    /// Number of candidates the scan visits
    pub fn len(&self) -> usize {
        self.latitudes().count() * self.longitudes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
