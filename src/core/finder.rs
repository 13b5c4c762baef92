use rayon::prelude::*;
use thiserror::Error;

use crate::core::{
    bounds::is_within_window,
    grid::{CandidateGrid, GridAxis},
};
use crate::models::{BoundingBox, CongestionReport, OazaRecord, Position, Window};

/// Errors that can occur when configuring a search
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("Invalid window: width and height must be finite and positive (got {width}, {height})")]
    InvalidWindow { width: f64, height: f64 },
}

/// Build a window whose half-extents are usable as grid steps
pub(crate) fn checked_window(width: f64, height: f64) -> Result<Window, SearchError> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !valid(width) || !valid(height) {
        return Err(SearchError::InvalidWindow { width, height });
    }
    Ok(Window { width, height })
}

/// Best candidate found by a search
///
/// `covered` borrows the input records, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<'a> {
    pub center: Position,
    pub covered: Vec<&'a OazaRecord>,
    pub window: Window,
    pub candidates_evaluated: usize,
}

impl SearchResult<'_> {
    pub fn count(&self) -> usize {
        self.covered.len()
    }
}

impl From<&SearchResult<'_>> for CongestionReport {
    fn from(result: &SearchResult<'_>) -> Self {
        CongestionReport {
            center: result.center,
            count: result.count(),
            window: result.window,
            candidates_evaluated: result.candidates_evaluated,
            records: result.covered.iter().map(|&record| record.clone()).collect(),
        }
    }
}

/// Best candidate within one latitude row
#[derive(Debug, Clone, Copy)]
struct RowBest {
    center: Position,
    count: usize,
    evaluated: usize,
}

/// Exhaustive grid search for the most congested point
///
/// Every grid candidate inside the bounding box is scored by the number of
/// records within its window. The window half-extents double as the grid
/// step, so candidates are spaced one half-extent apart on each axis.
#[derive(Debug, Clone, Copy)]
pub struct CongestionFinder {
    window: Window,
}

impl CongestionFinder {
    pub fn new(width: f64, height: f64) -> Result<Self, SearchError> {
        Ok(Self {
            window: checked_window(width, height)?,
        })
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Find the candidate covering the most records
    ///
    /// Candidates are visited latitude-major, both axes ascending, and the
    /// best is only replaced on a strictly larger count, so ties resolve to
    /// the first candidate visited. If no candidate covers anything the
    /// result is the zero position with an empty list.
    pub fn search<'a>(&self, records: &'a [OazaRecord], bounds: &BoundingBox) -> SearchResult<'a> {
        let grid = CandidateGrid::from_checked(*bounds, self.window);

        tracing::debug!(
            "Searching {} records over {:?} with window {:?}",
            records.len(),
            bounds,
            self.window
        );

        let mut best_center = Position::default();
        let mut best_covered: Vec<&'a OazaRecord> = Vec::new();
        let mut evaluated = 0;

        for center in grid.iter() {
            evaluated += 1;
            let covered = self.covered_by(records, &center);

            if covered.len() > best_covered.len() {
                tracing::trace!("New best at {:?}: {} records", center, covered.len());
                best_center = center;
                best_covered = covered;
            }
        }

        tracing::debug!(
            "Evaluated {} candidates, best covers {} records",
            evaluated,
            best_covered.len()
        );

        SearchResult {
            center: best_center,
            covered: best_covered,
            window: self.window,
            candidates_evaluated: evaluated,
        }
    }

    /// Same result as [`search`](Self::search), with latitude rows scored in parallel
    ///
    /// Each row keeps its first best longitude, and rows are merged by
    /// count then by row index, so ties still go to the earliest candidate.
    pub fn search_parallel<'a>(
        &self,
        records: &'a [OazaRecord],
        bounds: &BoundingBox,
    ) -> SearchResult<'a> {
        let grid = CandidateGrid::from_checked(*bounds, self.window);
        let latitudes: Vec<f64> = grid.latitudes().collect();

        tracing::debug!(
            "Searching {} records over {} latitude rows in parallel",
            records.len(),
            latitudes.len()
        );

        let rows: Vec<RowBest> = latitudes
            .par_iter()
            .map(|&lat| self.best_in_row(records, lat, grid.longitudes()))
            .collect();

        let evaluated: usize = rows.iter().map(|row| row.evaluated).sum();
        let best = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.count > 0)
            .max_by(|a, b| a.1.count.cmp(&b.1.count).then_with(|| b.0.cmp(&a.0)));

        let (center, covered) = match best {
            Some((_, row)) => (row.center, self.covered_by(records, &row.center)),
            None => (Position::default(), Vec::new()),
        };

        tracing::debug!(
            "Evaluated {} candidates, best covers {} records",
            evaluated,
            covered.len()
        );

        SearchResult {
            center,
            covered,
            window: self.window,
            candidates_evaluated: evaluated,
        }
    }

    fn best_in_row(&self, records: &[OazaRecord], lat: f64, longitudes: GridAxis) -> RowBest {
        let mut best = RowBest {
            center: Position::default(),
            count: 0,
            evaluated: 0,
        };

        for long in longitudes {
            best.evaluated += 1;
            let center = Position::new(lat, long);
            let count = self.count_covered(records, &center);
            if count > best.count {
                best.center = center;
                best.count = count;
            }
        }

        best
    }

    fn covered_by<'a>(&self, records: &'a [OazaRecord], center: &Position) -> Vec<&'a OazaRecord> {
        records
            .iter()
            .filter(|record| is_within_window(&record.position, center, &self.window))
            .collect()
    }

    fn count_covered(&self, records: &[OazaRecord], center: &Position) -> usize {
        records
            .iter()
            .filter(|record| is_within_window(&record.position, center, &self.window))
            .count()
    }
}
