// Core algorithm exports
pub mod bounds;
pub mod finder;
pub mod grid;

pub use bounds::{bounding_box, is_within_window};
pub use finder::{CongestionFinder, SearchError, SearchResult};
pub use grid::{CandidateGrid, GridAxis};
