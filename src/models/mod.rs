// Model exports
pub mod domain;
pub mod report;

pub use domain::{BoundingBox, OazaRecord, Position, Window};
pub use report::CongestionReport;
