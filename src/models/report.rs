use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::domain::{OazaRecord, Position, Window};

/// Outcome of a congestion search, detached from the input records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CongestionReport {
    pub center: Position,
    pub count: usize,
    pub window: Window,
    #[serde(rename = "candidatesEvaluated")]
    pub candidates_evaluated: usize,
    pub records: Vec<OazaRecord>,
}

impl fmt::Display for CongestionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "latitude {}, longitude {}, oaza count {}",
            self.center.latitude, self.center.longitude, self.count
        )?;
        for record in &self.records {
            writeln!(
                f,
                "{}, {} ({}, {})",
                record.group, record.name, record.position.latitude, record.position.longitude
            )?;
        }
        Ok(())
    }
}
