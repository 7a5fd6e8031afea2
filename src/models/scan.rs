use serde::{Deserialize, Serialize};

/// Status value the platform reports for a finished scan.
pub const COMPLETED_STATUS: &str = "completed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub scan_id: u64,
    pub status: String,
    pub name: String,
}

impl ScanSummary {
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }
}
