use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Scanned,
    NotScanned,
}

/// One raw scan as kept in the local ticket log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub qr_code: String,
    pub status: ScanStatus,
}

impl ScanRecord {
    pub fn scanned(qr_code: impl Into<String>) -> Self {
        Self {
            qr_code: qr_code.into(),
            status: ScanStatus::Scanned,
        }
    }
}
