use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    Checkin,
    Checkout,
}

impl CheckType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Checkin => "checkin",
            CheckType::Checkout => "checkout",
        }
    }
}

/// One gym check-in or check-out. The QR token is stored as scanned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceLog {
    pub id: Option<i64>,
    pub user_id: i64,
    pub check_type: CheckType,
    pub qr_token: String,
    pub timestamp: DateTime<Utc>,
}
