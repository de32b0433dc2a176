use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A finalized booking, handed to the submission sink. Contact fields are
/// already sanitized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingRecord {
    pub service_id: String,
    pub service_name: String,
    pub price: u32,
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub message: String,
}

impl BookingRecord {
    pub fn summary(&self) -> String {
        format!(
            "{} on {} at {} for {}",
            self.service_name,
            self.date.format("%Y-%m-%d"),
            self.time,
            self.name
        )
    }
}
