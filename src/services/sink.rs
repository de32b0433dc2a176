use async_trait::async_trait;

use crate::models::BookingRecord;

/// Receives finalized bookings. A deployment talking to a real booking API
/// plugs its client in here.
#[async_trait]
pub trait BookingSink: Send + Sync {
    async fn deliver(&self, record: &BookingRecord) -> anyhow::Result<()>;
}

/// Records bookings in the log and nothing else.
pub struct LogSink {
    business_name: String,
}

impl LogSink {
    pub fn new(business_name: String) -> Self {
        Self { business_name }
    }
}

#[async_trait]
impl BookingSink for LogSink {
    async fn deliver(&self, record: &BookingRecord) -> anyhow::Result<()> {
        tracing::info!(
            business = %self.business_name,
            service = %record.service_name,
            date = %record.date,
            time = %record.time,
            name = %record.name,
            phone = %record.phone,
            email = %record.email,
            message = %record.message,
            "reservation submitted"
        );
        Ok(())
    }
}
