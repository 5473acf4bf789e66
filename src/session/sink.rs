use anyhow::Result;
use async_trait::async_trait;

use crate::models::SessionRecord;

/// Receives the summary of every stopped session that recorded frames.
#[async_trait]
pub trait SessionSink: Send + Sync {
    /// Stores the record and returns its identifier.
    async fn persist(&self, record: &SessionRecord) -> Result<String>;
}
