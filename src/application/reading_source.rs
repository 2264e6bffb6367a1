// Source the dashboard polls for the latest reading
use crate::domain::reading::Reading;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingSource: Send + Sync {
    /// Fetch the latest reading. Transport failures and malformed
    /// responses are both reported as errors.
    async fn fetch(&self) -> anyhow::Result<Reading>;
}
