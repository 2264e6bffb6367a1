// Repository trait for the single-slot reading store
use crate::domain::reading::Reading;
use async_trait::async_trait;

#[async_trait]
pub trait ReadingRepository: Send + Sync {
    /// Current contents of the store. Zeros until the first ingest.
    async fn latest(&self) -> anyhow::Result<Reading>;

    /// Replace the stored reading wholesale. Last write wins.
    async fn replace(&self, reading: Reading) -> anyhow::Result<()>;
}
