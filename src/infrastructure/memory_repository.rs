// In-memory single-slot reading store
use crate::application::reading_repository::ReadingRepository;
use crate::domain::reading::Reading;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryReadingRepository {
    slot: RwLock<Reading>,
}

impl MemoryReadingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReadingRepository for MemoryReadingRepository {
    async fn latest(&self) -> Result<Reading> {
        Ok(*self.slot.read().await)
    }

    async fn replace(&self, reading: Reading) -> Result<()> {
        *self.slot.write().await = reading;
        Ok(())
    }
}
