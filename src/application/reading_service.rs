// Reading service - Use cases for ingesting and retrieving the latest reading
use crate::application::reading_repository::ReadingRepository;
use crate::domain::reading::{Reading, ReadingValidationError};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

/// A reading as held by the store, stamped with the server time of the call.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReading {
    pub reading: Reading,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("invalid reading: {0}")]
    Invalid(#[from] ReadingValidationError),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct ReadingService {
    repository: Arc<dyn ReadingRepository>,
}

impl ReadingService {
    pub fn new(repository: Arc<dyn ReadingRepository>) -> Self {
        Self { repository }
    }

    /// Validate and store a reading. The store is left untouched on invalid input.
    pub async fn ingest(&self, payload: &Value) -> Result<StoredReading, IngestError> {
        let reading = Reading::from_payload(payload)?;
        self.repository.replace(reading).await?;

        tracing::info!(
            voltage1 = reading.voltage1,
            current1 = reading.current1,
            voltage2 = reading.voltage2,
            current2 = reading.current2,
            "Reading ingested"
        );

        Ok(StoredReading {
            reading,
            timestamp: Utc::now(),
        })
    }

    pub async fn retrieve(&self) -> anyhow::Result<StoredReading> {
        let reading = self.repository.latest().await?;
        Ok(StoredReading {
            reading,
            timestamp: Utc::now(),
        })
    }
}
