// Reading source that polls the retrieve endpoint over HTTP
use crate::application::reading_source::ReadingSource;
use crate::domain::reading::Reading;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpReadingSource {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Reading>,
}

impl HttpReadingSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ReadingSource for HttpReadingSource {
    async fn fetch(&self) -> Result<Reading> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to reach reading endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            anyhow::bail!("Reading endpoint returned {}", status);
        }

        let body = response
            .json::<RetrieveResponse>()
            .await
            .context("Failed to parse reading response")?;

        match body {
            RetrieveResponse {
                success: true,
                data: Some(reading),
            } => Ok(reading),
            _ => anyhow::bail!("Invalid reading response format"),
        }
    }
}
