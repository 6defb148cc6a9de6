use crate::config::Config;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
}

pub struct GeoClient {
    client: Client,
    config: Config,
}

impl GeoClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Single-attempt lookup of the caller's coordinates. Unlike the
    /// forecast passthrough, a non-2xx status here is a failure.
    pub async fn lookup(&self) -> Result<Value, GeoError> {
        let response = self
            .client
            .get(&self.config.ipdata_base_url)
            .query(&[("api-key", self.config.ipdata_api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;
        Ok(data)
    }
}
