use crate::config::Config;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
}

/// Upstream forecast reply: the parsed payload plus the status it arrived
/// with, so error payloads can pass through to the caller.
#[derive(Debug, Clone)]
pub struct Forecast {
    pub status: u16,
    pub ok: bool,
    pub payload: Value,
}

pub struct WeatherClient {
    client: Client,
    config: Config,
}

impl WeatherClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent(super::USER_AGENT)
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// One GET against the forecast endpoint, no retries. The body is parsed
    /// whatever the upstream status; only transport and parse failures error.
    pub async fn fetch_forecast(&self, q: &str) -> Result<Forecast, WeatherError> {
        let url = format!(
            "{}{}",
            self.config.weatherapi_base_url, self.config.weatherapi_forecast_path
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.weatherapi_api_key.as_str()),
                ("q", q),
                ("days", "3"),
                ("aqi", "yes"),
                ("alerts", "yes"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let payload: Value = serde_json::from_str(&body)?;

        Ok(Forecast {
            status: status.as_u16(),
            ok: status.is_success(),
            payload,
        })
    }
}
