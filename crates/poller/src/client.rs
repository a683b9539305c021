//! HTTP client for the rig firmware API.

use std::time::Duration;

use async_trait::async_trait;

use stillwatch_core::reading::TemperatureReading;

use crate::wire::TemperatureResponse;
use crate::{PollError, ReadingSource};

/// Timeout for a single firmware request. The firmware answers from RAM, so
/// anything slower than this is effectively down.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Polls `GET {base_url}/api/temperatures` on the rig firmware.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the firmware at `base_url`
    /// (e.g. `http://192.168.7.75`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client builds with static options");
        Self {
            base_url: normalize(base_url.into()),
            http,
        }
    }

    /// Point the client at a different firmware address.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = normalize(base_url.into());
    }

    /// Probe the firmware with a single request.
    pub async fn test_connection(&self) -> bool {
        match self.http.get(self.endpoint()).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Fetch and decode the current temperatures.
    pub async fn fetch_temperatures(&self) -> Result<Vec<TemperatureReading>, PollError> {
        let response = self.http.get(self.endpoint()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }

        let body: TemperatureResponse = response
            .json()
            .await
            .map_err(|e| PollError::Malformed(e.to_string()))?;
        Ok(body.into_readings())
    }

    fn endpoint(&self) -> String {
        format!("{}/api/temperatures", self.base_url)
    }
}

fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[async_trait]
impl ReadingSource for ApiClient {
    async fn fetch(&mut self) -> Result<Vec<TemperatureReading>, PollError> {
        self.fetch_temperatures().await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_cleanly_with_and_without_trailing_slash() {
        let client = ApiClient::new("http://192.168.7.75");
        assert_eq!(client.endpoint(), "http://192.168.7.75/api/temperatures");

        let client = ApiClient::new("http://192.168.7.75/");
        assert_eq!(client.endpoint(), "http://192.168.7.75/api/temperatures");
    }

    #[test]
    fn set_base_url_redirects_subsequent_requests() {
        let mut client = ApiClient::new("http://192.168.7.75");
        client.set_base_url("http://10.0.0.42/");
        assert_eq!(client.endpoint(), "http://10.0.0.42/api/temperatures");
    }
}
