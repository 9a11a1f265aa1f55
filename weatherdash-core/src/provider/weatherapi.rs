use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::{GeolocationError, WeatherError},
    model::{Coordinates, WeatherQuery, WeatherSnapshot},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";

/// WeatherAPI error code for "No matching location found."
const NO_MATCHING_LOCATION: u32 = 1006;

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, WeatherError> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    /// Approximate position of the caller's public IP (`ip.json?q=auto:ip`).
    pub async fn locate_by_ip(&self) -> Result<Coordinates, GeolocationError> {
        let res = self
            .http
            .get(self.endpoint("ip.json"))
            .query(&[("key", self.api_key.as_str()), ("q", "auto:ip")])
            .send()
            .await
            .map_err(|err| {
                tracing::debug!(error = %err, "IP lookup request failed");
                if err.is_timeout() {
                    GeolocationError::Timeout
                } else {
                    GeolocationError::Unavailable
                }
            })?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GeolocationError::PermissionDenied);
        }
        if !status.is_success() {
            tracing::debug!(%status, "IP lookup returned non-success status");
            return Err(GeolocationError::Unavailable);
        }

        let parsed: WaIpResponse = res.json().await.map_err(|err| {
            tracing::debug!(error = %err, "IP lookup body could not be parsed");
            GeolocationError::Unavailable
        })?;

        Ok(Coordinates::new(parsed.lat, parsed.lon))
    }
}

#[derive(Debug, Deserialize)]
struct WaIpResponse {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaError,
}

#[derive(Debug, Deserialize)]
struct WaError {
    code: u32,
    message: String,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_current(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, WeatherError> {
        let q = query.as_query();
        tracing::debug!(query = %q, "Requesting current conditions from WeatherAPI.com");

        let res = self
            .http
            .get(self.endpoint("current.json"))
            .query(&[("key", self.api_key.as_str()), ("q", q.as_str()), ("aqi", "no")])
            .send()
            .await
            .map_err(|e| {
                WeatherError::Network(format!("Failed to send request to WeatherAPI.com: {e}"))
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| WeatherError::Network(format!("Failed to read WeatherAPI response body: {e}")))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherError::Network(format!("Failed to parse WeatherAPI current JSON: {e}")))
    }
}

fn classify_failure(status: StatusCode, body: &str) -> WeatherError {
    match serde_json::from_str::<WaErrorBody>(body) {
        Ok(WaErrorBody { error }) if error.code == NO_MATCHING_LOCATION => {
            WeatherError::NotFound(error.message)
        }
        Ok(WaErrorBody { error }) => WeatherError::Network(format!(
            "WeatherAPI request failed with status {status}: {} (code {})",
            error.message, error.code
        )),
        Err(_) => WeatherError::Network(format!(
            "WeatherAPI request failed with status {status}: {}",
            truncate_body(body)
        )),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_recognised_by_error_code() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        let err = classify_failure(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, WeatherError::NotFound(ref m) if m == "No matching location found."));
    }

    #[test]
    fn other_api_errors_are_network_errors() {
        let body = r#"{"error":{"code":2006,"message":"API key is invalid."}}"#;
        let err = classify_failure(StatusCode::UNAUTHORIZED, body);
        assert!(matches!(err, WeatherError::Network(ref m) if m.contains("API key is invalid")));
    }

    #[test]
    fn html_error_pages_are_truncated() {
        let body = "x".repeat(500);
        let WeatherError::Network(msg) = classify_failure(StatusCode::BAD_GATEWAY, &body) else {
            panic!("expected network error");
        };
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 300);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let p = WeatherApiProvider::new("k".into()).with_base_url("http://localhost:9999/");
        assert_eq!(p.endpoint("current.json"), "http://localhost:9999/v1/current.json");
    }
}
