// airguardian-radar/src/opensky/client.rs
// HTTP client for the bounding-box filtered states endpoint

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::errors::FetchError;
use crate::types::Snapshot;

const RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
const RATE_LIMIT_RETRY_AFTER: &str = "x-rate-limit-retry-after-seconds";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lamin: f64,
    pub lamax: f64,
    pub lomin: f64,
    pub lomax: f64,
}

/// Finland and surrounding airspace (~400,000 km², 4 API credits per request)
pub const FINLAND_BBOX: BoundingBox = BoundingBox {
    lamin: 59.5,
    lamax: 70.0,
    lomin: 19.5,
    lomax: 31.5,
};

impl BoundingBox {
    pub fn query(&self) -> String {
        format!(
            "lamin={:.1}&lamax={:.1}&lomin={:.1}&lomax={:.1}",
            self.lamin, self.lamax, self.lomin, self.lomax
        )
    }
}

/// Anything that can produce a state snapshot for a bearer token
#[async_trait]
pub trait StateSource: Send + Sync {
    async fn fetch_states(&self, token: &str) -> Result<Snapshot, FetchError>;
}

pub struct OpenSkyClient {
    client: reqwest::Client,
    states_url: String,
}

impl OpenSkyClient {
    pub fn new(states_url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { client, states_url })
    }

    fn request_url(&self) -> String {
        format!("{}?{}", self.states_url, FINLAND_BBOX.query())
    }
}

#[async_trait]
impl StateSource for OpenSkyClient {
    async fn fetch_states(&self, token: &str) -> Result<Snapshot, FetchError> {
        let response = self.client
            .get(self.request_url())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();

        // observed only, never enforced
        if let Some(remaining) = header_value(response.headers(), RATE_LIMIT_REMAINING) {
            debug!("📊 OpenSky credits remaining: {}", remaining);
        }

        if !status.is_success() {
            let retry_after = header_value(response.headers(), RATE_LIMIT_RETRY_AFTER)
                .or_else(|| header_value(response.headers(), RETRY_AFTER.as_str()));

            match retry_after {
                Some(secs) => warn!("⚠️  OpenSky request failed with {} (retry after {}s)", status, secs),
                None => warn!("⚠️  OpenSky request failed with {}", status),
            }

            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let snapshot: Snapshot = serde_json::from_str(&body)
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        info!("✈️  Fetched {} state vectors from OpenSky (time: {})", snapshot.states.len(), snapshot.time);
        Ok(snapshot)
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::spawn_mock;
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn client(base_url: &str) -> OpenSkyClient {
        OpenSkyClient::new(format!("{}/api/states/all", base_url), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_bbox_query() {
        assert_eq!(FINLAND_BBOX.query(), "lamin=59.5&lamax=70.0&lomin=19.5&lomax=31.5");
    }

    #[tokio::test]
    async fn test_authenticated_bbox_request() {
        let router = Router::new().route(
            "/api/states/all",
            get(|headers: HeaderMap, Query(query): Query<HashMap<String, String>>| async move {
                let authorized = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    == Some("Bearer token-1");
                let bbox = query.get("lamin").map(String::as_str) == Some("59.5")
                    && query.get("lamax").map(String::as_str) == Some("70.0")
                    && query.get("lomin").map(String::as_str) == Some("19.5")
                    && query.get("lomax").map(String::as_str) == Some("31.5");

                if !(authorized && bbox) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }

                (
                    [("x-rate-limit-remaining", "3996")],
                    Json(json!({
                        "time": 1698500000,
                        "states": [
                            ["4601f5", "FIN6HT  ", "Finland", 1698500000, 1698500000, 24.9, 60.2, 500.0, false, 150.0, 45.6, 0.0, null, 510.0, "1200", false, 0]
                        ]
                    })),
                )
                    .into_response()
            }),
        );
        let base_url = spawn_mock(router).await;

        let snapshot = client(&base_url).fetch_states("token-1").await.unwrap();
        assert_eq!(snapshot.time, 1698500000);
        assert_eq!(snapshot.states.len(), 1);
        assert_eq!(snapshot.states[0].icao24, "4601f5");
    }

    #[tokio::test]
    async fn test_failure_status_is_returned() {
        let router = Router::new().route(
            "/api/states/all",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, [("x-rate-limit-retry-after-seconds", "120")], "") }),
        );
        let base_url = spawn_mock(router).await;

        assert!(matches!(
            client(&base_url).fetch_states("token-1").await,
            Err(FetchError::Status(429))
        ));
    }

    #[tokio::test]
    async fn test_forbidden_is_returned() {
        let router = Router::new().route("/api/states/all", get(|| async { StatusCode::FORBIDDEN }));
        let base_url = spawn_mock(router).await;

        assert!(matches!(
            client(&base_url).fetch_states("token-1").await,
            Err(FetchError::Status(403))
        ));
    }

    #[tokio::test]
    async fn test_null_states_is_empty_snapshot() {
        let router = Router::new().route(
            "/api/states/all",
            get(|| async { Json(json!({"time": 1698500000, "states": null})) }),
        );
        let base_url = spawn_mock(router).await;

        let snapshot = client(&base_url).fetch_states("token-1").await.unwrap();
        assert!(snapshot.states.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let router = Router::new().route("/api/states/all", get(|| async { "{\"time\": " }));
        let base_url = spawn_mock(router).await;

        assert!(matches!(
            client(&base_url).fetch_states("token-1").await,
            Err(FetchError::Parse(_))
        ));
    }
}
