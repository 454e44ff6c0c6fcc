// airguardian-radar/src/radar/service.rs
// GET /radar/aircraft

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{debug, error, warn};

use crate::auth::TokenCache;
use crate::errors::{FetchError, RadarError};
use crate::opensky::StateSource;
use crate::types::AircraftRecord;
use super::transform;

#[derive(Clone)]
pub struct RadarService {
    tokens: Arc<TokenCache>,
    source: Arc<dyn StateSource>,
}

impl RadarService {
    pub fn new(tokens: Arc<TokenCache>, source: Arc<dyn StateSource>) -> Self {
        Self { tokens, source }
    }

    /// Either the complete transformed list or an error, never a partial result
    pub async fn aircraft(&self) -> Result<Vec<AircraftRecord>, RadarError> {
        let token = self.tokens.get_valid_token().await?;
        let snapshot = match self.source.fetch_states(&token).await {
            Ok(snapshot) => snapshot,
            Err(FetchError::Status(401)) => {
                // token was revoked upstream, the next request starts with a fresh one
                warn!("⚠️  OpenSky rejected the access token, discarding it");
                self.tokens.invalidate().await;
                return Err(FetchError::Status(401).into());
            }
            Err(e) => return Err(e.into()),
        };

        let records = transform(&snapshot.states);
        debug!("Reporting {} airborne of {} aircraft", records.len(), snapshot.states.len());

        Ok(records)
    }
}

pub fn router(service: RadarService) -> Router {
    Router::new()
        .route("/radar/aircraft", get(get_aircraft))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(service)
}

async fn get_aircraft(State(service): State<RadarService>) -> Response {
    match service.aircraft().await {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            let status = StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                error!("❌ Radar request failed: {}", e);
            } else {
                warn!("⚠️  Passing upstream status {} to client", status);
            }
            status.into_response()
        }
    }
}

fn panic_response(_: Box<dyn Any + Send + 'static>) -> Response {
    error!("❌ Radar handler panicked");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
