// airguardian-radar/src/auth/token_cache.rs
// Process-wide bearer token, refreshed on demand once expired

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

use super::TokenProvider;
use crate::errors::AuthError;

// longer grants are retired after a day
const MAX_TOKEN_LIFETIME_SECS: u64 = 86_400;

#[derive(Debug, Clone, Default)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>, // epoch until the first refresh
}

pub struct TokenCache {
    provider: Arc<dyn TokenProvider>,
    refresh_margin: chrono::Duration,
    cached: RwLock<CachedToken>,
}

impl TokenCache {
    pub fn new(provider: Arc<dyn TokenProvider>, refresh_margin: Duration) -> Self {
        Self {
            provider,
            refresh_margin: chrono::Duration::from_std(refresh_margin).unwrap_or_else(|_| chrono::Duration::zero()),
            cached: RwLock::new(CachedToken::default()),
        }
    }

    /// Return the cached token while `now < expires_at`, otherwise fetch and store a new one.
    /// A failed refresh leaves the cache untouched.
    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        {
            let cached = self.cached.read().await;
            if Utc::now() < cached.expires_at {
                return Ok(cached.access_token.clone());
            }
        }

        // No lock is held across the refresh. Callers that find the token expired at the same
        // time each request a grant and the last write wins; every grant is valid on its own.
        info!("🔄 Access token expired or missing, fetching new token...");
        let grant = self.provider.request_token().await?;

        let lifetime = chrono::Duration::seconds(grant.expires_in.min(MAX_TOKEN_LIFETIME_SECS) as i64);
        let expires_at = Utc::now() + lifetime - self.refresh_margin;

        *self.cached.write().await = CachedToken {
            access_token: grant.access_token.clone(),
            expires_at,
        };

        info!("✅ OpenSky token obtained (expires in {}s)", grant.expires_in);
        Ok(grant.access_token)
    }

    /// Force the next `get_valid_token` to refresh
    pub async fn invalidate(&self) {
        self.cached.write().await.expires_at = DateTime::<Utc>::default();
    }
}
