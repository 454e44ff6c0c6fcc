// airguardian-radar/src/auth/client.rs
// Client-credentials grant against the OpenSky identity provider

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::Credentials;
use crate::errors::AuthError;

/// Source of fresh access tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn request_token(&self) -> Result<TokenGrant, AuthError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,

    /// lifetime in seconds
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 { 3600 }

pub struct ClientCredentialsProvider {
    client: reqwest::Client,
    token_url: String,
    credentials: Credentials,
}

impl ClientCredentialsProvider {
    pub fn new(token_url: String, credentials: Credentials, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            token_url,
            credentials,
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn request_token(&self) -> Result<TokenGrant, AuthError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
        ];

        debug!("Requesting access token from {}", self.token_url);

        let response = self.client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("❌ Token request failed: {}", status);
            error!("   Response: {}", body);
            return Err(AuthError::Rejected { status: status.as_u16(), body });
        }

        let body = response.text().await?;
        let grant: TokenGrant = serde_json::from_str(&body)
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        if grant.access_token.is_empty() {
            return Err(AuthError::MalformedResponse("empty access_token".to_string()));
        }

        Ok(grant)
    }
}
