// airguardian-radar/src/errors.rs
// Error types for each layer; only the radar endpoint maps them to HTTP status codes

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration value {0} (set it in the environment or the config file)")]
    MissingCredential(&'static str),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid bind address '{0}'")]
    InvalidBindAddr(String),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token endpoint rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed token response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-success status from the states endpoint, passed through to the caller
    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed upstream response: {0}")]
    Parse(String),
}

#[derive(Debug, Error)]
pub enum RadarError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl RadarError {
    /// HTTP status the endpoint answers with for this failure
    pub fn status(&self) -> u16 {
        match self {
            RadarError::Fetch(FetchError::Status(status)) => *status,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_passes_through() {
        assert_eq!(RadarError::from(FetchError::Status(403)).status(), 403);
        assert_eq!(RadarError::from(FetchError::Status(429)).status(), 429);
    }

    #[test]
    fn test_other_failures_map_to_500() {
        let auth = AuthError::Rejected { status: 401, body: "bad client".to_string() };
        assert_eq!(RadarError::from(auth).status(), 500);
        assert_eq!(RadarError::from(FetchError::Parse("eof".to_string())).status(), 500);
        assert_eq!(
            RadarError::from(AuthError::MalformedResponse("no access_token".to_string())).status(),
            500
        );
    }
}
