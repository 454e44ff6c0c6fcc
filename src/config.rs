use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use config::{Environment, File, FileFormat};
use tracing::{debug, info};

use crate::errors::ConfigError;

pub const CLIENT_ID_VAR: &str = "OPENSKY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "OPENSKY_CLIENT_SECRET";

const ENV_PREFIX: &str = "AIRGUARDIAN";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub opensky: OpenSkyConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenSkyConfig {
    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_states_url")]
    pub states_url: String,

    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Tokens are retired this many seconds before the provider's stated expiry
    #[serde(default = "default_token_refresh_margin_secs")]
    pub token_refresh_margin_secs: u64,
}

/// OAuth2 client credentials for the OpenSky identity provider
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

// serde only takes functions as field defaults
fn default_bind_addr() -> String { "0.0.0.0:8000".to_string() }
fn default_token_url() -> String {
    "https://auth.opensky-network.org/auth/realms/opensky-network/protocol/openid-connect/token".to_string()
}
fn default_states_url() -> String { "https://opensky-network.org/api/states/all".to_string() }
fn default_request_timeout_secs() -> u64 { 10 }
fn default_token_refresh_margin_secs() -> u64 { 60 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: default_bind_addr() }
    }
}

impl Default for OpenSkyConfig {
    fn default() -> Self {
        Self {
            token_url: default_token_url(),
            states_url: default_states_url(),
            client_id: None,
            client_secret: None,
            request_timeout_secs: default_request_timeout_secs(),
            token_refresh_margin_secs: default_token_refresh_margin_secs(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the config file and the process environment.
    /// An explicitly given `path` must exist, the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, std::env::vars().collect())
    }

    fn load_with_env(path: Option<&Path>, env: HashMap<String, String>) -> Result<Self, ConfigError> {
        let file_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);
        debug!("Reading configuration file {:?} (required: {})", file_path, path.is_some());

        let settings = config::Config::builder()
            .add_source(
                File::new(&file_path.to_string_lossy(), FileFormat::Toml).required(path.is_some()),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(env.clone())),
            )
            .set_override_option("opensky.client_id", env.get(CLIENT_ID_VAR).cloned())?
            .set_override_option("opensky.client_secret", env.get(CLIENT_SECRET_VAR).cloned())?
            .build()?;

        let config: Config = settings.try_deserialize()?;
        info!("📝 Configuration loaded (bind: {}, upstream: {})", config.server.bind_addr, config.opensky.states_url);

        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".airguardian")
            .join("config.toml")
    }

    /// Client credentials for the authenticated upstream; missing or empty values are a startup error
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let client_id = non_empty(&self.opensky.client_id).ok_or(ConfigError::MissingCredential(CLIENT_ID_VAR))?;
        let client_secret = non_empty(&self.opensky.client_secret).ok_or(ConfigError::MissingCredential(CLIENT_SECRET_VAR))?;

        Ok(Credentials { client_id, client_secret })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(self.server.bind_addr.clone()))
    }
}

impl OpenSkyConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn token_refresh_margin(&self) -> Duration {
        Duration::from_secs(self.token_refresh_margin_secs)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
