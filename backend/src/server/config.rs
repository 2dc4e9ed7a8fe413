//! Server settings loaded via OrthoConfig and the resolved server
//! configuration derived from them.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use notes_backend::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;
const DEFAULT_WS_ORIGINS: &str = "http://localhost:4200";
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Raw settings layered from CLI flags, `NOTES_*` variables, and files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NOTES")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// HMAC secret for bearer tokens.
    pub token_secret: Option<String>,
    /// Token lifetime in minutes.
    pub token_ttl_minutes: Option<i64>,
    /// Comma-separated origins allowed to open `/hub`.
    pub ws_allowed_origins: Option<String>,
}

/// Configuration problems that abort start-up.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address `{value}`: {message}")]
    BindAddr { value: String, message: String },
    #[error("invalid WebSocket origin `{value}`: {message}")]
    Origin { value: String, message: String },
    #[error("token TTL must be positive, got {0} minutes")]
    TokenTtl(i64),
    #[error("NOTES_TOKEN_SECRET must be set in release builds")]
    MissingTokenSecret,
}

impl From<ConfigError> for std::io::Error {
    fn from(value: ConfigError) -> Self {
        std::io::Error::other(value.to_string())
    }
}

/// Fully resolved configuration for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) database: Option<PoolConfig>,
    pub(crate) token_secret: Vec<u8>,
    pub(crate) token_ttl: chrono::Duration,
    pub(crate) allowed_origins: Vec<Url>,
}

impl ServerConfig {
    /// Validate `settings` and apply defaults.
    pub fn from_settings(settings: ServerSettings) -> Result<Self, ConfigError> {
        let raw_addr = settings.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw_addr.parse().map_err(|err: std::net::AddrParseError| {
            ConfigError::BindAddr {
                value: raw_addr.to_owned(),
                message: err.to_string(),
            }
        })?;

        let database = settings.database_url.map(|url| {
            let config = PoolConfig::new(url);
            match settings.db_max_connections {
                Some(max) => config.with_max_size(max),
                None => config,
            }
        });

        let ttl_minutes = settings
            .token_ttl_minutes
            .unwrap_or(DEFAULT_TOKEN_TTL_MINUTES);
        if ttl_minutes <= 0 {
            return Err(ConfigError::TokenTtl(ttl_minutes));
        }

        let token_secret = match settings.token_secret.filter(|s| !s.trim().is_empty()) {
            Some(secret) => secret.into_bytes(),
            None if cfg!(debug_assertions) => {
                warn!("NOTES_TOKEN_SECRET not set; using an ephemeral secret (dev only)");
                ephemeral_secret()
            }
            None => return Err(ConfigError::MissingTokenSecret),
        };

        let allowed_origins = parse_origins(
            settings
                .ws_allowed_origins
                .as_deref()
                .unwrap_or(DEFAULT_WS_ORIGINS),
        )?;

        Ok(Self {
            bind_addr,
            database,
            token_secret,
            token_ttl: chrono::Duration::minutes(ttl_minutes),
            allowed_origins,
        })
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

fn ephemeral_secret() -> Vec<u8> {
    use rand::RngCore;

    let mut secret = vec![0_u8; EPHEMERAL_SECRET_LEN];
    rand::thread_rng().fill_bytes(&mut secret);
    secret
}

fn parse_origins(raw: &str) -> Result<Vec<Url>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            Url::parse(value).map_err(|err| ConfigError::Origin {
                value: value.to_owned(),
                message: err.to_string(),
            })
        })
        .collect()
}
