use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `None` keeps todos in memory only.
    pub database_url: Option<String>,
    pub client_origin: String,
    pub port: u16,
    pub max_connections: u32,
    pub tls: Option<TlsPaths>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            client_origin: DEFAULT_CLIENT_ORIGIN.to_string(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            tls: None,
        }
    }
}

impl ServerConfig {
    /// Reads the process environment, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => defaults.port,
        };
        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => defaults.max_connections,
        };
        let tls = match (lookup("TLS_CERT_PATH"), lookup("TLS_KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            _ => anyhow::bail!("TLS_CERT_PATH and TLS_KEY_PATH must be set together"),
        };
        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            client_origin: lookup("CLIENT_ORIGIN").unwrap_or(defaults.client_origin),
            port,
            max_connections,
            tls,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        std::env::var("TODO_API_URL")
            .map(Self::new)
            .unwrap_or_default()
    }
}
