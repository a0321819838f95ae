use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

use scansheet_config::{constants, env_or, env_string};
use scansheet_storage::PoolSettings;

pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
    #[error("Static directory does not exist: {0}")]
    MissingStaticDir(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: PathBuf,
    pub max_connections: u32,
    pub cors_origin: String,
    /// Built client to serve at `/`; API only when unset
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = match env_string(constants::SCANSHEET_HOST) {
            Some(raw) => parse_host(&raw)?,
            None => IpAddr::from([127, 0, 0, 1]),
        };

        let port = match env_string(constants::SCANSHEET_PORT)
            .or_else(|| env_string(constants::PORT))
        {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        let database_path = env_string(constants::SCANSHEET_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(scansheet_core::database_file);

        let max_connections =
            env_or(constants::SCANSHEET_MAX_CONNECTIONS, DEFAULT_MAX_CONNECTIONS).max(1);

        let cors_origin = env_string(constants::SCANSHEET_CORS_ORIGIN)
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());

        let static_dir = env_string(constants::SCANSHEET_STATIC_DIR).map(PathBuf::from);

        Ok(Config {
            host,
            port,
            database_path,
            max_connections,
            cors_origin,
            static_dir,
        })
    }

    /// Apply command line flags on top of the environment
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        database_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            self.host = parse_host(&host)?;
        }
        if let Some(port) = port {
            if port == 0 {
                return Err(ConfigError::PortOutOfRange(port));
            }
            self.port = port;
        }
        if let Some(path) = database_path {
            self.database_path = path;
        }
        Ok(self)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings::new(&self.database_path).with_max_connections(self.max_connections)
    }

    pub fn cors_origin_header(&self) -> Result<HeaderValue, ConfigError> {
        self.cors_origin
            .parse::<HeaderValue>()
            .map_err(|_| ConfigError::InvalidCorsOrigin(self.cors_origin.clone()))
    }

    /// The static directory, checked to exist
    pub fn validated_static_dir(&self) -> Result<Option<PathBuf>, ConfigError> {
        match &self.static_dir {
            Some(dir) if !dir.is_dir() => Err(ConfigError::MissingStaticDir(dir.clone())),
            other => Ok(other.clone()),
        }
    }
}

fn parse_host(raw: &str) -> Result<IpAddr, ConfigError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("localhost") {
        return Ok(IpAddr::from([127, 0, 0, 1]));
    }
    raw.parse::<IpAddr>()
        .map_err(|_| ConfigError::InvalidHost(raw.to_string()))
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let port = raw.trim().parse::<u16>()?;

    // Validate port is in valid range
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(port)
}
