//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BUYRECIPES_DATABASE_URL` - `SQLite` connection string
//!   (default: `sqlite://buy_recipes.db?mode=rwc`)
//! - `BUYRECIPES_HOST` - Bind address (default: 127.0.0.1)
//! - `BUYRECIPES_PORT` - Listen port (default: 3000)
//! - `BUYRECIPES_SEED` - Load sample data on startup when the catalog is
//!   empty (default: false)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://buy_recipes.db?mode=rwc";
const DEFAULT_PORT: u16 = 3000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection URL (may contain credentials)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Whether to load sample data on startup
    pub seed_on_startup: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is present but
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("BUYRECIPES_DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let host = parse_host(std::env::var("BUYRECIPES_HOST").ok().as_deref())?;
        let port = parse_port(std::env::var("BUYRECIPES_PORT").ok().as_deref())?;
        let seed_on_startup = parse_bool(std::env::var("BUYRECIPES_SEED").ok().as_deref())?;

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            seed_on_startup,
        })
    }

    /// The socket address to bind the listener to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_host(value: Option<&str>) -> Result<IpAddr, ConfigError> {
    match value {
        None => Ok(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar("BUYRECIPES_HOST".into(), raw.into())),
    }
}

fn parse_port(value: Option<&str>) -> Result<u16, ConfigError> {
    match value {
        None => Ok(DEFAULT_PORT),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar("BUYRECIPES_PORT".into(), raw.into())),
    }
}

fn parse_bool(value: Option<&str>) -> Result<bool, ConfigError> {
    match value {
        None | Some("false" | "0") => Ok(false),
        Some("true" | "1") => Ok(true),
        Some(raw) => Err(ConfigError::InvalidEnvVar(
            "BUYRECIPES_SEED".into(),
            raw.into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_defaults_to_localhost() {
        assert_eq!(
            parse_host(None).unwrap(),
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
        );
    }

    #[test]
    fn host_parses_explicit_address() {
        assert_eq!(
            parse_host(Some("0.0.0.0")).unwrap(),
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        );
        assert!(parse_host(Some("not-an-ip")).is_err());
    }

    #[test]
    fn port_defaults_and_parses() {
        assert_eq!(parse_port(None).unwrap(), 3000);
        assert_eq!(parse_port(Some("8080")).unwrap(), 8080);
        assert!(parse_port(Some("eighty")).is_err());
    }

    #[test]
    fn seed_flag_accepts_known_values() {
        assert!(!parse_bool(None).unwrap());
        assert!(parse_bool(Some("true")).unwrap());
        assert!(parse_bool(Some("1")).unwrap());
        assert!(!parse_bool(Some("false")).unwrap());
        assert!(parse_bool(Some("yes")).is_err());
    }
}
