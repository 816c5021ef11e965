//! Server configuration read from `MKS_*` environment variables.

use std::time::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PURGE_INTERVAL_SECS: u64 = 1;

/// Errors raised while reading the environment
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a port number, got {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} must be a positive number of seconds, got {value:?}")]
    InvalidInterval { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    pub port: u16,
    /// Public base URL short links are built on, without a trailing `/`
    pub public_url: String,
    /// Whether the page shows entry count and uptime
    pub render_stats: bool,
    pub purge_interval: Duration,
}

impl ServerConfig {
    /// Reads:
    /// - `MKS_HOST` - bind address (defaults to "0.0.0.0")
    /// - `MKS_PORT` - bind port (defaults to 8080)
    /// - `MKS_URL` - public base URL (defaults to "http://localhost:<port>")
    /// - `MKS_SHOULD_RENDER_STATS` - "", "no", "false" or "0" disable stats
    /// - `MKS_PURGE_INTERVAL` - seconds between purges (defaults to 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("MKS_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port: u16 = match lookup("MKS_PORT").filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
                var: "MKS_PORT",
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let public_url = lookup("MKS_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        let render_stats = parse_flag(lookup("MKS_SHOULD_RENDER_STATS").as_deref());

        let purge_interval = match lookup("MKS_PURGE_INTERVAL").filter(|s| !s.trim().is_empty()) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidInterval {
                        var: "MKS_PURGE_INTERVAL",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS),
        };

        Ok(Self {
            host,
            port,
            public_url,
            render_stats,
            purge_interval,
        })
    }

    /// `host:port` to bind the listener to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full short URL for `slug`
    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.public_url, slug)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            public_url: format!("http://localhost:{}", DEFAULT_PORT),
            render_stats: false,
            purge_interval: Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS),
        }
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    let value = raw.unwrap_or("").trim().to_lowercase();
    !matches!(value.as_str(), "" | "no" | "false" | "0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_url, "http://localhost:8080");
        assert!(!config.render_stats);
        assert_eq!(config.purge_interval, Duration::from_secs(1));
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_reads_all_variables() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("MKS_HOST", "127.0.0.1"),
            ("MKS_PORT", "9000"),
            ("MKS_URL", "https://mks.lol/"),
            ("MKS_SHOULD_RENDER_STATS", "yes"),
            ("MKS_PURGE_INTERVAL", "30"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
        assert_eq!(config.public_url, "https://mks.lol");
        assert!(config.render_stats);
        assert_eq!(config.purge_interval, Duration::from_secs(30));
        assert_eq!(config.short_url("abc123"), "https://mks.lol/abc123");
    }

    #[test]
    fn test_default_public_url_follows_port() {
        let config = ServerConfig::from_lookup(lookup_from(&[("MKS_PORT", "3000")])).unwrap();
        assert_eq!(config.public_url, "http://localhost:3000");
    }

    #[test]
    fn test_render_stats_flag_values() {
        for off in ["", "no", "false", "0", "FALSE", "No"] {
            assert!(!parse_flag(Some(off)), "{:?} should disable stats", off);
        }
        for on in ["1", "true", "yes", "on", "anything"] {
            assert!(parse_flag(Some(on)), "{:?} should enable stats", on);
        }
        assert!(!parse_flag(None));
    }

    #[test]
    fn test_invalid_port_is_error() {
        let err = ServerConfig::from_lookup(lookup_from(&[("MKS_PORT", "eighty")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidPort {
                var: "MKS_PORT",
                value: "eighty".to_string()
            }
        );
        assert!(err.to_string().contains("MKS_PORT"));
    }

    #[test]
    fn test_zero_purge_interval_is_error() {
        let lookup = lookup_from(&[("MKS_PURGE_INTERVAL", "0")]);
        let err = ServerConfig::from_lookup(lookup).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInterval { .. }));
    }
}
