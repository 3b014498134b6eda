//! Core configuration types and loading.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use thiserror::Error;

use super::limits::LimitsConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Relay configuration.
///
/// Every section is optional; a missing file behaves like an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server identity and shared password.
    #[serde(default)]
    pub server: ServerConfig,
    /// Listening socket.
    #[serde(default)]
    pub listen: ListenConfig,
    /// Buffer, queue and timeout limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply command-line values on top of the file.
    pub fn with_overrides(
        mut self,
        port: Option<u16>,
        password: Option<String>,
        name: Option<String>,
    ) -> Self {
        if let Some(port) = port {
            self.listen.port = port;
        }
        if let Some(password) = password {
            self.server.password = Some(password);
        }
        if let Some(name) = name {
            self.server.name = name;
        }
        self
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Name used as the source of every numeric reply.
    #[serde(default = "default_server_name")]
    pub name: String,
    /// Password every client must present with PASS.
    #[serde(default)]
    pub password: Option<String>,
    /// Console log format.
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            password: None,
            log_format: LogFormat::default(),
        }
    }
}

fn default_server_name() -> String {
    "ircserv".to_string()
}

/// Console log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, colored when attached to a terminal.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Listening socket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Bind address (default: all interfaces).
    #[serde(default = "default_address")]
    pub address: IpAddr,
    /// TCP port (default: 6667).
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ListenConfig {
    /// Socket address to bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

fn default_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    6667
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.name, "ircserv");
        assert!(config.server.password.is_none());
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert_eq!(config.listen.port, 6667);
        assert_eq!(config.listen.socket_addr().to_string(), "0.0.0.0:6667");
    }

    #[test]
    fn sections_are_parsed() {
        let config: Config = toml::from_str(
            r#"
[server]
name = "relay.test"
password = "hunter2"
log_format = "json"

[listen]
address = "127.0.0.1"
port = 7000

[limits]
idle_timeout_secs = 60
"#,
        )
        .unwrap();

        assert_eq!(config.server.name, "relay.test");
        assert_eq!(config.server.password.as_deref(), Some("hunter2"));
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.listen.socket_addr().to_string(), "127.0.0.1:7000");
        assert_eq!(config.limits.idle_timeout_secs, 60);
        assert_eq!(config.limits.max_buffer, 4096);
    }

    #[test]
    fn overrides_win_over_file() {
        let config: Config = toml::from_str("[server]\npassword = \"file\"\n").unwrap();
        let config = config.with_overrides(Some(7001), Some("cli".into()), None);
        assert_eq!(config.listen.port, 7001);
        assert_eq!(config.server.password.as_deref(), Some("cli"));
        assert_eq!(config.server.name, "ircserv");
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nname = \"from.file\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.name, "from.file");
    }

    #[test]
    fn load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nname = ").unwrap();

        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = Config::load("/nonexistent/ircrelay.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
