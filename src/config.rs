//! Configuration management for shell-relay.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::ServerConfig;
use crate::cli::Args;
use crate::execution::{Shell, ShellExecutor};
use crate::session::SessionConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerSection,
    /// Session defaults.
    pub session: SessionSection,
    /// Command execution settings.
    pub execution: ExecutionSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8001,
        }
    }
}

/// Session configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Initial working directory for new sessions.
    pub default_working_dir: Option<PathBuf>,
    /// Maximum history entries per session (unbounded when absent or 0).
    pub history_limit: Option<usize>,
}

/// Execution configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSection {
    /// Shell name or program path (platform default when absent).
    pub shell: Option<String>,
    /// Per-command timeout in seconds (no timeout when absent).
    pub timeout_secs: Option<u64>,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_vars<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = var("SHELL_RELAY_HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("SHELL_RELAY_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(secs) = var("SHELL_RELAY_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.execution.timeout_secs = Some(secs).filter(|s| *s > 0);
        }

        if let Some(limit) = var("SHELL_RELAY_HISTORY_LIMIT").and_then(|s| s.parse().ok()) {
            self.session.history_limit = Some(limit).filter(|l| *l > 0);
        }

        if let Some(shell) = var("SHELL_RELAY_SHELL").filter(|s| !s.is_empty()) {
            self.execution.shell = Some(shell);
        }

        if let Some(level) = var("SHELL_RELAY_LOG_LEVEL").or_else(|| var("RUST_LOG")) {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = args.host {
            self.server.host = host.to_string();
        }
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if let Some(secs) = args.timeout_secs {
            self.execution.timeout_secs = Some(secs).filter(|s| *s > 0);
        }
        if let Some(limit) = args.history_limit {
            self.session.history_limit = Some(limit).filter(|l| *l > 0);
        }
        if let Some(ref dir) = args.working_dir {
            self.session.default_working_dir = Some(dir.clone());
        }
        if let Some(ref shell) = args.shell {
            self.execution.shell = Some(shell.clone());
        }
        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match args.config {
            Some(ref path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_env();
        config.apply_args(args);
        Ok(config)
    }

    /// Convert to ServerConfig for the API server.
    pub fn to_server_config(&self) -> Result<ServerConfig, ConfigError> {
        let host: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.server.host.clone()))?;
        Ok(ServerConfig::new(host.to_string(), self.server.port))
    }

    /// Defaults applied to every new session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            working_dir: self.session.default_working_dir.clone(),
            history_limit: self.session.history_limit.filter(|l| *l > 0),
        }
    }

    /// Build the shell executor described by this configuration.
    pub fn executor(&self) -> ShellExecutor {
        let shell = self
            .execution
            .shell
            .as_deref()
            .map(|s| s.parse::<Shell>().unwrap_or_default())
            .unwrap_or_default();
        ShellExecutor::new()
            .with_shell(shell)
            .with_timeout(self.execution.timeout_secs.map(Duration::from_secs))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON parsing error.
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid host address.
    #[error("invalid host address: {0}")]
    InvalidHost(String),
}

impl From<ConfigError> for crate::ShellRelayError {
    fn from(e: ConfigError) -> Self {
        crate::ShellRelayError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8001);
        assert!(config.session.history_limit.is_none());
        assert!(config.execution.timeout_secs.is_none());
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080 },
            "session": { "history_limit": 50, "default_working_dir": "/srv" },
            "execution": { "shell": "sh", "timeout_secs": 30 }
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.session.history_limit, Some(50));
        assert_eq!(config.session.default_working_dir, Some(PathBuf::from("/srv")));
        assert_eq!(config.execution.timeout_secs, Some(30));
    }

    #[test]
    fn test_config_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{ "server": { "port": 9000 } }"#).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_config_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ nope").unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_apply_vars() {
        let vars: HashMap<&str, &str> = [
            ("SHELL_RELAY_HOST", "10.0.0.1"),
            ("SHELL_RELAY_PORT", "7000"),
            ("SHELL_RELAY_TIMEOUT_SECS", "15"),
            ("SHELL_RELAY_HISTORY_LIMIT", "100"),
            ("RUST_LOG", "debug"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_vars(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 7000);
        assert_eq!(config.execution.timeout_secs, Some(15));
        assert_eq!(config.session.history_limit, Some(100));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_apply_vars_ignores_bad_port() {
        let mut config = Config::default();
        config.apply_vars(|key| (key == "SHELL_RELAY_PORT").then(|| "nope".to_string()));
        assert_eq!(config.server.port, 8001);
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        let args = Args {
            host: Some("192.168.1.1".parse().unwrap()),
            port: Some(5000),
            timeout_secs: Some(0),
            history_limit: Some(10),
            ..Args::default()
        };

        config.apply_args(&args);

        assert_eq!(config.server.host, "192.168.1.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.execution.timeout_secs, None);
        assert_eq!(config.session.history_limit, Some(10));
    }

    #[test]
    fn test_apply_args_keeps_unset_values() {
        let mut config = Config::default();
        config.server.port = 9999;
        config.apply_args(&Args::default());
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_to_server_config() {
        let server_config = Config::default().to_server_config().unwrap();
        assert_eq!(server_config.host, "127.0.0.1");
        assert_eq!(server_config.port, 8001);
    }

    #[test]
    fn test_invalid_host() {
        let mut config = Config::default();
        config.server.host = "not-an-ip".to_string();
        assert!(matches!(config.to_server_config(), Err(ConfigError::InvalidHost(_))));
    }

    #[test]
    fn test_executor_from_config() {
        let mut config = Config::default();
        config.execution.shell = Some("pwsh".into());
        config.execution.timeout_secs = Some(3);

        let executor = config.executor();
        assert_eq!(executor.shell(), &Shell::PowerShell);
        assert_eq!(executor.timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_history_limit_means_unbounded() {
        let mut config = Config::default();
        config.apply_vars(|key| (key == "SHELL_RELAY_HISTORY_LIMIT").then(|| "0".to_string()));
        assert_eq!(config.session.history_limit, None);

        config.apply_args(&Args {
            history_limit: Some(0),
            ..Args::default()
        });
        assert_eq!(config.session.history_limit, None);

        config.session.history_limit = Some(0);
        assert_eq!(config.session_config().history_limit, None);
    }

    #[test]
    fn test_session_config_from_config() {
        let mut config = Config::default();
        config.session.history_limit = Some(5);
        assert_eq!(config.session_config().history_limit, Some(5));
    }
}
