//! Configuration module for the Tajwid gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//! The configuration is split into logical submodules for maintainability.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use tajwid_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

mod env;
mod merge;
mod validation;
mod yaml;

pub use env::{API_TOKEN_ENV_VARS, resolve_api_token_from_env};

/// Default listen port of the gateway itself
pub const DEFAULT_PORT: u16 = 3001;

/// Default upper bound for an uploaded recording (25 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Default wall-clock budget for one analyzer invocation
pub const DEFAULT_ANALYZER_TIMEOUT_SECONDS: u64 = 300;

/// Analyzer script invoked by the process backend when nothing else is configured
pub const DEFAULT_SCRIPT_PATH: &str = "scripts/analyze_tajwid.py";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse YAML config: {0}")]
    Parse(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Analyzer strategy, chosen once at startup
///
/// - `process`: spawn the external analyzer script for every submission
/// - `remote`: forward every submission to a remote analyzer service over HTTP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerBackend {
    #[default]
    Process,
    Remote,
}

impl AnalyzerBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerBackend::Process => "process",
            AnalyzerBackend::Remote => "remote",
        }
    }
}

impl fmt::Display for AnalyzerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalyzerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "process" | "local" | "local-process" => Ok(AnalyzerBackend::Process),
            "remote" | "http" | "remote-http" => Ok(AnalyzerBackend::Remote),
            other => Err(format!(
                "unknown analyzer backend '{other}' (expected 'process' or 'remote')"
            )),
        }
    }
}

/// Server configuration
///
/// Contains all configuration needed to run the gateway, including:
/// - Server settings (host, port, upload limit)
/// - Analyzer backend selection and timeout
/// - Local-process analyzer settings (interpreter, script, temp dir)
/// - Remote analyzer settings (host, port, API token)
///
/// The gateway's own listen port and the remote analyzer's port are distinct
/// fields and are never read from the same variable.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    /// Maximum accepted request body size for uploads, in bytes
    pub max_upload_bytes: usize,

    // Analyzer selection
    pub analyzer_backend: AnalyzerBackend,
    /// Wall-clock budget for a single analysis (process run or remote request)
    pub analyzer_timeout_seconds: u64,

    // Local-process analyzer
    /// Interpreter used to run the script; `None` selects the platform default
    pub analyzer_interpreter: Option<String>,
    /// Extra arguments placed between the interpreter and the script path
    pub analyzer_interpreter_args: Vec<String>,
    pub analyzer_script_path: PathBuf,
    /// Directory for staged recordings; `None` uses the OS temp directory
    pub analyzer_temp_dir: Option<PathBuf>,

    // Remote analyzer
    /// Bare host or URL of the remote analyzer service
    pub analyzer_host: String,
    /// Explicitly configured remote analyzer port
    pub analyzer_port: Option<u16>,
    /// Token sent as `X-API-TOKEN` to the remote analyzer
    pub analyzer_api_token: Option<String>,
}

/// Zeroize the remote analyzer token when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut token) = self.analyzer_api_token {
            token.zeroize();
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            analyzer_backend: AnalyzerBackend::Process,
            analyzer_timeout_seconds: DEFAULT_ANALYZER_TIMEOUT_SECONDS,
            analyzer_interpreter: None,
            analyzer_interpreter_args: Vec::new(),
            analyzer_script_path: PathBuf::from(DEFAULT_SCRIPT_PATH),
            analyzer_temp_dir: None,
            analyzer_host: "localhost".to_string(),
            analyzer_port: None,
            analyzer_api_token: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables only
    ///
    /// The `.env` file is expected to be loaded by the binary before this is
    /// called, so its values are visible as ordinary environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = merge::merge_config(None)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
