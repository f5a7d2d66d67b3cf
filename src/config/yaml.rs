use serde::Deserialize;
use std::path::PathBuf;

use super::{AnalyzerBackend, ConfigError};

/// Complete YAML configuration structure
///
/// This structure represents the full configuration that can be loaded from a YAML file.
/// All fields are optional to allow partial configuration. Values present here
/// override the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 3001
///   max_upload_bytes: 26214400
///
/// analyzer:
///   backend: process
///   timeout_seconds: 300
///   process:
///     interpreter: "python3"
///     interpreter_args: []
///     script_path: "scripts/analyze_tajwid.py"
///     temp_dir: "/var/tmp/tajwid"
///   remote:
///     host: "http://10.0.0.5"
///     port: 5000
///     api_token: "your-api-token"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub analyzer: Option<AnalyzerYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub max_upload_bytes: Option<usize>,
}

/// Analyzer configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AnalyzerYaml {
    pub backend: Option<AnalyzerBackend>,
    pub timeout_seconds: Option<u64>,
    pub process: Option<ProcessYaml>,
    pub remote: Option<RemoteYaml>,
}

/// Local-process analyzer settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProcessYaml {
    pub interpreter: Option<String>,
    pub interpreter_args: Option<Vec<String>>,
    pub script_path: Option<String>,
    pub temp_dir: Option<String>,
}

/// Remote analyzer settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RemoteYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub api_token: Option<String>,
}

impl YamlConfig {
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: YamlConfig =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }
}
