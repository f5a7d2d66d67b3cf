//! Environment variable loading.
//!
//! Several remote-analyzer settings historically lived under different
//! variable names. Each setting lists its names in priority order; the first
//! non-empty value wins.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use super::{AnalyzerBackend, ConfigError, ServerConfig};

/// Variables consulted for the remote analyzer token, highest priority first
pub const API_TOKEN_ENV_VARS: [&str; 3] = ["X-API-TOKEN", "X_API_TOKEN", "API_TOKEN"];

const ANALYZER_HOST_ENV_VARS: [&str; 3] = ["ANALYZER_HOST", "BACKEND_IP", "IP"];
const ANALYZER_PORT_ENV_VARS: [&str; 3] = ["ANALYZER_PORT", "BACKEND_PORT", "API_PORT"];

/// Read the first non-empty (after trimming) value among `keys`.
fn first_env(keys: &[&str]) -> Option<(String, String)> {
    keys.iter().find_map(|key| {
        env::var(key)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(|value| (key.to_string(), value))
    })
}

fn env_string(key: &str) -> Option<String> {
    first_env(&[key]).map(|(_, value)| value)
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key) {
        Some(value) => parse_env(key, &value).map(Some),
        None => Ok(None),
    }
}

/// Resolve the remote analyzer token from the environment.
///
/// Returns `None` when none of [`API_TOKEN_ENV_VARS`] carries a value.
pub fn resolve_api_token_from_env() -> Option<String> {
    first_env(&API_TOKEN_ENV_VARS).map(|(_, value)| value)
}

/// Build a configuration from defaults overlaid with environment variables.
pub(super) fn load_from_env() -> Result<ServerConfig, ConfigError> {
    let mut config = ServerConfig::default();

    if let Some(host) = env_string("HOST") {
        config.host = host;
    }
    if let Some(port) = env_parsed::<u16>("PORT")? {
        config.port = port;
    }
    if let Some(limit) = env_parsed::<usize>("MAX_UPLOAD_BYTES")? {
        config.max_upload_bytes = limit;
    }

    if let Some(backend) = env_parsed::<AnalyzerBackend>("ANALYZER_BACKEND")? {
        config.analyzer_backend = backend;
    }
    if let Some(timeout) = env_parsed::<u64>("ANALYZER_TIMEOUT_SECONDS")? {
        config.analyzer_timeout_seconds = timeout;
    }

    config.analyzer_interpreter = env_string("PYTHON_EXECUTABLE");
    if let Some(script) = env_string("ANALYZER_SCRIPT_PATH") {
        config.analyzer_script_path = PathBuf::from(script);
    }
    config.analyzer_temp_dir = env_string("ANALYZER_TEMP_DIR").map(PathBuf::from);

    if let Some((_, host)) = first_env(&ANALYZER_HOST_ENV_VARS) {
        config.analyzer_host = host;
    }
    if let Some((key, port)) = first_env(&ANALYZER_PORT_ENV_VARS) {
        config.analyzer_port = Some(parse_env(&key, &port)?);
    }
    config.analyzer_api_token = resolve_api_token_from_env();

    Ok(config)
}
