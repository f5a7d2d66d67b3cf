use super::{AnalyzerBackend, ConfigError, ServerConfig};
use crate::core::analyzer::remote::resolve_backend_base_url;

/// Validate a merged configuration before the server starts.
pub(super) fn validate(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("server host must not be empty".into()));
    }
    if config.max_upload_bytes == 0 {
        return Err(ConfigError::Validation(
            "max_upload_bytes must be greater than zero".into(),
        ));
    }
    if config.analyzer_timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "analyzer timeout_seconds must be greater than zero".into(),
        ));
    }

    match config.analyzer_backend {
        AnalyzerBackend::Process => {
            if config.analyzer_script_path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(
                    "analyzer script_path must not be empty for the process backend".into(),
                ));
            }
        }
        AnalyzerBackend::Remote => {
            resolve_backend_base_url(&config.analyzer_host, config.analyzer_port, config.port)
                .map_err(ConfigError::Validation)?;
        }
    }

    Ok(())
}
