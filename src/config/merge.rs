use std::path::PathBuf;

use super::yaml::YamlConfig;
use super::{ConfigError, ServerConfig, env};

/// Merge environment configuration (base) with optional YAML overrides.
pub(super) fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, ConfigError> {
    let mut config = env::load_from_env()?;

    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(limit) = server.max_upload_bytes {
            config.max_upload_bytes = limit;
        }
    }

    if let Some(analyzer) = yaml.analyzer {
        if let Some(backend) = analyzer.backend {
            config.analyzer_backend = backend;
        }
        if let Some(timeout) = analyzer.timeout_seconds {
            config.analyzer_timeout_seconds = timeout;
        }

        if let Some(process) = analyzer.process {
            if let Some(interpreter) = process.interpreter.filter(|s| !s.trim().is_empty()) {
                config.analyzer_interpreter = Some(interpreter);
            }
            if let Some(args) = process.interpreter_args {
                config.analyzer_interpreter_args = args;
            }
            if let Some(script) = process.script_path {
                config.analyzer_script_path = PathBuf::from(script);
            }
            if let Some(dir) = process.temp_dir {
                config.analyzer_temp_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(remote) = analyzer.remote {
            if let Some(host) = remote.host {
                config.analyzer_host = host;
            }
            if let Some(port) = remote.port {
                config.analyzer_port = Some(port);
            }
            if let Some(token) = remote.api_token.filter(|s| !s.trim().is_empty()) {
                config.analyzer_api_token = Some(token);
            }
        }
    }

    Ok(config)
}
