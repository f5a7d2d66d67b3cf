//! Configuration for the local-process analyzer.

use std::path::PathBuf;
use std::time::Duration;

use crate::config::ServerConfig;

/// Settings for spawning the external analyzer script.
#[derive(Debug, Clone)]
pub struct ProcessAnalyzerConfig {
    /// Program used to run the script
    pub interpreter: String,
    /// Arguments placed before the script path
    pub interpreter_args: Vec<String>,
    pub script_path: PathBuf,
    /// Directory in which recordings are staged
    pub temp_dir: PathBuf,
    /// Upper bound on one analyzer run
    pub timeout: Duration,
}

/// Interpreter used when none is configured: `py -3.13` on Windows,
/// `python` elsewhere.
pub fn default_interpreter() -> (String, Vec<String>) {
    if cfg!(windows) {
        ("py".to_string(), vec!["-3.13".to_string()])
    } else {
        ("python".to_string(), Vec::new())
    }
}

impl ProcessAnalyzerConfig {
    pub fn from_server_config(config: &ServerConfig) -> Self {
        let (interpreter, interpreter_args) = match &config.analyzer_interpreter {
            Some(interpreter) => (
                interpreter.clone(),
                config.analyzer_interpreter_args.clone(),
            ),
            None => {
                let (program, mut args) = default_interpreter();
                args.extend(config.analyzer_interpreter_args.iter().cloned());
                (program, args)
            }
        };

        Self {
            interpreter,
            interpreter_args,
            script_path: config.analyzer_script_path.clone(),
            temp_dir: config
                .analyzer_temp_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            timeout: Duration::from_secs(config.analyzer_timeout_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_interpreter_used_verbatim() {
        let mut config = ServerConfig::default();
        config.analyzer_interpreter = Some("/opt/venv/bin/python".to_string());
        config.analyzer_interpreter_args = vec!["-u".to_string()];
        config.analyzer_timeout_seconds = 42;

        let process = ProcessAnalyzerConfig::from_server_config(&config);
        assert_eq!(process.interpreter, "/opt/venv/bin/python");
        assert_eq!(process.interpreter_args, vec!["-u"]);
        assert_eq!(process.timeout, Duration::from_secs(42));
    }

    #[test]
    fn test_platform_default_interpreter() {
        let config = ServerConfig::default();
        let process = ProcessAnalyzerConfig::from_server_config(&config);

        let (program, args) = default_interpreter();
        assert_eq!(process.interpreter, program);
        assert_eq!(process.interpreter_args, args);
        assert_eq!(process.temp_dir, std::env::temp_dir());
    }
}
