mod base;
mod events;
pub mod process;
pub mod remote;
mod submission;

// Re-export public types and traits
pub use base::{
    AnalysisPayload, AnalysisStream, Analyzer, AnalyzerError, AnalyzerResult, one_shot_stream,
};
pub use events::AnalysisEvent;
pub use submission::{AudioSubmission, DEFAULT_AUDIO_EXTENSION, TempAudioFile, extension_for_mime};

pub use process::{ProcessAnalyzer, ProcessAnalyzerConfig};
pub use remote::{RemoteAnalyzer, RemoteAnalyzerConfig};

use std::sync::Arc;

use tracing::info;

use crate::config::{AnalyzerBackend, ServerConfig};

/// Factory function to create the configured analyzer backend
///
/// # Arguments
/// * `config` - Server configuration carrying the analyzer settings
///
/// # Returns
/// * `AnalyzerResult<Arc<dyn Analyzer>>` - The shared analyzer or a configuration error
///
/// # Examples
/// ```rust,no_run
/// use tajwid_gateway::ServerConfig;
/// use tajwid_gateway::core::analyzer::create_analyzer;
///
/// let config = ServerConfig::from_env().unwrap();
/// let analyzer = create_analyzer(&config).unwrap();
/// println!("using {} backend", analyzer.backend());
/// ```
pub fn create_analyzer(config: &ServerConfig) -> AnalyzerResult<Arc<dyn Analyzer>> {
    match config.analyzer_backend {
        AnalyzerBackend::Process => {
            let process = ProcessAnalyzerConfig::from_server_config(config);
            info!(
                interpreter = %process.interpreter,
                script = %process.script_path.display(),
                temp_dir = %process.temp_dir.display(),
                "Using local-process analyzer"
            );
            Ok(Arc::new(ProcessAnalyzer::new(process)))
        }
        AnalyzerBackend::Remote => {
            let remote = RemoteAnalyzerConfig::from_server_config(config)?;
            info!(
                base_url = %remote.base_url,
                token = remote.api_token.is_some(),
                "Using remote analyzer"
            );
            Ok(Arc::new(RemoteAnalyzer::new(remote)?))
        }
    }
}
