use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::analyzer::{Analyzer, AnalyzerResult, create_analyzer};

/// Application state shared by all request handlers
pub struct AppState {
    pub config: ServerConfig,
    /// Analyzer backend selected at startup
    pub analyzer: Arc<dyn Analyzer>,
}

impl AppState {
    /// Build state with the analyzer selected by `config`.
    pub fn new(config: ServerConfig) -> AnalyzerResult<Arc<Self>> {
        let analyzer = create_analyzer(&config)?;
        Ok(Self::with_analyzer(config, analyzer))
    }

    /// Build state around an already constructed analyzer.
    pub fn with_analyzer(config: ServerConfig, analyzer: Arc<dyn Analyzer>) -> Arc<Self> {
        Arc::new(Self { config, analyzer })
    }
}
