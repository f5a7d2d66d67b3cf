pub mod analyzer;

// Re-export commonly used types for convenience
pub use analyzer::{
    AnalysisEvent, AnalysisPayload, AnalysisStream, Analyzer, AnalyzerError, AnalyzerResult,
    AudioSubmission, ProcessAnalyzer, RemoteAnalyzer, create_analyzer,
};
