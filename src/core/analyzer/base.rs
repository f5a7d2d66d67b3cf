//! Base trait and types for tajwid analyzer backends.
//!
//! Every backend accepts one [`AudioSubmission`] and produces either a single
//! JSON document ([`Analyzer::analyze`]) or an ordered event stream
//! ([`Analyzer::analyze_stream`]). The external analyzer's output is opaque to
//! the gateway and is relayed without re-encoding.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use thiserror::Error;

use super::events::AnalysisEvent;
use super::submission::AudioSubmission;
use crate::config::AnalyzerBackend;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while running an analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The submission is unusable (e.g. no audio field)
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// The recording could not be staged on disk
    #[error("Failed to stage audio file: {0}")]
    TempFile(String),

    /// The analyzer process could not be started
    #[error("Failed to start analyzer: {0}")]
    SpawnFailed(String),

    /// The analyzer process exited unsuccessfully
    #[error("Analyzer exited with code {code:?}")]
    ProcessFailed { code: Option<i32>, details: String },

    /// The analyzer finished but its output is not a JSON document
    #[error("Analyzer produced invalid output")]
    InvalidOutput { details: String },

    /// The analysis exceeded its wall-clock budget
    #[error("Analyzer timed out after {0} seconds")]
    Timeout(u64),

    /// The remote analyzer answered with a non-success status
    #[error("Analyzer service error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The remote analyzer could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

// =============================================================================
// Payload
// =============================================================================

/// A JSON document produced by the external analyzer.
///
/// Holds the analyzer's bytes exactly as received (minus surrounding
/// whitespace); construction only checks that they form one JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPayload(Bytes);

impl AnalysisPayload {
    /// Validate `raw` as a single JSON document.
    pub fn parse(raw: impl Into<Bytes>) -> Result<Self, serde_json::Error> {
        let raw: Bytes = raw.into();
        let start = raw
            .iter()
            .position(|b| !b.is_ascii_whitespace())
            .unwrap_or(raw.len());
        let end = raw
            .iter()
            .rposition(|b| !b.is_ascii_whitespace())
            .map_or(start, |i| i + 1);
        let trimmed = raw.slice(start..end);

        serde_json::from_slice::<serde::de::IgnoredAny>(&trimmed)?;
        Ok(Self(trimmed))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The payload as text. Valid JSON is always valid UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

// =============================================================================
// Analyzer Trait
// =============================================================================

/// Stream of analysis events for one submission.
pub type AnalysisStream = BoxStream<'static, AnalysisEvent>;

/// A tajwid analyzer backend.
///
/// Implementations own the full lifecycle of one submission: staging,
/// invocation, and release of any resource tied to it.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Which backend this is.
    fn backend(&self) -> AnalyzerBackend;

    /// Run one analysis and return the analyzer's JSON document.
    async fn analyze(&self, submission: AudioSubmission) -> AnalyzerResult<AnalysisPayload>;

    /// Run one analysis and report progress as events.
    ///
    /// The returned stream always begins with `start` and ends with exactly
    /// one `done`. Errors returned here happen before the stream opens.
    ///
    /// The default implementation wraps [`Analyzer::analyze`] for backends
    /// that only produce a final document.
    async fn analyze_stream(&self, submission: AudioSubmission) -> AnalyzerResult<AnalysisStream> {
        let outcome = self.analyze(submission).await;
        Ok(one_shot_stream(outcome))
    }
}

/// Frame a single outcome as `start`, `result`/`error`, `done`.
pub fn one_shot_stream(outcome: AnalyzerResult<AnalysisPayload>) -> AnalysisStream {
    let (body, code) = match outcome {
        Ok(payload) => (AnalysisEvent::Result(payload), Some(0)),
        Err(e) => (
            AnalysisEvent::Error {
                message: e.to_string(),
            },
            None,
        ),
    };

    stream::iter([AnalysisEvent::Start, body, AnalysisEvent::Done { code }]).boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_trims_surrounding_whitespace() {
        let payload = AnalysisPayload::parse("\n  {\"score_percent\": 85.5}\n").unwrap();
        assert_eq!(payload.as_str(), "{\"score_percent\": 85.5}");
    }

    #[test]
    fn test_payload_keeps_bytes_verbatim() {
        let raw = "{\"b\":1,  \"a\":[1,2]}";
        let payload = AnalysisPayload::parse(raw).unwrap();
        // No re-serialization: key order and spacing survive
        assert_eq!(payload.as_bytes(), raw.as_bytes());
    }

    #[test]
    fn test_payload_rejects_non_json() {
        assert!(AnalysisPayload::parse("Loading model...").is_err());
        assert!(AnalysisPayload::parse("").is_err());
        assert!(AnalysisPayload::parse("{\"a\":1}\n{\"b\":2}").is_err());
    }

    #[tokio::test]
    async fn test_one_shot_stream_success() {
        let payload = AnalysisPayload::parse("{\"status\":\"ok\"}").unwrap();
        let events: Vec<_> = one_shot_stream(Ok(payload.clone())).collect().await;

        assert_eq!(
            events,
            vec![
                AnalysisEvent::Start,
                AnalysisEvent::Result(payload),
                AnalysisEvent::Done { code: Some(0) },
            ]
        );
    }

    #[tokio::test]
    async fn test_one_shot_stream_failure() {
        let events: Vec<_> = one_shot_stream(Err(AnalyzerError::Timeout(5)))
            .collect()
            .await;

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], AnalysisEvent::Start);
        assert!(matches!(events[1], AnalysisEvent::Error { .. }));
        assert_eq!(events[2], AnalysisEvent::Done { code: None });
    }
}
