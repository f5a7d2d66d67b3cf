//! Local-process analyzer client.
//!
//! Stages each recording in a temporary file, runs the analyzer script on it,
//! and either collects the final JSON document or relays output live.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, error, info, warn};

use super::command::{AnalyzerCommand, OutputMode};
use super::config::ProcessAnalyzerConfig;
use super::stream::stream_analysis;
use crate::config::AnalyzerBackend;
use crate::core::analyzer::base::{
    AnalysisPayload, AnalysisStream, Analyzer, AnalyzerError, AnalyzerResult,
};
use crate::core::analyzer::submission::{AudioSubmission, TempAudioFile};

/// Runs the external analyzer script once per submission.
#[derive(Debug, Clone)]
pub struct ProcessAnalyzer {
    config: ProcessAnalyzerConfig,
}

/// Prefer stderr for failure details, falling back to stdout.
fn failure_details(stderr: &[u8], stdout: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    if !stderr.trim().is_empty() {
        return stderr.trim().to_string();
    }
    String::from_utf8_lossy(stdout).trim().to_string()
}

impl ProcessAnalyzer {
    pub fn new(config: ProcessAnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProcessAnalyzerConfig {
        &self.config
    }

    async fn stage(&self, submission: &AudioSubmission) -> AnalyzerResult<TempAudioFile> {
        TempAudioFile::create(
            self.config.temp_dir.clone(),
            submission.file_extension(),
            submission.audio().clone(),
        )
        .await
        .map_err(|e| {
            error!(
                request_id = %submission.request_id(),
                error = %e,
                "Failed to stage audio file"
            );
            AnalyzerError::TempFile(e.to_string())
        })
    }

    async fn run_to_completion(
        &self,
        command: &AnalyzerCommand,
        request_id: &str,
    ) -> AnalyzerResult<AnalysisPayload> {
        let child = command.to_command().spawn().map_err(|e| {
            error!(request_id = %request_id, program = %command.program(), error = %e, "Failed to spawn analyzer");
            AnalyzerError::SpawnFailed(e.to_string())
        })?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.config.timeout, child.wait_with_output()).await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!(request_id = %request_id, error = %e, "Failed waiting for analyzer");
                return Err(AnalyzerError::ProcessFailed {
                    code: None,
                    details: e.to_string(),
                });
            }
            Err(_) => {
                warn!(
                    request_id = %request_id,
                    timeout_secs = self.config.timeout.as_secs(),
                    "Analyzer timed out"
                );
                return Err(AnalyzerError::Timeout(self.config.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let details = failure_details(&output.stderr, &output.stdout);
            warn!(
                request_id = %request_id,
                code = ?output.status.code(),
                "Analyzer exited with failure"
            );
            return Err(AnalyzerError::ProcessFailed {
                code: output.status.code(),
                details,
            });
        }

        if !output.stderr.is_empty() {
            debug!(
                request_id = %request_id,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Analyzer diagnostics"
            );
        }

        let stdout = Bytes::from(output.stdout);
        AnalysisPayload::parse(stdout.clone()).map_err(|e| {
            warn!(request_id = %request_id, error = %e, "Analyzer output is not JSON");
            AnalyzerError::InvalidOutput {
                details: String::from_utf8_lossy(&stdout).trim().to_string(),
            }
        })
    }
}

#[async_trait]
impl Analyzer for ProcessAnalyzer {
    fn backend(&self) -> AnalyzerBackend {
        AnalyzerBackend::Process
    }

    async fn analyze(&self, submission: AudioSubmission) -> AnalyzerResult<AnalysisPayload> {
        let temp = self.stage(&submission).await?;
        let command =
            AnalyzerCommand::build(&self.config, temp.path(), &submission, OutputMode::Document);

        info!(
            request_id = %submission.request_id(),
            bytes = submission.audio().len(),
            "Running analyzer"
        );

        let outcome = self.run_to_completion(&command, submission.request_id()).await;
        temp.release();
        outcome
    }

    async fn analyze_stream(&self, submission: AudioSubmission) -> AnalyzerResult<AnalysisStream> {
        let temp = self.stage(&submission).await?;
        let command =
            AnalyzerCommand::build(&self.config, temp.path(), &submission, OutputMode::Stream);

        info!(
            request_id = %submission.request_id(),
            bytes = submission.audio().len(),
            "Streaming analyzer output"
        );

        Ok(stream_analysis(
            command,
            temp,
            self.config.timeout,
            submission.request_id().to_string(),
        )
        .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_details_prefers_stderr() {
        assert_eq!(failure_details(b" Traceback \n", b"partial"), "Traceback");
        assert_eq!(failure_details(b"  \n", b"stdout only\n"), "stdout only");
        assert_eq!(failure_details(b"", b""), "");
    }
}
