//! HTTP client for a remote tajwid analyzer service.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, error, info, warn};

use super::config::RemoteAnalyzerConfig;
use super::messages::{INVALID_REMOTE_RESPONSE, extract_error_message};
use crate::config::AnalyzerBackend;
use crate::core::analyzer::base::{AnalysisPayload, Analyzer, AnalyzerError, AnalyzerResult};
use crate::core::analyzer::submission::AudioSubmission;

const USER_AGENT: &str = concat!("Tajwid-Gateway/", env!("CARGO_PKG_VERSION"));

/// Header carrying the shared API token.
pub const API_TOKEN_HEADER: &str = "X-API-TOKEN";

/// Forwards submissions to a remote analyzer over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteAnalyzer {
    config: RemoteAnalyzerConfig,
    http_client: Client,
}

impl RemoteAnalyzer {
    pub fn new(config: RemoteAnalyzerConfig) -> AnalyzerResult<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                AnalyzerError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn config(&self) -> &RemoteAnalyzerConfig {
        &self.config
    }

    fn audio_part(submission: &AudioSubmission, mime: &str) -> reqwest::Result<Part> {
        Part::bytes(submission.audio().to_vec())
            .file_name(submission.upload_file_name())
            .mime_str(mime)
    }

    fn build_form(submission: &AudioSubmission) -> AnalyzerResult<Form> {
        let audio = Self::audio_part(submission, submission.mime_hint())
            .or_else(|_| Self::audio_part(submission, "application/octet-stream"))
            .map_err(|e| AnalyzerError::InvalidSubmission(format!("Invalid audio part: {e}")))?;

        let mut form = Form::new().part("audio", audio);
        if let Some(surah) = submission.surah() {
            form = form.text("surah_raw", surah.to_string());
        }
        if let Some(ayah_number) = submission.ayah_number() {
            form = form.text("ayah_number_raw", ayah_number.to_string());
        }
        Ok(form)
    }

    fn map_send_error(&self, e: reqwest::Error, request_id: &str) -> AnalyzerError {
        if e.is_timeout() {
            warn!(request_id = %request_id, "Analyzer service timed out");
            AnalyzerError::Timeout(self.config.timeout.as_secs())
        } else {
            error!(request_id = %request_id, error = %e, "Analyzer service unreachable");
            AnalyzerError::Network(format!("Request failed: {e}"))
        }
    }
}

#[async_trait]
impl Analyzer for RemoteAnalyzer {
    fn backend(&self) -> AnalyzerBackend {
        AnalyzerBackend::Remote
    }

    async fn analyze(&self, submission: AudioSubmission) -> AnalyzerResult<AnalysisPayload> {
        let url = self.config.analyze_url()?;
        let request_id = submission.request_id();

        info!(
            request_id = %request_id,
            url = %url,
            bytes = submission.audio().len(),
            "Forwarding audio to analyzer service"
        );

        let mut request = self
            .http_client
            .post(url)
            .multipart(Self::build_form(&submission)?);
        if let Some(token) = &self.config.api_token {
            request = request.header(API_TOKEN_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_send_error(e, request_id))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e, request_id))?;

        if !status.is_success() {
            let message = extract_error_message(&body);
            warn!(
                request_id = %request_id,
                status = status.as_u16(),
                message = %message,
                "Analyzer service returned an error"
            );
            return Err(AnalyzerError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        debug!(request_id = %request_id, bytes = body.len(), "Analyzer service responded");

        AnalysisPayload::parse(body).map_err(|e| {
            warn!(request_id = %request_id, error = %e, "Analyzer service response is not JSON");
            AnalyzerError::Remote {
                status: 502,
                message: INVALID_REMOTE_RESPONSE.to_string(),
            }
        })
    }
}
