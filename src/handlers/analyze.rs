//! Tajwid analysis upload handlers.
//!
//! Both endpoints accept `multipart/form-data` with:
//! - `audio` (required): the recording
//! - `surah` (optional): forwarded to the analyzer when non-blank
//! - `ayahNumber` (optional): forwarded to the analyzer when non-blank
//!
//! Other fields are ignored.

use axum::{
    extract::{
        Multipart, State,
        multipart::MultipartRejection,
    },
    http::header,
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::analyzer::{AnalyzerError, AudioSubmission, one_shot_stream};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Content type assumed when the audio part does not declare one
const FALLBACK_AUDIO_MIME: &str = "application/octet-stream";

/// Collect the upload fields into a submission.
pub async fn read_submission(mut multipart: Multipart) -> AppResult<AudioSubmission> {
    let mut audio = None;
    let mut surah = None;
    let mut ayah_number = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let file_name = field.file_name().map(str::to_string);
                let mime = field
                    .content_type()
                    .unwrap_or(FALLBACK_AUDIO_MIME)
                    .to_string();
                let bytes = field.bytes().await?;
                audio = Some((bytes, mime, file_name));
            }
            "surah" => surah = Some(field.text().await?),
            "ayahNumber" => ayah_number = Some(field.text().await?),
            other => debug!(field = %other, "Ignoring multipart field"),
        }
    }

    let Some((bytes, mime, file_name)) = audio else {
        warn!("Upload rejected: audio field missing");
        return Err(AppError::BadRequest("Audio file is missing".to_string()));
    };

    Ok(AudioSubmission::new(bytes, mime)
        .with_file_name(file_name)
        .with_surah(surah)
        .with_ayah_number(ayah_number))
}

fn log_submission(submission: &AudioSubmission, mode: &str) {
    info!(
        request_id = %submission.request_id(),
        mode,
        bytes = submission.audio().len(),
        mime = %submission.mime_hint(),
        surah = submission.surah().unwrap_or("-"),
        ayah = submission.ayah_number().unwrap_or("-"),
        "Tajwid analysis requested"
    );
}

/// POST /api/analyze-tajwid
///
/// Returns the analyzer's JSON document verbatim.
pub async fn analyze_tajwid(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Response> {
    let submission = read_submission(multipart?).await?;
    log_submission(&submission, "sync");

    let payload = state.analyzer.analyze(submission).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        payload.into_bytes(),
    )
        .into_response())
}

/// POST /api/analyze-tajwid-stream
///
/// Streams analysis events as `text/event-stream`, one JSON document per
/// `data:` record. Input errors are answered with a JSON 400 before any
/// stream is opened; later failures are reported inside the stream.
pub async fn analyze_tajwid_stream(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let submission = read_submission(multipart?).await?;
    log_submission(&submission, "stream");

    let events = match state.analyzer.analyze_stream(submission).await {
        Ok(events) => events,
        Err(AnalyzerError::InvalidSubmission(message)) => {
            return Err(AppError::BadRequest(message));
        }
        Err(e) => one_shot_stream(Err(e)),
    };

    Ok(Sse::new(
        events.map(|event| Ok::<_, Infallible>(Event::default().data(event.to_json()))),
    ))
}
