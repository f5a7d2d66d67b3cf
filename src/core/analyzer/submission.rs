//! Audio submissions and their scoped temporary files.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tempfile::TempPath;
use tracing::{debug, warn};
use uuid::Uuid;

/// Extension used when neither the file name nor the MIME hint gives one.
pub const DEFAULT_AUDIO_EXTENSION: &str = "webm";

const TEMP_FILE_PREFIX: &str = "tajwid_audio_";

/// One recording submitted for analysis.
///
/// `surah` and `ayah_number` are kept only when they contain something other
/// than whitespace, and are stored trimmed.
#[derive(Debug, Clone)]
pub struct AudioSubmission {
    request_id: String,
    audio: Bytes,
    mime_hint: String,
    file_name: Option<String>,
    surah: Option<String>,
    ayah_number: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AudioSubmission {
    pub fn new(audio: impl Into<Bytes>, mime_hint: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            audio: audio.into(),
            mime_hint: mime_hint.into(),
            file_name: None,
            surah: None,
            ayah_number: None,
        }
    }

    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = non_blank(file_name);
        self
    }

    pub fn with_surah(mut self, surah: Option<String>) -> Self {
        self.surah = non_blank(surah);
        self
    }

    pub fn with_ayah_number(mut self, ayah_number: Option<String>) -> Self {
        self.ayah_number = non_blank(ayah_number);
        self
    }

    /// Identifier used to correlate log lines for this submission.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn audio(&self) -> &Bytes {
        &self.audio
    }

    pub fn mime_hint(&self) -> &str {
        &self.mime_hint
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn surah(&self) -> Option<&str> {
        self.surah.as_deref()
    }

    pub fn ayah_number(&self) -> Option<&str> {
        self.ayah_number.as_deref()
    }

    /// File extension for the staged recording, without the leading dot.
    ///
    /// Taken from the uploaded file name when it has a short alphanumeric
    /// extension, otherwise derived from the MIME hint.
    pub fn file_extension(&self) -> &str {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| {
                !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .unwrap_or_else(|| extension_for_mime(&self.mime_hint))
    }

    /// File name to present when forwarding the recording.
    pub fn upload_file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("recording.{}", self.file_extension()))
    }
}

/// Map an audio MIME type to a file extension.
pub fn extension_for_mime(mime: &str) -> &'static str {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "audio/webm" | "video/webm" => "webm",
        "audio/wav" | "audio/wave" | "audio/x-wav" | "audio/vnd.wave" => "wav",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/ogg" | "audio/opus" => "ogg",
        "audio/mp4" | "audio/m4a" | "audio/x-m4a" | "audio/aac" => "m4a",
        "audio/flac" | "audio/x-flac" => "flac",
        _ => DEFAULT_AUDIO_EXTENSION,
    }
}

/// A recording staged on disk for the analyzer process.
///
/// The file is owned by exactly one request. [`TempAudioFile::release`]
/// deletes it and logs (but never propagates) a failure; dropping the value
/// without releasing it still deletes the file, which covers cancelled
/// requests. Both paths consume the underlying handle, so a file is never
/// deleted twice.
#[derive(Debug)]
pub struct TempAudioFile {
    path: TempPath,
}

impl TempAudioFile {
    /// Write `audio` to a uniquely named file in `dir`.
    pub async fn create(dir: PathBuf, extension: &str, audio: Bytes) -> std::io::Result<Self> {
        let suffix = format!(".{extension}");

        let path = tokio::task::spawn_blocking(move || -> std::io::Result<TempPath> {
            let mut file = tempfile::Builder::new()
                .prefix(TEMP_FILE_PREFIX)
                .suffix(&suffix)
                .tempfile_in(&dir)?;
            file.write_all(&audio)?;
            file.flush()?;
            Ok(file.into_temp_path())
        })
        .await
        .map_err(std::io::Error::other)??;

        debug!(path = %path.display(), "Staged audio file");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the staged file.
    pub fn release(self) {
        let shown = self.path.display().to_string();
        match self.path.close() {
            Ok(()) => debug!(path = %shown, "Released audio file"),
            Err(e) => warn!(path = %shown, error = %e, "Failed to delete temporary audio file"),
        }
    }
}
