//! Multipart upload bodies
//!
//! Builds `multipart/form-data` request bodies by hand so tests control
//! exactly which fields are present.

use axum::body::Body;
use axum::http::Request;

pub const BOUNDARY: &str = "tajwid-test-boundary";

/// Small stand-in for a browser recording
pub const FAKE_WEBM: &[u8] = b"\x1a\x45\xdf\xa3fake-webm-recording";

#[derive(Debug, Default)]
pub struct UploadForm {
    body: Vec<u8>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn audio(mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"audio\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn into_body(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }

    /// POST this form to `uri`
    pub fn request(self, uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.into_body()))
            .unwrap()
    }
}

/// The usual browser upload: a webm recording with surah and ayah
pub fn recitation_form() -> UploadForm {
    UploadForm::new()
        .audio("recording.webm", "audio/webm", FAKE_WEBM)
        .text("surah", "1")
        .text("ayahNumber", "2")
}
