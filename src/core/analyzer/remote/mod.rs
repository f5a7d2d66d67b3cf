//! Remote-HTTP analyzer backend.
//!
//! Forwards each submission as one multipart request to a separately
//! deployed analyzer service:
//!
//! ```text
//! POST {base_url}/api/analyze
//! X-API-TOKEN: <token>            (only when configured)
//!
//! audio            file part, original name and MIME type
//! surah_raw        text part, when present
//! ayah_number_raw  text part, when present
//! ```
//!
//! A successful JSON response is relayed untouched. Error responses keep
//! their status code and the best message found in the body.

mod client;
mod config;
mod messages;


pub use client::{API_TOKEN_HEADER, RemoteAnalyzer};
pub use config::{
    ANALYZE_PATH, DEFAULT_BACKEND_PORT, RemoteAnalyzerConfig, resolve_backend_base_url,
};
pub use messages::{GENERIC_REMOTE_ERROR, INVALID_REMOTE_RESPONSE, extract_error_message};
