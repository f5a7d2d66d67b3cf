//! Error bodies returned by the remote analyzer service.

use serde_json::Value;

/// Message used when the remote error body carries nothing usable.
pub const GENERIC_REMOTE_ERROR: &str = "Analyzer service request failed";

/// Message used when a successful response is not a JSON document.
pub const INVALID_REMOTE_RESPONSE: &str = "Analyzer service returned an invalid response";

/// Fields checked, in order, for a human-readable error.
const MESSAGE_FIELDS: [&str; 3] = ["detail", "message", "error"];

/// Pull an error message out of a remote error body.
///
/// The body is not assumed to be JSON. The first non-empty string among
/// `detail`, `message` and `error` wins; anything else yields
/// [`GENERIC_REMOTE_ERROR`].
pub fn extract_error_message(body: &[u8]) -> String {
    let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
        return GENERIC_REMOTE_ERROR.to_string();
    };

    MESSAGE_FIELDS
        .iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_REMOTE_ERROR.to_string())
}
