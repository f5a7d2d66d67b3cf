//! Analysis events relayed to the browser as server-sent events.
//!
//! Gateway-originated events are tagged with a `type` field:
//!
//! ```text
//! {"type":"start"}
//! {"type":"log","message":"..."}
//! {"type":"error","message":"..."}
//! {"type":"done","code":0}
//! ```
//!
//! `result` events are the analyzer's own JSON lines, forwarded untouched.

use serde_json::json;

use super::base::AnalysisPayload;

/// One event in an analysis stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    /// Emitted before the analyzer is invoked
    Start,
    /// A non-JSON line of analyzer output
    Log { message: String },
    /// Diagnostic output or a gateway-side failure
    Error { message: String },
    /// A JSON document produced by the analyzer
    Result(AnalysisPayload),
    /// Terminal event; `code` is the analyzer's exit code when there is one
    Done { code: Option<i32> },
}

impl AnalysisEvent {
    /// Classify one line of analyzer output.
    ///
    /// Blank lines produce nothing. A line that parses as JSON becomes a
    /// `result` event; anything else becomes a `log` event carrying the
    /// line as-is.
    pub fn from_output_line(line: &str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }

        match AnalysisPayload::parse(line.to_owned()) {
            Ok(payload) => Some(AnalysisEvent::Result(payload)),
            Err(_) => Some(AnalysisEvent::Log {
                message: line.to_owned(),
            }),
        }
    }

    /// Short name of the event kind, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisEvent::Start => "start",
            AnalysisEvent::Log { .. } => "log",
            AnalysisEvent::Error { .. } => "error",
            AnalysisEvent::Result(_) => "result",
            AnalysisEvent::Done { .. } => "done",
        }
    }

    /// Encode the event as a single-line JSON document.
    pub fn to_json(&self) -> String {
        match self {
            AnalysisEvent::Start => json!({ "type": "start" }).to_string(),
            AnalysisEvent::Log { message } => {
                json!({ "type": "log", "message": message }).to_string()
            }
            AnalysisEvent::Error { message } => {
                json!({ "type": "error", "message": message }).to_string()
            }
            AnalysisEvent::Result(payload) => payload.as_str().to_owned(),
            AnalysisEvent::Done { code } => json!({ "type": "done", "code": code }).to_string(),
        }
    }
}
