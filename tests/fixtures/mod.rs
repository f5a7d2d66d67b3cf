//! Test Fixtures Module
//!
//! Shared helpers for the gateway integration tests:
//! - Multipart upload bodies
//! - Fake analyzer scripts driven through `sh`
//! - Configuration and response helpers

// Not every test binary uses every helper
#![allow(dead_code)]

pub mod multipart;
pub mod scripts;

pub use multipart::*;
pub use scripts::*;

use std::net::TcpListener;
use std::path::Path;

use axum::body::Body;
use axum::http::Response;
use serde_json::Value;

use tajwid_gateway::ServerConfig;
use tajwid_gateway::config::AnalyzerBackend;

/// Find an available port for testing
pub fn find_available_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Configuration running `script` through `sh`, staging uploads in `temp_dir`
pub fn process_config(script: &Path, temp_dir: &Path, timeout_seconds: u64) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = find_available_port();
    config.analyzer_backend = AnalyzerBackend::Process;
    config.analyzer_interpreter = Some("sh".to_string());
    config.analyzer_script_path = script.to_path_buf();
    config.analyzer_temp_dir = Some(temp_dir.to_path_buf());
    config.analyzer_timeout_seconds = timeout_seconds;
    config
}

/// Configuration forwarding to a remote analyzer at `uri`
pub fn remote_config(uri: &str, token: Option<&str>) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.port = find_available_port();
    config.analyzer_backend = AnalyzerBackend::Remote;
    config.analyzer_host = uri.to_string();
    config.analyzer_api_token = token.map(str::to_string);
    config.analyzer_timeout_seconds = 5;
    config
}

/// Number of entries left in a staging directory
pub fn staged_file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

/// Collect a response body as text
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Split an SSE body into its `data:` payloads, parsed as JSON
pub fn sse_events(body: &str) -> Vec<Value> {
    body.split("\n\n")
        .filter_map(|record| {
            record
                .lines()
                .find_map(|line| line.strip_prefix("data:"))
                .map(|data| serde_json::from_str(data.trim()).unwrap())
        })
        .collect()
}
