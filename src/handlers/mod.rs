//! HTTP request handlers
//!
//! - `api` - Liveness and health endpoints
//! - `analyze` - Tajwid analysis uploads (JSON and event stream)

pub mod analyze;
pub mod api;

// Re-export commonly used handlers for convenient access
pub use analyze::{analyze_tajwid, analyze_tajwid_stream};
