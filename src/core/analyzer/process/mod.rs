//! Local-process analyzer backend.
//!
//! Runs the tajwid analyzer script as a child process:
//!
//! ```text
//! <interpreter> [interpreter-args] <script> <audio-file> [--stream] [--surah S] [--ayah-number N]
//! ```
//!
//! In document mode the script prints one JSON document and exits. In stream
//! mode (`--stream`) it prints newline-delimited output; JSON lines are
//! relayed as results, other lines as log messages, and stderr as errors.

mod client;
mod command;
mod config;
mod lines;
mod stream;

pub use client::ProcessAnalyzer;
pub use command::{AnalyzerCommand, OutputMode};
pub use config::{ProcessAnalyzerConfig, default_interpreter};
pub use lines::LineBuffer;
pub use stream::stream_analysis;
