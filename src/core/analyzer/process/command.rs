//! Analyzer command line construction.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::config::ProcessAnalyzerConfig;
use crate::core::analyzer::submission::AudioSubmission;

/// Output mode requested from the analyzer script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// One JSON document on stdout at exit
    Document,
    /// Newline-delimited progress and results (`--stream`)
    Stream,
}

/// A fully resolved analyzer invocation:
/// `<interpreter> [interpreter-args] <script> <audio> [--stream] [--surah S] [--ayah-number N]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerCommand {
    program: String,
    args: Vec<OsString>,
}

impl AnalyzerCommand {
    pub fn build(
        config: &ProcessAnalyzerConfig,
        audio_path: &Path,
        submission: &AudioSubmission,
        mode: OutputMode,
    ) -> Self {
        let mut args: Vec<OsString> = config.interpreter_args.iter().map(OsString::from).collect();
        args.push(config.script_path.clone().into_os_string());
        args.push(audio_path.as_os_str().to_owned());

        if mode == OutputMode::Stream {
            args.push("--stream".into());
        }
        if let Some(surah) = submission.surah() {
            args.push("--surah".into());
            args.push(surah.into());
        }
        if let Some(ayah_number) = submission.ayah_number() {
            args.push("--ayah-number".into());
            args.push(ayah_number.into());
        }

        Self {
            program: config.interpreter.clone(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// A tokio command with piped output that kills the child when dropped.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}
