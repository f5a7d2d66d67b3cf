//! Fake analyzer scripts
//!
//! Each helper writes a POSIX shell script that mimics one behavior of the
//! real analyzer. Scripts receive the same arguments the real one does:
//! `<audio-path> [--stream] [--surah S] [--ayah-number N]`.

use std::path::PathBuf;

use tempfile::TempDir;

/// A script on disk plus the directory keeping it alive
pub struct FakeAnalyzer {
    _dir: TempDir,
    pub path: PathBuf,
}

pub fn fake_analyzer(body: &str) -> FakeAnalyzer {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("analyze_tajwid.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    FakeAnalyzer { _dir: dir, path }
}

/// Prints one JSON document
pub fn json_analyzer(document: &str) -> FakeAnalyzer {
    fake_analyzer(&format!("printf '%s\\n' '{document}'\n"))
}

/// Echoes its arguments and the audio size as JSON
pub fn echo_args_analyzer() -> FakeAnalyzer {
    fake_analyzer(
        r#"audio="$1"
shift
size=$(wc -c < "$audio" | tr -d ' ')
if [ -f "$audio" ]; then exists=true; else exists=false; fi
printf '{"args":"%s","size":%s,"exists":%s}\n' "$*" "$size" "$exists"
"#,
    )
}

/// Emits a log line, a progress document and a final result in stream mode
pub fn streaming_analyzer() -> FakeAnalyzer {
    fake_analyzer(
        r#"echo "Loading model"
echo '{"type":"progress","step":1}'
echo "warning: low volume" >&2
printf '{"type":"result","score_percent":87}'
"#,
    )
}

/// Fails with diagnostics on stderr
pub fn failing_analyzer(code: i32) -> FakeAnalyzer {
    fake_analyzer(&format!("echo 'Traceback: model not found' >&2\nexit {code}\n"))
}

/// Prints plain text instead of JSON
pub fn text_analyzer() -> FakeAnalyzer {
    fake_analyzer("echo 'Analysis complete'\n")
}

/// Never finishes on its own
pub fn hanging_analyzer() -> FakeAnalyzer {
    fake_analyzer("sleep 30\n")
}
