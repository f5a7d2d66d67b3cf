//! Live relay of analyzer output as analysis events.

use std::time::Duration;

use async_stream::stream;
use futures::Stream;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::command::AnalyzerCommand;
use super::lines::LineBuffer;
use crate::core::analyzer::events::AnalysisEvent;
use crate::core::analyzer::submission::TempAudioFile;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Deadline used when `timeout` cannot be represented as an instant.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `now + timeout`, saturating to a far-future deadline on overflow.
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}

/// Outcome of one turn of the read loop.
enum PipeRead {
    Stdout(std::io::Result<usize>),
    Stderr(std::io::Result<usize>),
    Deadline,
}

/// Read from a pipe that may already be closed. A closed pipe never resolves.
async fn read_pipe<R>(pipe: &mut Option<R>, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match pipe {
        Some(reader) => reader.read(buf).await,
        None => std::future::pending().await,
    }
}

async fn kill_child(child: &mut Child, request_id: &str) {
    if let Err(e) = child.kill().await {
        warn!(request_id = %request_id, error = %e, "Failed to kill analyzer process");
    }
}

/// Spawn the analyzer and relay its output.
///
/// The stream yields `start` before spawning and exactly one `done` at the
/// end. `temp` is released before `done` on every path that reaches it; if
/// the stream is dropped early the child is killed and `temp` is removed by
/// its own drop.
pub fn stream_analysis(
    command: AnalyzerCommand,
    temp: TempAudioFile,
    timeout: Duration,
    request_id: String,
) -> impl Stream<Item = AnalysisEvent> + Send + 'static {
    stream! {
        yield AnalysisEvent::Start;

        let mut child = match command.to_command().spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(
                    request_id = %request_id,
                    program = %command.program(),
                    error = %e,
                    "Failed to spawn analyzer"
                );
                temp.release();
                yield AnalysisEvent::Error {
                    message: format!("Failed to start analyzer: {e}"),
                };
                yield AnalysisEvent::Done { code: None };
                return;
            }
        };

        info!(request_id = %request_id, pid = ?child.id(), "Analyzer started");

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();
        let mut out_buf = vec![0u8; READ_CHUNK_SIZE];
        let mut err_buf = vec![0u8; READ_CHUNK_SIZE];
        let mut lines = LineBuffer::new();

        let deadline = deadline_after(timeout);
        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);
        let mut timed_out = false;

        while stdout.is_some() || stderr.is_some() {
            let step = tokio::select! {
                read = read_pipe(&mut stdout, &mut out_buf) => PipeRead::Stdout(read),
                read = read_pipe(&mut stderr, &mut err_buf) => PipeRead::Stderr(read),
                _ = &mut sleep => PipeRead::Deadline,
            };

            match step {
                PipeRead::Stdout(Ok(0)) => stdout = None,
                PipeRead::Stdout(Ok(n)) => {
                    for line in lines.push(&out_buf[..n]) {
                        if let Some(event) = AnalysisEvent::from_output_line(&line) {
                            yield event;
                        }
                    }
                }
                PipeRead::Stdout(Err(e)) => {
                    warn!(request_id = %request_id, error = %e, "Failed reading analyzer stdout");
                    stdout = None;
                }
                PipeRead::Stderr(Ok(0)) => stderr = None,
                PipeRead::Stderr(Ok(n)) => {
                    let message = String::from_utf8_lossy(&err_buf[..n]).into_owned();
                    debug!(request_id = %request_id, bytes = n, "Analyzer stderr");
                    yield AnalysisEvent::Error { message };
                }
                PipeRead::Stderr(Err(e)) => {
                    warn!(request_id = %request_id, error = %e, "Failed reading analyzer stderr");
                    stderr = None;
                }
                PipeRead::Deadline => {
                    timed_out = true;
                    break;
                }
            }
        }

        if let Some(line) = lines.finish() {
            if let Some(event) = AnalysisEvent::from_output_line(&line) {
                yield event;
            }
        }

        let mut code = None;
        if !timed_out {
            match tokio::time::timeout_at(deadline, child.wait()).await {
                Ok(Ok(status)) => code = status.code(),
                Ok(Err(e)) => {
                    error!(request_id = %request_id, error = %e, "Failed waiting for analyzer");
                    yield AnalysisEvent::Error {
                        message: format!("Failed waiting for analyzer: {e}"),
                    };
                }
                Err(_) => timed_out = true,
            }
        }

        if timed_out {
            warn!(
                request_id = %request_id,
                timeout_secs = timeout.as_secs(),
                "Analyzer timed out, killing process"
            );
            kill_child(&mut child, &request_id).await;
            yield AnalysisEvent::Error {
                message: format!("Analyzer timed out after {} seconds", timeout.as_secs()),
            };
        }

        temp.release();
        info!(request_id = %request_id, code = ?code, "Analyzer finished");
        yield AnalysisEvent::Done { code };
    }
}
