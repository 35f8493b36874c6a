//! Subprocess backend abstraction.
//!
//! Trait-based so toolchain logic can be tested without a container runtime
//! on the machine. The production implementation uses `tokio::process` with
//! piped stdio; the log-streaming variant forwards output lines to a sink as
//! they arrive instead of buffering the whole log.

use async_trait::async_trait;
use ggbake_core::BuildLogSinkPort;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// Captured result of one finished subprocess.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, when the process exited normally.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl ProcessOutput {
    /// A successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

// ============================================================================
// Backend Trait
// ============================================================================

/// Trait for running external programs.
#[async_trait]
pub trait ProcessBackend: Send + Sync {
    /// Run a program to completion, optionally feeding `stdin`, capturing
    /// both output streams.
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> std::io::Result<ProcessOutput>;

    /// Run a program to completion, forwarding each output line to `logs`
    /// as it arrives while also capturing it.
    async fn run_streamed(
        &self,
        program: &str,
        args: &[String],
        logs: Arc<dyn BuildLogSinkPort>,
    ) -> std::io::Result<ProcessOutput>;
}

// ============================================================================
// Tokio Backend
// ============================================================================

/// Production backend spawning real subprocesses.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessBackend;

impl TokioProcessBackend {
    /// Create a new backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Spawn a reader task that forwards lines to the sink and collects them.
fn spawn_line_reader<R>(
    reader: R,
    stream_name: &'static str,
    sink: Arc<dyn BuildLogSinkPort>,
) -> tokio::task::JoinHandle<String>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        let mut collected = String::new();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!("{stream_name}: {line}");
            collected.push_str(&line);
            collected.push('\n');
            sink.append(stream_name, line);
        }
        collected
    })
}

#[async_trait]
impl ProcessBackend for TokioProcessBackend {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> std::io::Result<ProcessOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(program, ?args, "running subprocess");
        let mut child = cmd.spawn()?;

        if let Some(input) = stdin {
            if let Some(mut handle) = child.stdin.take() {
                handle.write_all(input).await?;
                handle.shutdown().await?;
            }
        }

        let output = child.wait_with_output().await?;
        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn run_streamed(
        &self,
        program: &str,
        args: &[String],
        logs: Arc<dyn BuildLogSinkPort>,
    ) -> std::io::Result<ProcessOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(program, ?args, "running subprocess (streamed)");
        let mut child = cmd.spawn()?;

        let stdout_task = child
            .stdout
            .take()
            .map(|out| spawn_line_reader(out, "stdout", logs.clone()));
        let stderr_task = child
            .stderr
            .take()
            .map(|err| spawn_line_reader(err, "stderr", logs));

        let status = child.wait().await?;

        let stdout = match stdout_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };
        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        Ok(ProcessOutput {
            success: status.success(),
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// One recorded invocation.
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub program: String,
        pub args: Vec<String>,
        pub stdin: Option<Vec<u8>>,
    }

    /// A fake process backend with canned outcomes keyed by the first
    /// argument (the docker subcommand).
    #[derive(Default)]
    pub struct FakeProcessBackend {
        outcomes: Mutex<HashMap<String, ProcessOutput>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl FakeProcessBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Set the outcome for a subcommand.
        pub fn with_outcome(self, subcommand: &str, outcome: ProcessOutput) -> Self {
            self.outcomes
                .lock()
                .unwrap()
                .insert(subcommand.to_string(), outcome);
            self
        }

        /// All recorded invocations, in order.
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }

        /// Subcommands invoked, in order.
        pub fn invoked_subcommands(&self) -> Vec<String> {
            self.calls()
                .iter()
                .filter_map(|c| c.args.first().cloned())
                .collect()
        }

        fn record_and_resolve(
            &self,
            program: &str,
            args: &[String],
            stdin: Option<&[u8]>,
        ) -> ProcessOutput {
            self.calls.lock().unwrap().push(RecordedCall {
                program: program.to_string(),
                args: args.to_vec(),
                stdin: stdin.map(<[u8]>::to_vec),
            });
            let subcommand = args.first().map(String::as_str).unwrap_or("");
            self.outcomes
                .lock()
                .unwrap()
                .get(subcommand)
                .cloned()
                .unwrap_or_else(|| ProcessOutput::ok(""))
        }
    }

    #[async_trait]
    impl ProcessBackend for FakeProcessBackend {
        async fn run(
            &self,
            program: &str,
            args: &[String],
            stdin: Option<&[u8]>,
        ) -> std::io::Result<ProcessOutput> {
            Ok(self.record_and_resolve(program, args, stdin))
        }

        async fn run_streamed(
            &self,
            program: &str,
            args: &[String],
            logs: Arc<dyn BuildLogSinkPort>,
        ) -> std::io::Result<ProcessOutput> {
            let outcome = self.record_and_resolve(program, args, None);
            // Replay the canned output through the sink, as the real backend
            // would while the process runs.
            for line in outcome.stdout.lines() {
                logs.append("stdout", line.to_string());
            }
            for line in outcome.stderr.lines() {
                logs.append("stderr", line.to_string());
            }
            Ok(outcome)
        }
    }
}
