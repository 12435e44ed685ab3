//! External tool invocation
//!
//! The rasterizer, tracer, modeler and fetcher are all external programs.
//! They are described by a [`ToolCommand`] and executed through a
//! [`ToolRunner`]. Environment overrides travel inside the command as an
//! immutable [`ToolEnv`] value; the process environment of IconForge itself
//! is never mutated.

use crate::error::ToolError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Environment overrides applied to a single tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolEnv {
    overrides: Vec<(String, String)>,
}

impl ToolEnv {
    /// Create an empty set of overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one variable
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.overrides.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.overrides.push((key, value));
        }
        self
    }

    /// Overrides that keep desktop tools from reaching for a session bus or display
    pub fn headless() -> Self {
        Self::new()
            .with("DBUS_SESSION_BUS_ADDRESS", "")
            .with("DISPLAY", "")
            .with("HOME", "/tmp")
    }

    /// Overrides that only disable the display
    pub fn no_display() -> Self {
        Self::new().with("DISPLAY", "")
    }

    /// Look up an override
    pub fn get(&self, key: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over all overrides
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// A fully described external tool invocation
#[derive(Debug, Clone)]
pub struct ToolCommand {
    /// Program name or path
    pub program: String,
    /// Arguments in order
    pub args: Vec<String>,
    /// Environment overrides
    pub env: ToolEnv,
    /// Working directory, inherited when `None`
    pub working_dir: Option<PathBuf>,
    /// Bytes written to the tool's stdin, stdin is closed when `None`
    pub stdin: Option<Vec<u8>>,
    /// Wall-clock budget for the whole invocation
    pub timeout: Duration,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: ToolEnv::default(),
            working_dir: None,
            stdin: None,
            timeout,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, env: ToolEnv) -> Self {
        self.env = env;
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn stdin(mut self, input: Vec<u8>) -> Self {
        self.stdin = Some(input);
        self
    }

    /// Command line for log messages
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Captured result of a finished tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the tool was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Successful output with the given stdout
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failure(exit_code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Best human-readable diagnostics: stderr, else stdout, else a placeholder
    pub fn diagnostics(&self) -> String {
        let stderr = String::from_utf8_lossy(&self.stderr);
        if !stderr.trim().is_empty() {
            return stderr.trim().to_string();
        }
        let stdout = String::from_utf8_lossy(&self.stdout);
        if !stdout.trim().is_empty() {
            return stdout.trim().to_string();
        }
        "no output".to_string()
    }
}

/// Executes tool commands
///
/// Implement this trait to substitute the process-backed runner, e.g. with a
/// scripted runner in tests.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run the command to completion or until its timeout expires
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError>;
}

/// Runs tools as child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
        debug!("Running {}", command.display());

        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .envs(command.env.iter())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true);
        if command.stdin.is_some() {
            cmd.stdin(std::process::Stdio::piped());
        } else {
            cmd.stdin(std::process::Stdio::null());
        }
        if let Some(dir) = &command.working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|e| ToolError::Spawn {
            program: command.program.clone(),
            reason: e.to_string(),
        })?;

        // Feed stdin concurrently so a tool that streams output early cannot deadlock us
        if let (Some(input), Some(mut pipe)) = (command.stdin.clone(), child.stdin.take()) {
            let program = command.program.clone();
            tokio::spawn(async move {
                if let Err(e) = pipe.write_all(&input).await {
                    debug!("{} closed stdin early: {}", program, e);
                }
            });
        }

        match tokio::time::timeout(command.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ToolOutput {
                exit_code: output.status.code(),
                stdout: output.stdout,
                stderr: output.stderr,
            }),
            Ok(Err(e)) => Err(ToolError::Io {
                program: command.program.clone(),
                reason: e.to_string(),
            }),
            // The child is dropped with the timed-out future and killed
            Err(_) => Err(ToolError::Timeout {
                program: command.program.clone(),
                timeout_ms: command.timeout.as_millis() as u64,
            }),
        }
    }
}

/// Runner backed by a closure, counting invocations
///
/// Useful wherever the real tools are unavailable, such as tests and dry runs.
pub struct FnRunner<F>
where
    F: Fn(&ToolCommand) -> Result<ToolOutput, ToolError> + Send + Sync,
{
    handler: F,
    calls: AtomicUsize,
}

impl<F> FnRunner<F>
where
    F: Fn(&ToolCommand) -> Result<ToolOutput, ToolError> + Send + Sync,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of commands run so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> ToolRunner for FnRunner<F>
where
    F: Fn(&ToolCommand) -> Result<ToolOutput, ToolError> + Send + Sync,
{
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.handler)(command)
    }
}
