//! Bounded subprocess execution for media tools.

use crate::error::ProcessingError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Replacement for redacted directories in tool diagnostics.
pub const REDACTED_DIR: &str = "<staging>";

const MAX_DIAGNOSTIC_CHARS: usize = 2048;

/// Reject tool paths that could smuggle shell syntax or traversal.
pub fn validate_tool_path(path: &str) -> Result<(), ProcessingError> {
    if path.trim().is_empty() {
        return Err(ProcessingError::InvalidToolPath("path is empty".to_string()));
    }

    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::InvalidToolPath(
            "path contains shell metacharacters".to_string(),
        ));
    }

    if path.contains("..") {
        return Err(ProcessingError::InvalidToolPath(
            "path contains directory traversal".to_string(),
        ));
    }

    Ok(())
}

/// A single invocation of an external tool.
///
/// Directories of every path passed through [`ToolCommand::path_arg`] are
/// redacted from stderr before it is placed in an error.
pub struct ToolCommand {
    program: String,
    name: String,
    args: Vec<OsString>,
    redact: Vec<PathBuf>,
    timeout: Duration,
}

impl ToolCommand {
    pub fn new(program: &str, timeout: Duration) -> Self {
        let name = Path::new(program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| program.to_string());

        ToolCommand {
            program: program.to_string(),
            name,
            args: Vec::new(),
            redact: Vec::new(),
            timeout,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn path_arg(mut self, path: &Path) -> Self {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.redact.push(parent.to_path_buf());
        }
        self.args.push(path.as_os_str().to_owned());
        self
    }

    /// Tool name as shown in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run to completion and return stdout.
    ///
    /// The child is killed if the timeout elapses or the future is dropped.
    pub async fn run(self) -> Result<Vec<u8>, ProcessingError> {
        let start = std::time::Instant::now();

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    ProcessingError::ToolNotFound {
                        tool: self.name.clone(),
                    }
                }
                _ => ProcessingError::Spawn {
                    tool: self.name.clone(),
                    source: e,
                },
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| ProcessingError::Spawn {
                tool: self.name.clone(),
                source: e,
            })?,
            Err(_) => {
                tracing::warn!(tool = %self.name, timeout_secs = self.timeout.as_secs(), "Tool timed out and was killed");
                return Err(ProcessingError::TimedOut {
                    tool: self.name,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let status = match output.status.code() {
                Some(code) => format!("status {}", code),
                None => "a signal".to_string(),
            };
            let stderr = self.redacted(&String::from_utf8_lossy(&output.stderr));
            tracing::warn!(tool = %self.name, %status, stderr = %stderr, "Tool failed");
            return Err(ProcessingError::Failed {
                tool: self.name,
                status,
                stderr,
            });
        }

        tracing::debug!(
            tool = %self.name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Tool finished"
        );

        Ok(output.stdout)
    }

    fn redacted(&self, text: &str) -> String {
        let mut dirs: Vec<String> = self
            .redact
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        dirs.sort_by_key(|d| std::cmp::Reverse(d.len()));

        let mut out = text.trim().to_string();
        for dir in dirs {
            out = out.replace(&dir, REDACTED_DIR);
        }

        if out.chars().count() > MAX_DIAGNOSTIC_CHARS {
            let skip = out.chars().count() - MAX_DIAGNOSTIC_CHARS;
            out = format!("...{}", out.chars().skip(skip).collect::<String>());
        }
        if out.is_empty() {
            out = "no diagnostic output".to_string();
        }
        out
    }
}
