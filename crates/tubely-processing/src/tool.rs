//! External tool runner shared by the inspector and the optimizer.

use std::ffi::OsStr;
use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

use crate::error::ProcessingError;

/// Outcome of a failed tool invocation.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{program} not found on PATH")]
    Missing { program: String },

    #[error("{program} exited with status {status:?}: {stderr}")]
    Failed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{program} did not finish within {after:?}")]
    TimedOut { program: String, after: Duration },

    #[error("failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Reject tool paths that carry shell metacharacters or traversal sequences.
pub fn validate_tool_path(path: &str) -> Result<(), ProcessingError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() || path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::InvalidToolPath(format!(
            "Path contains dangerous characters: {}",
            path
        )));
    }

    if path.contains("..") {
        return Err(ProcessingError::InvalidToolPath(format!(
            "Path contains directory traversal: {}",
            path
        )));
    }

    if !path
        .chars()
        .all(|c| c.is_alphanumeric() || c == '/' || c == '-' || c == '_' || c == '.' || c == '\\')
    {
        return Err(ProcessingError::InvalidToolPath(format!(
            "Path contains unsafe characters: {}",
            path
        )));
    }

    Ok(())
}

/// Run `program` with `args`, capturing stdout and stderr.
///
/// The child is killed if it outlives `timeout` or if the returned future is
/// dropped.
pub async fn run_tool<I, S>(program: &str, args: I, timeout: Duration) -> Result<Output, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ToolError::Missing {
                program: program.to_string(),
            },
            _ => ToolError::Io {
                program: program.to_string(),
                source: e,
            },
        })?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| ToolError::Io {
            program: program.to_string(),
            source: e,
        })?,
        Err(_) => {
            return Err(ToolError::TimedOut {
                program: program.to_string(),
                after: timeout,
            })
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(
            program = %program,
            status = ?output.status.code(),
            stderr = %stderr,
            "External tool failed"
        );
        return Err(ToolError::Failed {
            program: program.to_string(),
            status: output.status.code(),
            stderr,
        });
    }

    Ok(output)
}
