//! Subprocess execution primitives with consistent error handling.
//!
//! Every external tool the pipeline touches (git, the API-doc generator, the
//! multi-version builder) goes through these helpers so failures surface the
//! same way: the failing tool's stderr, falling back to stdout when stderr is
//! empty.

use std::path::Path;
use std::process::{Command, Output};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to run {context}: {source}")]
    Spawn {
        context: String,
        source: std::io::Error,
    },
    #[error("{context} failed: {detail}")]
    Failed { context: String, detail: String },
}

/// Run a command and return trimmed stdout on success.
pub fn run(program: &str, args: &[&str], context: &str) -> Result<String, CommandError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| CommandError::Spawn {
            context: context.to_string(),
            source: e,
        })?;
    require_success(&output, context)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a command in a specific directory and return trimmed stdout on success.
pub fn run_in(
    dir: &Path,
    program: &str,
    args: &[&str],
    context: &str,
) -> Result<String, CommandError> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| CommandError::Spawn {
            context: context.to_string(),
            source: e,
        })?;
    require_success(&output, context)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check if a command succeeds in a directory without capturing output.
pub fn succeeded_in(dir: &Path, program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn require_success(output: &Output, context: &str) -> Result<(), CommandError> {
    if output.status.success() {
        return Ok(());
    }
    Err(CommandError::Failed {
        context: context.to_string(),
        detail: error_text(output),
    })
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}
