//! Input resolution: load the report text and split it into lines.
//!
//! The report arrives as the plain-text rendering of the Clerk's PDF, one
//! logical table row per physical line. This stage accepts a file path, or
//! `-` for stdin, and normalises line endings so later stages only ever see
//! `\n`-separated lines with no trailing `\r`.
//!
//! A file that is not UTF-8 is almost always the PDF itself handed to us by
//! mistake; that case gets its own error with a hint.

use crate::error::ExtractError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The argument that selects stdin instead of a file.
pub const STDIN_ARG: &str = "-";

/// Read the report named by `input` (a path, or `-` for stdin) into lines.
pub fn read_report(input: &str) -> Result<Vec<String>, ExtractError> {
    if input == STDIN_ARG {
        read_stdin()
    } else {
        read_local(Path::new(input))
    }
}

/// Read a local report file, mapping I/O failures to descriptive errors.
pub fn read_local(path: &Path) -> Result<Vec<String>, ExtractError> {
    let path_buf = path.to_path_buf();

    let bytes = std::fs::read(path).map_err(|e| io_error(path_buf.clone(), e))?;
    let text = String::from_utf8(bytes).map_err(|_| ExtractError::NotText {
        path: path_buf.clone(),
    })?;

    let lines = split_lines(&text);
    debug!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

fn read_stdin() -> Result<Vec<String>, ExtractError> {
    let path = PathBuf::from("<stdin>");
    let mut bytes = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .map_err(|e| io_error(path.clone(), e))?;
    let text = String::from_utf8(bytes).map_err(|_| ExtractError::NotText { path })?;

    let lines = split_lines(&text);
    debug!("Read {} lines from stdin", lines.len());
    Ok(lines)
}

/// Split report text into lines.
///
/// Drops a leading byte-order mark and treats `\r\n` and a lone `\r` as line
/// breaks. Line content is otherwise untouched: trimming is each stage's
/// decision.
pub fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .map(str::to_string)
        .collect()
}

fn io_error(path: PathBuf, e: std::io::Error) -> ExtractError {
    match e.kind() {
        std::io::ErrorKind::NotFound => ExtractError::FileNotFound { path },
        std::io::ErrorKind::PermissionDenied => ExtractError::PermissionDenied { path },
        _ => ExtractError::ReadFailed { path, source: e },
    }
}
