use std::io::Write;
use std::process::{Command, Stdio};

use serde::Serialize;

use crate::error::{AppError, JqError};

/// Print a value as pretty JSON, optionally filtered through jq
pub(crate) fn emit_json<T: Serialize + ?Sized>(value: &T, jq: Option<&str>) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value).map_err(AppError::Encode)?;
    match jq {
        Some(filter) => print!("{}", filter_json(&json, filter)?),
        None => println!("{json}"),
    }
    Ok(())
}

/// Pipe JSON through jq with the given filter expression
fn filter_json(json: &str, filter: &str) -> Result<String, JqError> {
    let mut child = Command::new("jq")
        .arg(filter)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => JqError::NotFound,
            _ => JqError::Spawn(e),
        })?;

    // Drop stdin before waiting so jq sees EOF
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(json.as_bytes()).map_err(JqError::Stdin)?;
    }

    let output = child.wait_with_output().map_err(JqError::Wait)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(JqError::Filter(stderr.trim().to_string()));
    }
    String::from_utf8(output.stdout).map_err(JqError::Utf8)
}
