//! Output handling for the CLI
//!
//! Plain mode prints human-readable lines. JSON mode prints one
//! `{"status": ..., "data": ...}` object per line instead. UTF-8 only.

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::CliResult;
use crate::record::LogRecord;

/// Result sink for one CLI invocation
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    /// Create an output in plain or JSON mode
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// True in JSON mode
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Report an outcome: `text` in plain mode, `data` in JSON mode
    pub fn outcome(&self, text: &str, data: Value) -> CliResult<()> {
        if self.json {
            write_response(data)
        } else {
            write_line(text)
        }
    }

    /// Report one consumed record
    pub fn record(&self, record: &LogRecord) -> CliResult<()> {
        let payload = record.payload_lossy();
        if self.json {
            write_response(json!({ "id": record.id, "payload": payload }))
        } else {
            write_line(&format!("{}: {}", record.id, payload))
        }
    }

    /// Report a failure on stdout; JSON mode only
    pub fn failure(&self, code: &str, message: &str) -> CliResult<()> {
        if self.json {
            write_error(code, message)
        } else {
            Ok(())
        }
    }
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message
    });

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write one plain line to stdout
pub fn write_line(line: &str) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;

    Ok(())
}
