//! Protocol codec
//!
//! Encoding and decoding functions for the JSON-lines protocol.
//!
//! ## Wire Format
//! ```text
//! ┌───────────────────────────────┬────┐
//! │ JSON object (single line)     │ \n │
//! └───────────────────────────────┴────┘
//! ```
//! Blank lines between frames are ignored when reading.

use std::io::{BufRead, Write};

use crate::error::{GroceryError, Result};

use super::{Command, Response};

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command as one line (without the trailing newline)
pub fn encode_command(command: &Command) -> Result<String> {
    Ok(serde_json::to_string(command)?)
}

/// Decode a command from one line
pub fn decode_command(line: &str) -> Result<Command> {
    serde_json::from_str(line.trim())
        .map_err(|e| GroceryError::Protocol(format!("invalid command: {}", e)))
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response as one line (without the trailing newline)
pub fn encode_response(response: &Response) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Decode a response from one line
pub fn decode_response(line: &str) -> Result<Response> {
    serde_json::from_str(line.trim())
        .map_err(|e| GroceryError::Protocol(format!("invalid response: {}", e)))
}

// =============================================================================
// Stream Helpers
// =============================================================================

/// Read the next command from a stream
///
/// Returns `Ok(None)` at end of input.
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<Option<Command>> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            return decode_command(&line).map(Some);
        }
    }
}

/// Write a response followed by a newline and flush
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let line = encode_response(response)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
