//! Version extraction from command output and web pages.

use regex::Regex;

use crate::error::{Result, VerwatchError};

/// Compile a version pattern.
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| VerwatchError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Apply `pattern` to `text` and return its first capture group.
///
/// An empty capture is a successful result. A first group that did not
/// take part in the match also yields an empty string.
pub fn extract(text: &str, pattern: &Regex) -> Result<String> {
    if pattern.captures_len() < 2 {
        return Err(VerwatchError::MissingCaptureGroup {
            pattern: pattern.as_str().to_string(),
        });
    }

    let captures = pattern
        .captures(text)
        .ok_or_else(|| VerwatchError::NoMatch {
            pattern: pattern.as_str().to_string(),
            text: text.to_string(),
        })?;

    Ok(captures
        .get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default())
}

/// Compile `pattern` and extract its first capture group from `text`.
pub fn extract_str(text: &str, pattern: &str) -> Result<String> {
    extract(text, &compile(pattern)?)
}
