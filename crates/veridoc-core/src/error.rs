//! # Error Types
//!
//! Parse failures are the only error this crate produces: format
//! detection and whitespace auditing are total functions over arbitrary
//! bytes.

use thiserror::Error;

/// The input bytes could not be parsed into a document tree.
///
/// The message is the parser's own description, including the offending
/// position where the scanner reports one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
