//! Error types for tikzcd operations.
//!
//! This module provides the main error type [`TikzcdError`] which wraps the
//! failures of parsing and of permalink decoding.

use thiserror::Error;

use tikzcd_parser::error::ParseError;

use crate::codec::CodecError;

/// The main error type for tikzcd operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the markup it failed on next to the structured
/// [`ParseError`], so callers can render the diagnostic against its source.
#[derive(Debug, Error)]
pub enum TikzcdError {
    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}

impl TikzcdError {
    /// Create a new `Parse` error with the associated source markup.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
