//! The ParseError type returned by the parsing entry points.

use std::fmt;

use crate::{
    error::{Diagnostic, ErrorCode, ErrorKind},
    span::Location,
};

/// A type alias for `Result<T, Diagnostic>`.
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// Error type for the parsing lifecycle.
///
/// Parsing aborts at the first problem, so a `ParseError` always carries
/// exactly one diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    diagnostic: Diagnostic,
}

impl ParseError {
    /// Get the diagnostic describing the failure.
    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    /// Get the error code of the diagnostic.
    pub fn code(&self) -> Option<ErrorCode> {
        self.diagnostic.code()
    }

    /// Whether the failure is lexical or structural.
    pub fn kind(&self) -> ErrorKind {
        self.diagnostic
            .code()
            .map_or(ErrorKind::Structural, |code| code.kind())
    }

    /// 1-based line/column of the failure.
    pub fn location(&self) -> Option<Location> {
        self.diagnostic.location()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diagnostic)
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self { diagnostic }
    }
}
