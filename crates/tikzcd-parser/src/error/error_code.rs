//! Error codes for the tikzcd diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Builder errors

use std::fmt;

/// Broad category of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No scanner rule matched the input.
    Lexical,
    /// The input scanned, but does not form a complete diagram.
    Structural,
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated label.
    ///
    /// An arrow label was opened with `"` but never closed.
    E001,

    /// Unexpected character.
    ///
    /// No scanner rule accepts the character at this position.
    E002,

    // =========================================================================
    // Builder Errors (E1xx)
    // =========================================================================
    /// Diagram environment not found.
    ///
    /// The input contains no `\begin{tikzcd}`.
    E100,

    /// Arrow does not terminate.
    ///
    /// An `\arrow[` option list is missing its closing `]`.
    E101,

    /// Diagram environment not closed.
    ///
    /// The input ends before `\end{tikzcd}`.
    E102,

    /// Duplicate node identity.
    ///
    /// The identity source handed out the same id twice.
    E103,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            // Builder errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated label",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E100 => "diagram environment not found",
            ErrorCode::E101 => "arrow does not terminate",
            ErrorCode::E102 => "diagram environment not closed",
            ErrorCode::E103 => "duplicate node identity",
        }
    }

    /// Returns the category of failure this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E002 => ErrorKind::Lexical,
            ErrorCode::E001
            | ErrorCode::E100
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103 => ErrorKind::Structural,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
