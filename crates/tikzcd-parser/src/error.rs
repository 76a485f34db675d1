//! Error and diagnostic system for the tikzcd parser.
//!
//! Parsing stops at the first problem it finds. That problem is described by
//! a single [`Diagnostic`]: an [`ErrorCode`], a message, one or more
//! [`Label`]ed byte spans and, once the source is known, a 1-based line and
//! column. [`ParseError`] wraps the diagnostic for callers of
//! [`parse`](crate::parse).
//!
//! # Example
//!
//! ```
//! # use tikzcd_parser::error::{Diagnostic, ErrorCode};
//! # use tikzcd_parser::Span;
//!
//! let diag = Diagnostic::error("diagram environment not closed")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(40..40), "input ends here")
//!     .with_secondary_label(Span::new(0..14), "environment opened here")
//!     .with_help("add `\\end{tikzcd}`");
//!
//! assert_eq!(diag.to_string(), "error[E102]: diagram environment not closed");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind};
pub use label::Label;
pub use parse_error::ParseError;
