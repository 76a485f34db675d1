//! # tikzcd Parser
//!
//! Reads `tikzcd` commutative-diagram markup into the semantic
//! [`Diagram`](tikzcd_core::semantic::Diagram) model.
//!
//! ## Usage
//!
//! ```
//! # use tikzcd_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let markup = r#"
//!         \begin{tikzcd}
//!             A \arrow[r, "f"] & B
//!         \end{tikzcd}
//!     "#;
//!
//!     let diagram = parse(markup)?;
//!     assert_eq!(diagram.node_count(), 2);
//!     assert_eq!(diagram.edge_count(), 1);
//!     Ok(())
//! }
//! ```

mod arrow_lexer;
mod builder;
pub mod error;
mod lexer;
mod resolve;
pub mod span;
pub mod tokens;

pub use error::ParseError;
pub use span::Span;

use tikzcd_core::{
    identifier::{IdSource, SequentialIds},
    semantic::Diagram,
};

use error::Diagnostic;
use span::LineIndex;
use tokens::PositionedToken;

/// Fills in the line/column of a diagnostic from its primary label.
fn locate(diagnostic: Diagnostic, source: &str) -> ParseError {
    let location = diagnostic
        .primary_label()
        .map(|label| LineIndex::new(source).location(label.span().start()));
    match location {
        Some(location) => diagnostic.with_location(location).into(),
        None => diagnostic.into(),
    }
}

/// Split markup into document tokens.
///
/// Arrow directives come back as a single [`Token::Arrow`](tokens::Token::Arrow)
/// holding their option sub-tokens. Every token carries its byte span and
/// 1-based line/column.
///
/// # Errors
///
/// Fails with E001 on an unterminated arrow label and E002 on a character
/// that no scanner rule accepts.
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    lexer::tokenize(source).map_err(|diag| locate(diag, source))
}

/// Parse markup into a diagram, numbering nodes from zero.
///
/// See [`parse_with_ids`].
pub fn parse(source: &str) -> Result<Diagram, ParseError> {
    parse_with_ids(source, &mut SequentialIds::default())
}

/// Parse markup into a diagram, drawing node ids from `ids`.
///
/// Only the first `\begin{tikzcd}` ... `\end{tikzcd}` environment is read.
/// Nodes receive ids in the order their cells first appear, followed by the
/// empty nodes created for arrow endpoints without a label.
///
/// # Errors
///
/// Returns a [`ParseError`] whose diagnostic names the first problem found:
///
/// | code | cause |
/// |------|-------|
/// | E001 | unterminated arrow label |
/// | E002 | unexpected character in an arrow option list |
/// | E100 | no `\begin{tikzcd}` |
/// | E101 | `\arrow[` without its closing `]` |
/// | E102 | no `\end{tikzcd}` |
/// | E103 | `ids` returned an id twice |
pub fn parse_with_ids(source: &str, ids: &mut impl IdSource) -> Result<Diagram, ParseError> {
    let tokens = tokenize(source)?;
    builder::build(&tokens, source.len(), ids).map_err(|diag| locate(diag, source))
}
