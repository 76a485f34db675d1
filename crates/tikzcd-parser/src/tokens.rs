//! Token types produced by the lexer.
//!
//! The document scanner yields [`Token`]s. An arrow directive is a single
//! [`Token::Arrow`] that owns the [`ArrowToken`]s of its option list, so the
//! builder sees one token per `\arrow[...]`.

use std::fmt;

use crate::span::{Location, Span};

/// A document-level token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Whitespace,
    /// `%` line comment; holds the text after the `%`.
    Comment(&'a str),
    /// `\begin{tikzcd}`, with the raw text of an optional `[...]` option list.
    EnvironmentBegin { options: Option<&'a str> },
    /// `\end{tikzcd}`.
    EnvironmentEnd,
    /// Cell content, trimmed and with one outer brace pair removed.
    NodeLabel(String),
    /// `&`
    ColumnSeparator,
    /// `\\`
    RowSeparator,
    /// `\arrow[...]`. The last sub-token is [`ArrowToken::End`] unless the
    /// option list is unterminated.
    Arrow(Vec<PositionedArrowToken<'a>>),
}

impl Token<'_> {
    /// Checks if this token carries no meaning for the builder.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Comment(_))
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Whitespace => write!(f, "whitespace"),
            Token::Comment(_) => write!(f, "comment"),
            Token::EnvironmentBegin { .. } => write!(f, "\\begin{{tikzcd}}"),
            Token::EnvironmentEnd => write!(f, "\\end{{tikzcd}}"),
            Token::NodeLabel(label) => write!(f, "node label {label:?}"),
            Token::ColumnSeparator => write!(f, "&"),
            Token::RowSeparator => write!(f, "\\\\"),
            Token::Arrow(_) => write!(f, "\\arrow"),
        }
    }
}

/// A token inside an arrow option list.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowToken<'a> {
    Whitespace,
    /// `,`
    Comma,
    /// `\arrow[`, possibly with whitespace before the bracket.
    Command,
    /// `]`
    End,
    /// `'`
    Alternate,
    /// A run of `l`, `r`, `u`, `d`.
    Direction(&'a str),
    /// One or more words separated by single spaces, such as `bend left`.
    ArgumentName(&'a str),
    /// The number of an `=value` suffix, without its unit.
    ArgumentValue(f64),
    /// A quoted label with its outer braces removed when they wrapped it.
    Label(String),
}

/// A token with its byte span and the line/column where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Positioned<T> {
    pub token: T,
    pub span: Span,
    pub location: Location,
}

impl<T> Positioned<T> {
    /// Wraps a token. The location is filled in once the whole input has
    /// been scanned.
    pub fn new(token: T, span: Span) -> Self {
        Self {
            token,
            span,
            location: Location::default(),
        }
    }
}

pub type PositionedToken<'a> = Positioned<Token<'a>>;
pub type PositionedArrowToken<'a> = Positioned<ArrowToken<'a>>;
