//! Document-level lexical analyzer for tikzcd markup.
//!
//! The lexer converts markup into a flat stream of [`Token`]s. Arrow
//! directives are delegated to the [`arrow_lexer`](crate::arrow_lexer),
//! which returns a single [`Token::Arrow`] carrying the option sub-tokens.
//!
//! The public entry point is [`tokenize`]. It stops at the first error.

use log::trace;
use winnow::{
    Parser as _,
    ascii::multispace0,
    combinator::{alt, delimited, opt, preceded},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location as _, Stream},
    token::{literal, take_while},
};

use crate::{
    arrow_lexer,
    error::{Diagnostic, ErrorCode, Result},
    span::{LineIndex, Span},
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer errors.
///
/// Attached to winnow errors via `.context()` so that committed failures
/// carry their code, message and the offset where the failing construct
/// started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

pub(crate) type Input<'a> = LocatingSlice<&'a str>;
pub(crate) type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// Returns the unconsumed part of the input.
pub(crate) fn remaining<'a>(input: &Input<'a>) -> &'a str {
    input.peek_slice(input.eof_offset())
}

/// Checks for `\arrow`, optional whitespace, then `[`.
pub(crate) fn starts_arrow_command(text: &str) -> bool {
    text.strip_prefix("\\arrow")
        .is_some_and(|rest| rest.trim_start().starts_with('['))
}

fn starts_environment(text: &str, command: &str) -> bool {
    text.strip_prefix(command)
        .is_some_and(|rest| rest.trim_start().starts_with("{tikzcd}"))
}

fn starts_environment_begin(text: &str) -> bool {
    starts_environment(text, "\\begin")
}

fn starts_environment_end(text: &str) -> bool {
    starts_environment(text, "\\end")
}

/// Checks for a marker that ends an unterminated arrow: `&`, `\\` or `\end`.
pub(crate) fn starts_structural_marker(text: &str) -> bool {
    text.starts_with('&') || text.starts_with("\\\\") || text.starts_with("\\end")
}

/// Byte offset of the `}` matching the `{` that opens `text`.
///
/// A backslash escapes the character after it.
fn matching_brace_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = text.char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Removes one outer brace pair when the first `{` is closed by the final `}`.
pub(crate) fn strip_wrapping_braces(text: &str) -> &str {
    if text.starts_with('{') && matching_brace_end(text) == Some(text.len() - 1) {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Trims surrounding whitespace, keeping one whitespace character escaped by
/// a trailing backslash.
fn trim_label(raw: &str) -> &str {
    let leading_trimmed = raw.trim_start();
    let trimmed = leading_trimmed.trim_end();
    let trailing_backslashes = trimmed.chars().rev().take_while(|&c| c == '\\').count();
    if trailing_backslashes % 2 == 0 {
        return trimmed;
    }
    match leading_trimmed[trimmed.len()..].chars().next() {
        Some(escaped) => &leading_trimmed[..trimmed.len() + escaped.len_utf8()],
        None => trimmed,
    }
}

/// Length in bytes of the node label at the start of `text`.
fn node_label_len(text: &str) -> usize {
    let mut depth = 0usize;
    let mut offset = 0;
    while offset < text.len() {
        let rest = &text[offset..];
        if starts_environment_end(rest) {
            break;
        }
        if depth == 0
            && (rest.starts_with('&')
                || rest.starts_with('%')
                || rest.starts_with("\\\\")
                || starts_arrow_command(rest)
                || starts_environment_begin(rest))
        {
            break;
        }

        let mut chars = rest.chars();
        let Some(c) = chars.next() else {
            break;
        };
        offset += c.len_utf8();
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    offset += escaped.len_utf8();
                }
            }
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    offset
}

/// Parse a node label
fn node_label<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let len = node_label_len(remaining(input));
    if len == 0 {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }
    let raw = input.next_slice(len);
    let label = strip_wrapping_braces(trim_label(raw));
    Ok(Token::NodeLabel(label.to_string()))
}

/// Parse whitespace, newlines included
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., char::is_whitespace)
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse line comment starting with '%'
fn comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded('%', take_while(0.., |c| c != '\n'))
        .map(Token::Comment)
        .parse_next(input)
}

/// Parse `\begin{tikzcd}` with an optional `[...]` option list
fn environment_begin<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded(
        (literal("\\begin"), multispace0, literal("{tikzcd}")),
        opt(delimited('[', take_while(0.., |c| c != ']'), ']')),
    )
    .map(|options| Token::EnvironmentBegin { options })
    .parse_next(input)
}

/// Parse `\end{tikzcd}`
fn environment_end<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    (literal("\\end"), multispace0, literal("{tikzcd}"))
        .value(Token::EnvironmentEnd)
        .parse_next(input)
}

fn column_separator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '&'.value(Token::ColumnSeparator).parse_next(input)
}

/// Parse `\\`, swallowing an optional `[<length>]` row spacing
fn row_separator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    (
        literal("\\\\"),
        opt(delimited('[', take_while(0.., |c| c != ']'), ']')),
    )
        .value(Token::RowSeparator)
        .parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        whitespace,
        comment,
        environment_begin, // Must come before node_label
        environment_end,   // Must come before node_label
        node_label,
        arrow_lexer::arrow,
        column_separator,
        row_separator,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Convert an ErrMode and error position to a Diagnostic.
///
/// Extracts `LexerDiagnostic` from the error context. Falls back to E002
/// (unexpected character) if no diagnostic context is found.
fn convert_err_mode(
    err: ErrMode<ContextError<LexerDiagnostic>>,
    error_pos: usize,
    source: &str,
) -> Diagnostic {
    let context_error = match err {
        ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
        ErrMode::Incomplete(_) => ContextError::new(),
    };
    let char_end = |pos: usize| {
        pos + source
            .get(pos..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8)
    };

    if let Some(LexerDiagnostic {
        code,
        message,
        help,
        start,
    }) = context_error.context().next()
    {
        let end = if error_pos > *start {
            error_pos
        } else {
            char_end(*start)
        };
        let mut diag = Diagnostic::error(*message)
            .with_code(*code)
            .with_label(Span::new(*start..end), code.description());
        if let Some(h) = help {
            diag = diag.with_help(*h);
        }
        return diag;
    }

    let span = Span::new(error_pos..char_end(error_pos));
    Diagnostic::error("unexpected character")
        .with_code(ErrorCode::E002)
        .with_label(span, ErrorCode::E002.description())
}

/// Attaches line/column locations to a token and its arrow sub-tokens.
fn locate(token: &mut PositionedToken<'_>, index: &LineIndex<'_>) {
    token.location = index.location(token.span.start());
    if let Token::Arrow(sub_tokens) = &mut token.token {
        for sub_token in sub_tokens {
            sub_token.location = index.location(sub_token.span.start());
        }
    }
}

/// Split markup into document tokens.
///
/// # Errors
///
/// Returns the diagnostic of the first construct that cannot be scanned:
/// E001 for an unterminated arrow label, E002 for a character no rule
/// accepts.
pub(crate) fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>> {
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();

    while input.eof_offset() > 0 {
        match positioned_token(&mut input) {
            Ok(token) => tokens.push(token),
            Err(err) => {
                let error_pos = input.current_token_start();
                return Err(convert_err_mode(err, error_pos, source));
            }
        }
    }

    let index = LineIndex::new(source);
    for token in &mut tokens {
        locate(token, &index);
    }

    trace!(tokens = tokens.len(); "Tokenized markup");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{span::Location, tokens::ArrowToken};

    fn test_single_token(input: &str, expected: Token<'_>) {
        let mut located_input = LocatingSlice::new(input);
        let result = positioned_token(&mut located_input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
        let positioned = result.unwrap();
        assert_eq!(positioned.token, expected);
    }

    fn token_kinds(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .expect("input should tokenize")
            .into_iter()
            .map(|positioned| positioned.token)
            .collect()
    }

    #[test]
    fn test_environment_tokens() {
        test_single_token(
            "\\begin{tikzcd}",
            Token::EnvironmentBegin { options: None },
        );
        test_single_token(
            "\\begin {tikzcd}[row sep=large]",
            Token::EnvironmentBegin {
                options: Some("row sep=large"),
            },
        );
        test_single_token("\\end{tikzcd}", Token::EnvironmentEnd);
        test_single_token("\\end  {tikzcd}", Token::EnvironmentEnd);
    }

    #[test]
    fn test_separators() {
        test_single_token("&", Token::ColumnSeparator);
        test_single_token("\\\\", Token::RowSeparator);
        test_single_token("\\\\[2em]", Token::RowSeparator);
    }

    #[test]
    fn test_comment() {
        test_single_token("% a note", Token::Comment(" a note"));
        test_single_token("%", Token::Comment(""));
    }

    #[test]
    fn test_node_label_stops_at_structure() {
        test_single_token("A & B", Token::NodeLabel("A".to_string()));
        test_single_token("A \\\\ B", Token::NodeLabel("A".to_string()));
        test_single_token("A % note", Token::NodeLabel("A".to_string()));
        test_single_token("A \\arrow[r]", Token::NodeLabel("A".to_string()));
        test_single_token("A \\arrow  [r]", Token::NodeLabel("A".to_string()));
        test_single_token("A\\end{tikzcd}", Token::NodeLabel("A".to_string()));
    }

    #[test]
    fn test_node_label_escapes() {
        test_single_token("a \\& b & c", Token::NodeLabel("a \\& b".to_string()));
        test_single_token("50\\% & c", Token::NodeLabel("50\\%".to_string()));
        test_single_token("x\\  & c", Token::NodeLabel("x\\ ".to_string()));
    }

    #[test]
    fn test_node_label_braces() {
        test_single_token("{A & B} & C", Token::NodeLabel("A & B".to_string()));
        test_single_token("{a}b{c} & C", Token::NodeLabel("{a}b{c}".to_string()));
        test_single_token("{ } & C", Token::NodeLabel(" ".to_string()));
        test_single_token("{} & C", Token::NodeLabel(String::new()));
        test_single_token(
            "{\\mathbb{Z}} & C",
            Token::NodeLabel("\\mathbb{Z}".to_string()),
        );
    }

    #[test]
    fn test_arrow_is_single_token() {
        let tokens = token_kinds("\\arrow[r]");
        assert_eq!(tokens.len(), 1);
        let Token::Arrow(sub_tokens) = &tokens[0] else {
            panic!("expected an arrow token, got {:?}", tokens[0]);
        };
        let kinds: Vec<_> = sub_tokens.iter().map(|t| t.token.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ArrowToken::Command,
                ArrowToken::Direction("r"),
                ArrowToken::End
            ]
        );
    }

    #[test]
    fn test_full_lexing() {
        let tokens = token_kinds("\\begin{tikzcd}\nA \\arrow[r] & B\n\\end{tikzcd}");

        assert!(matches!(tokens[0], Token::EnvironmentBegin { .. }));
        assert!(matches!(tokens[1], Token::Whitespace));
        assert_eq!(tokens[2], Token::NodeLabel("A".to_string()));
        assert!(matches!(tokens[3], Token::Arrow(_)));
        assert!(matches!(tokens[4], Token::Whitespace));
        assert!(matches!(tokens[5], Token::ColumnSeparator));
        assert!(matches!(tokens[6], Token::Whitespace));
        assert_eq!(tokens[7], Token::NodeLabel("B".to_string()));
        assert!(matches!(tokens[8], Token::EnvironmentEnd));
        assert_eq!(tokens.len(), 9);
    }

    #[test]
    fn test_span_and_location_tracking() {
        let tokens = tokenize("A &\n  B").unwrap();

        assert_eq!(tokens[0].span, Span::new(0..2));
        assert_eq!(tokens[1].span, Span::new(2..3));
        assert_eq!(tokens[3].span, Span::new(6..7));
        assert_eq!(tokens[3].location, Location::new(2, 3));
    }

    #[test]
    fn test_arrow_sub_token_locations() {
        let tokens = tokenize("A\n \\arrow[r]").unwrap();
        // the label swallows the whitespace before the arrow
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].span, Span::new(0..3));
        let Token::Arrow(sub_tokens) = &tokens[1].token else {
            panic!("expected an arrow token");
        };

        assert_eq!(tokens[1].location, Location::new(2, 2));
        assert_eq!(sub_tokens[1].span, Span::new(10..11));
        assert_eq!(sub_tokens[1].location, Location::new(2, 9));
    }

    #[test]
    fn test_unterminated_label_error() {
        let err = tokenize("\\arrow[r, \"f]").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E001));
        let label = err.primary_label().expect("primary label");
        assert_eq!(label.span(), Span::new(10..13));
    }

    #[test]
    fn test_unexpected_character_error() {
        let err = tokenize("A \\arrow[r, =x]").unwrap_err();

        assert_eq!(err.code(), Some(ErrorCode::E002));
        let label = err.primary_label().expect("primary label");
        assert_eq!(label.span(), Span::new(12..13));
    }

    #[test]
    fn test_strip_wrapping_braces() {
        assert_eq!(strip_wrapping_braces("{a}"), "a");
        assert_eq!(strip_wrapping_braces("{a}{b}"), "{a}{b}");
        assert_eq!(strip_wrapping_braces("{a\\}}"), "a\\}");
        assert_eq!(strip_wrapping_braces("a"), "a");
        assert_eq!(strip_wrapping_braces("{"), "{");
    }
}
