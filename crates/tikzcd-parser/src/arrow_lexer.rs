//! Lexical analyzer for `\arrow[...]` option lists.
//!
//! The document lexer hands over when the input starts with `\arrow[`.
//! [`arrow`] then scans option sub-tokens until the closing `]`. Every
//! sub-token span is an absolute byte range into the markup, because both
//! scanners share one [`LocatingSlice`](winnow::stream::LocatingSlice).
//!
//! An option list that runs into the end of input, a column or row
//! separator, `\end` or another `\arrow[` is returned without its `]`; the
//! builder reports it as unterminated.

use winnow::{
    Parser as _,
    ascii::{alpha1, digit1, multispace0},
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode},
    stream::{Location as _, Stream},
    token::{literal, one_of, take_while},
};

use crate::{
    error::ErrorCode,
    lexer::{
        IResult, Input, LexerDiagnostic, remaining, starts_arrow_command,
        starts_structural_marker, strip_wrapping_braces,
    },
    span::Span,
    tokens::{ArrowToken, PositionedArrowToken, Token},
};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    take_while(1.., char::is_whitespace)
        .value(ArrowToken::Whitespace)
        .parse_next(input)
}

fn comma<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    ','.value(ArrowToken::Comma).parse_next(input)
}

/// Parse `\arrow[` with optional whitespace before the bracket
fn command<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    (literal("\\arrow"), multispace0, '[')
        .value(ArrowToken::Command)
        .parse_next(input)
}

fn end<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    ']'.value(ArrowToken::End).parse_next(input)
}

fn alternate<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    '\''.value(ArrowToken::Alternate).parse_next(input)
}

/// Parse a direction code such as `rrd`, not followed by a word character
fn direction<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    terminated(
        take_while(1.., ['l', 'r', 'u', 'd']),
        peek(not(one_of(is_word_char))),
    )
    .map(ArrowToken::Direction)
    .parse_next(input)
}

/// Parse an option name: letter runs joined by single spaces, e.g. `very near start`
fn argument_name<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    (alpha1, repeat::<_, _, (), _, _>(0.., (' ', alpha1)))
        .take()
        .map(ArrowToken::ArgumentName)
        .parse_next(input)
}

/// Parse a length unit after an option value
fn unit<'a>(input: &mut Input<'a>) -> IResult<'a, &'a str> {
    alt((
        literal("em"),
        literal("ex"),
        literal("pt"),
        literal("mm"),
        literal("cm"),
        literal("bp"),
        literal("in"),
    ))
    .parse_next(input)
}

/// Parse `=` followed by a signed decimal number and an optional unit
fn argument_value<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    preceded(
        ('=', multispace0),
        terminated(
            (opt('-'), digit1, opt(('.', digit1))).take(),
            opt(unit),
        ),
    )
    .try_map(|number: &str| number.parse::<f64>())
    .map(ArrowToken::ArgumentValue)
    .parse_next(input)
}

/// Byte length of label content up to (not including) the closing quote.
///
/// A backslash always escapes the next character. Content opening with `{`
/// is brace-balanced: quotes nested in braces do not close the label.
/// Otherwise the first unescaped quote closes it.
fn label_len(text: &str) -> Option<usize> {
    let balanced = text.starts_with('{');
    let mut depth = 0usize;
    let mut chars = text.char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' if balanced => depth += 1,
            '}' if balanced => depth = depth.saturating_sub(1),
            '"' if depth == 0 => return Some(offset),
            _ => {}
        }
    }
    None
}

/// Parse label content and its closing quote.
///
/// An unterminated label consumes the rest of the input so the committed
/// error spans from the opening quote to the end.
fn label_body<'a>(input: &mut Input<'a>) -> IResult<'a, String> {
    let Some(len) = label_len(remaining(input)) else {
        input.next_slice(input.eof_offset());
        return Err(ErrMode::Backtrack(ContextError::new()));
    };
    let content = input.next_slice(len);
    let closing: IResult<'a, char> = '"'.parse_next(input);
    closing?;
    Ok(strip_wrapping_braces(content).to_string())
}

/// Parse a quoted label
fn label<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    let start_pos = input.current_token_start();

    let opening: IResult<'a, char> = '"'.parse_next(input);
    opening?;

    cut_err(label_body)
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated label",
            help: Some("add the closing `\"`"),
            start: start_pos,
        })
        .map(ArrowToken::Label)
        .parse_next(input)
}

/// Parse a single option sub-token
fn arrow_option<'a>(input: &mut Input<'a>) -> IResult<'a, ArrowToken<'a>> {
    alt((
        whitespace,
        comma,
        command,
        end,
        alternate,
        direction, // Must come before argument_name
        argument_name,
        argument_value,
        label,
    ))
    .parse_next(input)
}

/// Parse an `\arrow[...]` directive into a single [`Token::Arrow`].
pub(crate) fn arrow<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    if !starts_arrow_command(remaining(input)) {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }

    let mut sub_tokens: Vec<PositionedArrowToken<'a>> = Vec::new();
    loop {
        let rest = remaining(input);
        if rest.is_empty() || (!sub_tokens.is_empty() && starts_arrow_command(rest)) {
            break;
        }

        let start_pos = input.current_token_start();
        let checkpoint = input.checkpoint();
        match arrow_option(input) {
            Ok(token) => {
                let closed = matches!(token, ArrowToken::End);
                let end_pos = input.current_token_start();
                sub_tokens.push(PositionedArrowToken::new(
                    token,
                    Span::new(start_pos..end_pos),
                ));
                if closed {
                    break;
                }
            }
            Err(ErrMode::Backtrack(_)) => {
                input.reset(&checkpoint);
                if starts_structural_marker(rest) {
                    break;
                }
                return Err(ErrMode::Cut(ContextError::new().add_context(
                    input,
                    &checkpoint,
                    LexerDiagnostic {
                        code: ErrorCode::E002,
                        message: "unexpected character in arrow options",
                        help: Some("arrow options are direction codes, option names, `=value`s and quoted labels"),
                        start: start_pos,
                    },
                )));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(Token::Arrow(sub_tokens))
}

#[cfg(test)]
mod tests {
    use winnow::stream::LocatingSlice;

    use super::*;

    fn sub_tokens(input: &str) -> Vec<ArrowToken<'_>> {
        let mut located_input = LocatingSlice::new(input);
        let token = arrow(&mut located_input).expect("arrow should scan");
        let Token::Arrow(sub_tokens) = token else {
            panic!("expected an arrow token");
        };
        sub_tokens.into_iter().map(|t| t.token).collect()
    }

    fn significant(input: &str) -> Vec<ArrowToken<'_>> {
        sub_tokens(input)
            .into_iter()
            .filter(|t| !matches!(t, ArrowToken::Whitespace | ArrowToken::Comma))
            .collect()
    }

    #[test]
    fn test_direction_and_options() {
        assert_eq!(
            significant("\\arrow[rd, dashed, bend left=20]"),
            vec![
                ArrowToken::Command,
                ArrowToken::Direction("rd"),
                ArrowToken::ArgumentName("dashed"),
                ArrowToken::ArgumentName("bend left"),
                ArrowToken::ArgumentValue(20.0),
                ArrowToken::End,
            ]
        );
    }

    #[test]
    fn test_direction_requires_word_boundary() {
        assert_eq!(
            significant("\\arrow[dotted]"),
            vec![
                ArrowToken::Command,
                ArrowToken::ArgumentName("dotted"),
                ArrowToken::End,
            ]
        );
        assert_eq!(
            significant("\\arrow[rr']"),
            vec![
                ArrowToken::Command,
                ArrowToken::Direction("rr"),
                ArrowToken::Alternate,
                ArrowToken::End,
            ]
        );
    }

    #[test]
    fn test_argument_name_single_spaces() {
        assert_eq!(
            significant("\\arrow[very near start]"),
            vec![
                ArrowToken::Command,
                ArrowToken::ArgumentName("very near start"),
                ArrowToken::End,
            ]
        );
        assert_eq!(
            significant("\\arrow[bend  left]"),
            vec![
                ArrowToken::Command,
                ArrowToken::ArgumentName("bend"),
                ArrowToken::ArgumentName("left"),
                ArrowToken::End,
            ]
        );
    }

    #[test]
    fn test_argument_values_with_units() {
        assert_eq!(
            significant("\\arrow[distance=2em, in=-45, out= 1.5pt]"),
            vec![
                ArrowToken::Command,
                ArrowToken::ArgumentName("distance"),
                ArrowToken::ArgumentValue(2.0),
                ArrowToken::ArgumentName("in"),
                ArrowToken::ArgumentValue(-45.0),
                ArrowToken::ArgumentName("out"),
                ArrowToken::ArgumentValue(1.5),
                ArrowToken::End,
            ]
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            significant("\\arrow[r, \"f\"']"),
            vec![
                ArrowToken::Command,
                ArrowToken::Direction("r"),
                ArrowToken::Label("f".to_string()),
                ArrowToken::Alternate,
                ArrowToken::End,
            ]
        );
        assert_eq!(
            significant("\\arrow[\"{a, \"b\"}\" description]"),
            vec![
                ArrowToken::Command,
                ArrowToken::Label("a, \"b\"".to_string()),
                ArrowToken::ArgumentName("description"),
                ArrowToken::End,
            ]
        );
        assert_eq!(
            significant("\\arrow[\"{a}b\"]"),
            vec![
                ArrowToken::Command,
                ArrowToken::Label("{a}b".to_string()),
                ArrowToken::End,
            ]
        );
        assert_eq!(
            significant("\\arrow[\"\"]"),
            vec![
                ArrowToken::Command,
                ArrowToken::Label(String::new()),
                ArrowToken::End,
            ]
        );
    }

    #[test]
    fn test_label_backslash_escapes() {
        assert_eq!(
            significant(r#"\arrow[r, "a\"b"]"#),
            vec![
                ArrowToken::Command,
                ArrowToken::Direction("r"),
                ArrowToken::Label(r#"a\"b"#.to_string()),
                ArrowToken::End,
            ]
        );
        assert_eq!(
            significant(r#"\arrow["\{x\}", dashed]"#),
            vec![
                ArrowToken::Command,
                ArrowToken::Label(r"\{x\}".to_string()),
                ArrowToken::ArgumentName("dashed"),
                ArrowToken::End,
            ]
        );
    }

    #[test]
    fn test_unterminated_at_structural_marker() {
        assert_eq!(
            significant("\\arrow[r & B"),
            vec![ArrowToken::Command, ArrowToken::Direction("r")]
        );
        assert_eq!(
            significant("\\arrow[r \\end{tikzcd}"),
            vec![ArrowToken::Command, ArrowToken::Direction("r")]
        );
        assert_eq!(
            significant("\\arrow[r"),
            vec![ArrowToken::Command, ArrowToken::Direction("r")]
        );
        assert_eq!(
            significant("\\arrow[r \\arrow[d]"),
            vec![ArrowToken::Command, ArrowToken::Direction("r")]
        );
    }

    #[test]
    fn test_stops_after_closing_bracket() {
        let mut located_input = LocatingSlice::new("\\arrow[r] & B");
        arrow(&mut located_input).expect("arrow should scan");
        assert_eq!(remaining(&located_input), " & B");
    }

    #[test]
    fn test_unexpected_character_is_committed() {
        let mut located_input = LocatingSlice::new("\\arrow[r, #]");
        let err = arrow(&mut located_input).unwrap_err();
        assert!(matches!(err, ErrMode::Cut(_)));
    }
}
