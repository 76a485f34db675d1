//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the markup.
///
/// The primary label marks where the problem is; secondary labels point at
/// related places, such as the `\begin{tikzcd}` of an environment that is
/// never closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_kinds() {
        let primary = Label::primary(Span::new(3..9), "arrow starts here");
        let secondary = Label::secondary(Span::new(0..1), "opened here");

        assert!(primary.is_primary());
        assert_eq!(primary.span().start(), 3);
        assert_eq!(primary.message(), "arrow starts here");
        assert!(secondary.is_secondary());
    }
}
