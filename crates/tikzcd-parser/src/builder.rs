//! Diagram builder: the state machine that turns tokens into a [`Diagram`].
//!
//! ```text
//!                 \begin{tikzcd}                \end{tikzcd}
//! AwaitingBegin ─────────────────► InGrid ─────────────────► Closed
//!      │                            │  & / \\ / label / arrow
//!      └─ ignores other tokens      └─ moves the cursor, records cells
//! ```
//!
//! Nodes and edges are recorded by grid position while scanning. Only once
//! the environment is closed are positions resolved to [`NodeId`]s, which is
//! also when empty nodes are created for arrow endpoints with no label.

use indexmap::IndexMap;
use log::{debug, trace};
use tikzcd_core::{
    geometry::GridPosition,
    identifier::{IdSource, NodeId},
    semantic::{Diagram, Edge, EdgeAttributes},
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    resolve::resolve_arrow,
    span::Span,
    tokens::{ArrowToken, PositionedArrowToken, PositionedToken, Token},
};

/// Builder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before `\begin{tikzcd}`; every other token is ignored.
    AwaitingBegin,
    /// Inside the environment. `begin` is the span of `\begin{tikzcd}`.
    InGrid { cursor: GridPosition, begin: Span },
    /// After `\end{tikzcd}`; remaining tokens are not consumed.
    Closed,
}

/// An edge whose endpoints are still grid positions.
#[derive(Debug, Clone)]
struct PendingEdge {
    source: GridPosition,
    target: GridPosition,
    attributes: EdgeAttributes,
}

/// Accumulates cells and edges while walking the token stream.
#[derive(Debug)]
pub(crate) struct Builder {
    state: State,
    nodes: IndexMap<GridPosition, String>,
    edges: Vec<PendingEdge>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            state: State::AwaitingBegin,
            nodes: IndexMap::new(),
            edges: Vec::new(),
        }
    }

    /// Feeds one token to the state machine.
    fn feed(&mut self, token: &PositionedToken<'_>) -> Result<()> {
        match self.state {
            State::AwaitingBegin => {
                if let Token::EnvironmentBegin { options } = &token.token {
                    if let Some(options) = options {
                        debug!(options; "Ignoring environment options");
                    }
                    self.state = State::InGrid {
                        cursor: GridPosition::default(),
                        begin: token.span,
                    };
                }
                Ok(())
            }
            State::InGrid { cursor, begin } => self.feed_in_grid(token, cursor, begin),
            State::Closed => Ok(()),
        }
    }

    fn feed_in_grid(
        &mut self,
        token: &PositionedToken<'_>,
        cursor: GridPosition,
        begin: Span,
    ) -> Result<()> {
        match &token.token {
            Token::ColumnSeparator => self.move_cursor(cursor.next_column(), begin),
            Token::RowSeparator => self.move_cursor(cursor.next_row(), begin),
            Token::NodeLabel(label) => {
                if let Some(previous) = self.nodes.insert(cursor, label.clone()) {
                    debug!(position = cursor.to_string(), previous; "Cell label overwritten");
                }
            }
            Token::Arrow(sub_tokens) => self.record_arrow(sub_tokens, token.span, cursor)?,
            Token::EnvironmentEnd => self.state = State::Closed,
            Token::EnvironmentBegin { .. } => {
                debug!(position = cursor.to_string(); "Ignoring nested environment begin");
            }
            Token::Whitespace | Token::Comment(_) => {}
        }
        Ok(())
    }

    fn move_cursor(&mut self, cursor: GridPosition, begin: Span) {
        self.state = State::InGrid { cursor, begin };
    }

    fn record_arrow(
        &mut self,
        sub_tokens: &[PositionedArrowToken<'_>],
        span: Span,
        cursor: GridPosition,
    ) -> Result<()> {
        let terminated = matches!(sub_tokens.last().map(|t| &t.token), Some(ArrowToken::End));
        if !terminated {
            return Err(Diagnostic::error("arrow does not terminate")
                .with_code(ErrorCode::E101)
                .with_label(span, "option list starts here")
                .with_help("close the option list with `]`"));
        }

        let resolved = resolve_arrow(sub_tokens);
        let target = if resolved.attributes.loop_().is_some() {
            cursor
        } else if resolved.offset.is_zero() {
            debug!(position = cursor.to_string(); "Skipping arrow without displacement");
            return Ok(());
        } else {
            cursor + resolved.offset
        };

        self.edges.push(PendingEdge {
            source: cursor,
            target,
            attributes: resolved.attributes,
        });
        Ok(())
    }

    /// Ends the token stream and materializes the diagram.
    ///
    /// `source_len` is the byte length of the markup; end-of-input errors
    /// point there.
    pub(crate) fn finish(self, source_len: usize, ids: &mut impl IdSource) -> Result<Diagram> {
        match self.state {
            State::AwaitingBegin => {
                return Err(Diagnostic::error("diagram environment not found")
                    .with_code(ErrorCode::E100)
                    .with_label(Span::new(0..0), "expected `\\begin{tikzcd}`")
                    .with_help("wrap the diagram in `\\begin{tikzcd}` ... `\\end{tikzcd}`"));
            }
            State::InGrid { begin, .. } => {
                return Err(Diagnostic::error("diagram environment not closed")
                    .with_code(ErrorCode::E102)
                    .with_label(Span::new(source_len..source_len), "input ends here")
                    .with_secondary_label(begin, "environment opened here")
                    .with_help("add `\\end{tikzcd}`"));
            }
            State::Closed => {}
        }

        let Builder {
            mut nodes, edges, ..
        } = self;

        for edge in &edges {
            for position in [edge.source, edge.target] {
                nodes.entry(position).or_default();
            }
        }

        let mut diagram = Diagram::new();
        let mut positions: IndexMap<GridPosition, NodeId> = IndexMap::with_capacity(nodes.len());
        for (position, label) in nodes {
            let id = diagram
                .insert_node(ids, position, label)
                .map_err(|err| duplicate_identity(&err))?;
            positions.insert(position, id);
        }

        for edge in edges {
            let source = positions[&edge.source];
            let target = positions[&edge.target];
            diagram
                .add_edge(Edge::new(source, target, edge.attributes))
                .map_err(|err| duplicate_identity(&err))?;
        }

        trace!(
            nodes = diagram.node_count(),
            edges = diagram.edge_count();
            "Built diagram"
        );
        Ok(diagram)
    }
}

/// Model invariants only break when the identity source repeats itself.
fn duplicate_identity(err: &tikzcd_core::semantic::DiagramError) -> Diagnostic {
    Diagnostic::error(err.to_string())
        .with_code(ErrorCode::E103)
        .with_label(Span::new(0..0), "while building the diagram")
        .with_help("the identity source must return a fresh id on every call")
}

/// Runs the builder over a token stream.
pub(crate) fn build(
    tokens: &[PositionedToken<'_>],
    source_len: usize,
    ids: &mut impl IdSource,
) -> Result<Diagram> {
    let mut builder = Builder::new();
    for token in tokens.iter().filter(|token| !token.token.is_trivia()) {
        if builder.state == State::Closed {
            break;
        }
        builder.feed(token)?;
    }
    builder.finish(source_len, ids)
}
