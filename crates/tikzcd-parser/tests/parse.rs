use tikzcd_core::geometry::GridPosition;
use tikzcd_core::identifier::{NodeId, SequentialIds};
use tikzcd_core::semantic::{
    Diagram, EdgeAttributes, HeadStyle, LabelAlong, LabelPlacement, LineStyle, TailStyle,
};
use tikzcd_parser::error::{ErrorCode, ErrorKind};
use tikzcd_parser::span::Location;
use tikzcd_parser::{parse, parse_with_ids, tokenize};

fn label_at(diagram: &Diagram, column: i32, row: i32) -> Option<&str> {
    diagram
        .node_at(GridPosition::new(column, row))
        .map(|node| node.label())
}

#[test]
fn test_grid_adjacency() {
    let source = r"\begin{tikzcd} A \arrow[r] & B \end{tikzcd}";

    let diagram = parse(source).expect("Failed to parse");

    assert_eq!(diagram.node_count(), 2);
    assert_eq!(label_at(&diagram, 0, 0), Some("A"));
    assert_eq!(label_at(&diagram, 1, 0), Some("B"));

    assert_eq!(diagram.edge_count(), 1);
    let edge = &diagram.edges()[0];
    assert_eq!(diagram.node(edge.source()).map(|n| n.label()), Some("A"));
    assert_eq!(diagram.node(edge.target()).map(|n| n.label()), Some("B"));
    assert_eq!(edge.attributes(), &EdgeAttributes::default());
}

#[test]
fn test_square_diagram() {
    let source = r#"
        \begin{tikzcd}
            A \arrow[r, "f"] \arrow[d, "g"'] & B \arrow[d, "h"] \\
            C \arrow[r, "k"', hook] & D
        \end{tikzcd}
    "#;

    let diagram = parse(source).expect("Failed to parse");

    assert_eq!(diagram.node_count(), 4);
    assert_eq!(diagram.edge_count(), 4);

    let labels: Vec<_> = diagram
        .edges()
        .iter()
        .map(|edge| edge.attributes().label().unwrap_or_default().to_string())
        .collect();
    assert_eq!(labels, vec!["f", "g", "h", "k"]);

    let g = &diagram.edges()[1];
    assert_eq!(g.attributes().label_placement(), LabelPlacement::Right);
    assert_eq!(
        diagram.node(g.target()).map(|n| n.position()),
        Some(GridPosition::new(0, 1))
    );

    let k = &diagram.edges()[3];
    assert_eq!(k.attributes().tail(), TailStyle::Hook);
}

#[test]
fn test_long_arrow_and_styles() {
    let source = r#"
        \begin{tikzcd}[column sep=large]
            X \arrow[rrd, Rightarrow, two heads, "\phi" near end] & & \\
            & & Y
        \end{tikzcd}
    "#;

    let diagram = parse(source).expect("Failed to parse");
    let edge = &diagram.edges()[0];
    let attributes = edge.attributes();

    assert_eq!(
        diagram.node(edge.target()).map(|n| n.position()),
        Some(GridPosition::new(2, 1))
    );
    assert_eq!(attributes.line(), LineStyle::Double);
    assert_eq!(attributes.head(), HeadStyle::TwoHeads);
    assert_eq!(attributes.label(), Some("\\phi"));
    assert_eq!(attributes.label_along(), LabelAlong::NearEnd);
}

#[test]
fn test_implicit_node_materialization() {
    let source = r"\begin{tikzcd} A \arrow[dd] \end{tikzcd}";

    let diagram = parse(source).expect("Failed to parse");

    assert_eq!(diagram.node_count(), 2);
    assert_eq!(label_at(&diagram, 0, 2), Some(""));
}

#[test]
fn test_upward_and_leftward_arrows() {
    let source = r"\begin{tikzcd} & B \\ A \arrow[u] \arrow[ur] \end{tikzcd}";

    let diagram = parse(source).expect("Failed to parse");

    let targets: Vec<_> = diagram
        .edges()
        .iter()
        .filter_map(|edge| diagram.node(edge.target()).map(|n| n.position()))
        .collect();
    assert_eq!(
        targets,
        vec![GridPosition::new(0, 0), GridPosition::new(1, 0)]
    );
}

#[test]
fn test_node_labels_with_escapes_and_braces() {
    let source = r#"\begin{tikzcd} {A, "B"} & x \& y & {[0,1]} \end{tikzcd}"#;

    let diagram = parse(source).expect("Failed to parse");

    assert_eq!(label_at(&diagram, 0, 0), Some("A, \"B\""));
    assert_eq!(label_at(&diagram, 1, 0), Some("x \\& y"));
    assert_eq!(label_at(&diagram, 2, 0), Some("[0,1]"));
}

#[test]
fn test_injected_ids() {
    let source = r"\begin{tikzcd} A & B \end{tikzcd}";
    let mut ids = SequentialIds::starting_at(40);

    let diagram = parse_with_ids(source, &mut ids).expect("Failed to parse");

    let node_ids: Vec<_> = diagram.nodes().map(|n| n.id()).collect();
    assert_eq!(node_ids, vec![NodeId::new(40), NodeId::new(41)]);
}

#[test]
fn test_duplicate_options_last_occurrence_wins() {
    let source = r"\begin{tikzcd} A \arrow[r, dashed, bend left=40, dotted, bend left=10, shift right, shift left] & B \end{tikzcd}";

    let diagram = parse(source).expect("Failed to parse");
    let attributes = diagram.edges()[0].attributes();

    assert_eq!(attributes.line(), LineStyle::Dotted);
    assert_eq!(attributes.bend(), 10.0);
    assert_eq!(attributes.shift(), -1);
}

#[test]
fn test_missing_end_environment() {
    let source = "\\begin{tikzcd}\nA & B";

    let err = parse(source).expect_err("should fail");

    assert_eq!(err.code(), Some(ErrorCode::E102));
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert_eq!(err.location(), Some(Location::new(2, 6)));
}

#[test]
fn test_missing_begin_environment() {
    let err = parse("A & B").expect_err("should fail");
    assert_eq!(err.code(), Some(ErrorCode::E100));
}

#[test]
fn test_unterminated_arrow() {
    let source = "\\begin{tikzcd}\nA \\arrow[r & B\n\\end{tikzcd}";

    let err = parse(source).expect_err("should fail");

    assert_eq!(err.code(), Some(ErrorCode::E101));
    assert_eq!(err.location(), Some(Location::new(2, 3)));
    assert!(err.to_string().starts_with("error[E101]: arrow does not terminate"));
}

#[test]
fn test_unterminated_label() {
    let source = "\\begin{tikzcd}\nA \\arrow[r, \"f] & B\n\\end{tikzcd}";

    let err = parse(source).expect_err("should fail");

    assert_eq!(err.code(), Some(ErrorCode::E001));
    assert_eq!(err.location(), Some(Location::new(2, 13)));
}

#[test]
fn test_unexpected_character_is_lexical() {
    let source = r"\begin{tikzcd} A \arrow[r, @] & B \end{tikzcd}";

    let err = parse(source).expect_err("should fail");

    assert_eq!(err.code(), Some(ErrorCode::E002));
    assert_eq!(err.kind(), ErrorKind::Lexical);
}

#[test]
fn test_tokenize_reports_locations() {
    let tokens = tokenize("\\begin{tikzcd}\n  A\n\\end{tikzcd}").expect("should tokenize");

    // the node label runs up to `\end{tikzcd}`, newline included
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[2].location, Location::new(2, 3));
    assert_eq!(tokens[3].location, Location::new(3, 1));
}
