//! Property tests for markup and codec round-trips.

use proptest::prelude::*;

use tikzcd::{
    RenderOptions, codec,
    geometry::GridPosition,
    identifier::SequentialIds,
    render,
    semantic::{
        AttributeUpdate, Diagram, Edge, EdgeAttributes, HeadStyle, LabelAlong, LabelPlacement,
        LineStyle, Loop, TailStyle,
    },
};

// ===================
// Strategies
// ===================

fn placement_strategy() -> impl Strategy<Value = LabelPlacement> {
    prop_oneof![
        Just(LabelPlacement::Left),
        Just(LabelPlacement::Right),
        Just(LabelPlacement::Inside),
    ]
}

fn line_strategy() -> impl Strategy<Value = LineStyle> {
    prop_oneof![
        Just(LineStyle::Solid),
        Just(LineStyle::Double),
        Just(LineStyle::Dashed),
        Just(LineStyle::Dotted),
        Just(LineStyle::None),
    ]
}

fn head_strategy() -> impl Strategy<Value = HeadStyle> {
    prop_oneof![
        Just(HeadStyle::Default),
        Just(HeadStyle::None),
        Just(HeadStyle::Harpoon),
        Just(HeadStyle::HarpoonAlt),
        Just(HeadStyle::TwoHeads),
    ]
}

fn tail_strategy() -> impl Strategy<Value = TailStyle> {
    prop_oneof![
        Just(TailStyle::None),
        Just(TailStyle::Hook),
        Just(TailStyle::HookAlt),
        Just(TailStyle::MapsTo),
        Just(TailStyle::Tail),
    ]
}

fn along_strategy() -> impl Strategy<Value = LabelAlong> {
    prop_oneof![
        Just(LabelAlong::Center),
        Just(LabelAlong::NearStart),
        Just(LabelAlong::NearEnd),
        Just(LabelAlong::VeryNearStart),
        Just(LabelAlong::VeryNearEnd),
    ]
}

/// Attributes that markup can express.
///
/// `phantom` implies an inside label and no head or tail, so those are
/// forced whenever the line is hidden.
fn attributes_strategy() -> impl Strategy<Value = EdgeAttributes> {
    (
        prop::option::of("[a-z,\"\\]]{1,4}"),
        placement_strategy(),
        line_strategy(),
        head_strategy(),
        tail_strategy(),
        along_strategy(),
        -80i32..=80,
        -3i32..=3,
        prop::option::of((0u16..72, any::<bool>())),
    )
        .prop_map(
            |(label, placement, line, head, tail, along, bend, shift, looped)| {
                let mut updates = Vec::new();
                if let Some(label) = label {
                    updates.push(AttributeUpdate::Label(label));
                    updates.push(AttributeUpdate::LabelPlacement(placement));
                }
                updates.push(AttributeUpdate::Line(line));
                if line == LineStyle::None {
                    updates.push(AttributeUpdate::LabelPlacement(LabelPlacement::Inside));
                    updates.push(AttributeUpdate::Head(HeadStyle::None));
                    updates.push(AttributeUpdate::Tail(TailStyle::None));
                } else {
                    updates.push(AttributeUpdate::Head(head));
                    updates.push(AttributeUpdate::Tail(tail));
                }
                updates.push(AttributeUpdate::LabelAlong(along));
                updates.push(AttributeUpdate::Bend(f64::from(bend)));
                updates.push(AttributeUpdate::Shift(shift));

                EdgeAttributes::new()
                    .merged(updates)
                    .with_loop(looped.map(|(step, clockwise)| {
                        Loop::new(f64::from(step) * 5.0, clockwise)
                    }))
            },
        )
}

type Cells = Vec<((i32, i32), String)>;
type Links = Vec<(usize, usize, EdgeAttributes)>;

/// Node labels mixing plain characters with separators, comments and
/// balanced groups that only survive inside braces.
fn node_label_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[A-Za-z,&\"%]",
            Just("\\\\".to_string()),
            Just("{x}".to_string()),
            Just("\\arrow[r]".to_string()),
        ],
        0..4,
    )
    .prop_map(|pieces| pieces.concat())
}

fn diagram_strategy() -> impl Strategy<Value = (Cells, Links)> {
    (
        prop::collection::vec(((-4i32..4, -4i32..4), node_label_strategy()), 1..8),
        prop::collection::vec((any::<usize>(), any::<usize>(), attributes_strategy()), 0..6),
    )
}

/// Builds a diagram, dropping cells on taken positions and edges that
/// markup cannot carry (a non-loop edge from a node to itself).
fn build_diagram(cells: &[((i32, i32), String)], links: &[(usize, usize, EdgeAttributes)]) -> Diagram {
    let mut ids = SequentialIds::default();
    let mut diagram = Diagram::new();
    let mut node_ids = Vec::new();
    for ((column, row), label) in cells {
        let position = GridPosition::new(*column, *row);
        if diagram.node_at(position).is_none() {
            node_ids.push(
                diagram
                    .insert_node(&mut ids, position, label.clone())
                    .expect("free position"),
            );
        }
    }

    for (source, target, attributes) in links {
        let source = node_ids[source % node_ids.len()];
        let target = if attributes.loop_().is_some() {
            source
        } else {
            node_ids[target % node_ids.len()]
        };
        if source == target && attributes.loop_().is_none() {
            continue;
        }
        diagram
            .add_edge(Edge::new(source, target, attributes.clone()))
            .expect("valid edge");
    }
    diagram
}

// ===================
// Property Test Functions
// ===================

fn check_markup_round_trip(cells: Cells, links: Links) -> Result<(), TestCaseError> {
    let diagram = build_diagram(&cells, &links);

    let markup = render(&diagram, &RenderOptions::new(false));
    let parsed = tikzcd_parser::parse(&markup)
        .map_err(|err| TestCaseError::fail(format!("{err}\n{markup}")))?;

    prop_assert!(parsed.equivalent(&diagram), "not equivalent:\n{}", markup);
    Ok(())
}

fn check_alignment_idempotent(cells: Cells, links: Links) -> Result<(), TestCaseError> {
    let diagram = build_diagram(&cells, &links);

    let aligned = render(&diagram, &RenderOptions::new(true));
    let unaligned = render(&diagram, &RenderOptions::new(false));
    let from_aligned = tikzcd_parser::parse(&aligned)
        .map_err(|err| TestCaseError::fail(format!("{err}\n{aligned}")))?;
    let from_unaligned = tikzcd_parser::parse(&unaligned)
        .map_err(|err| TestCaseError::fail(format!("{err}\n{unaligned}")))?;

    prop_assert!(from_aligned.equivalent(&from_unaligned), "{}", aligned);
    Ok(())
}

/// Re-rendering parsed markup reproduces it exactly.
fn check_render_fixpoint(cells: Cells, links: Links) -> Result<(), TestCaseError> {
    let diagram = build_diagram(&cells, &links);
    let options = RenderOptions::new(false);

    let markup = render(&diagram, &options);
    let parsed = tikzcd_parser::parse(&markup)
        .map_err(|err| TestCaseError::fail(format!("{err}\n{markup}")))?;

    prop_assert_eq!(render(&parsed, &options), markup);
    Ok(())
}

fn check_codec_round_trip(cells: Cells, links: Links) -> Result<(), TestCaseError> {
    let diagram = build_diagram(&cells, &links);

    let json = codec::to_json(&diagram).map_err(|err| TestCaseError::fail(err.to_string()))?;
    let compressed =
        codec::to_compressed(&diagram).map_err(|err| TestCaseError::fail(err.to_string()))?;
    let base64 = codec::to_base64(&diagram).map_err(|err| TestCaseError::fail(err.to_string()))?;

    let decoded = [
        codec::from_json(&json, &mut SequentialIds::default()),
        codec::from_compressed(&compressed, &mut SequentialIds::default()),
        codec::from_base64(&base64, &mut SequentialIds::default()),
    ];
    for result in decoded {
        let other = result.map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert!(other.equivalent(&diagram));
        prop_assert_eq!(other.node_count(), diagram.node_count());
    }
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #[test]
    fn markup_round_trip((cells, links) in diagram_strategy()) {
        check_markup_round_trip(cells, links)?;
    }

    #[test]
    fn alignment_idempotent((cells, links) in diagram_strategy()) {
        check_alignment_idempotent(cells, links)?;
    }

    #[test]
    fn render_fixpoint((cells, links) in diagram_strategy()) {
        check_render_fixpoint(cells, links)?;
    }

    #[test]
    fn codec_round_trip((cells, links) in diagram_strategy()) {
        check_codec_round_trip(cells, links)?;
    }
}
