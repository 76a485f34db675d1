//! Arrow directives: the inverse of the parser's option table.

use tikzcd_core::{
    geometry::GridOffset,
    semantic::{
        DEFAULT_BEND, DEFAULT_SHIFT, EdgeAttributes, HeadStyle, LabelAlong, LabelPlacement,
        LineStyle, Loop, TailStyle,
    },
};

/// Angles, relative to the loop direction, at which a loop leaves and
/// re-enters its node.
const LOOP_ANGLES: [f64; 2] = [235.0, 305.0];

/// Characters that end an arrow label early unless it is wrapped in braces.
const LABEL_SIGNIFICANT: [char; 3] = ['"', ',', ']'];

fn line_keyword(line: LineStyle) -> Option<&'static str> {
    match line {
        LineStyle::Solid => None,
        LineStyle::Double => Some("Rightarrow"),
        LineStyle::Dashed => Some("dashed"),
        LineStyle::Dotted => Some("dotted"),
        LineStyle::None => Some("phantom"),
    }
}

/// `phantom` already hides the head, so `no head` is only needed on a
/// visible line.
fn head_keyword(head: HeadStyle, line: LineStyle) -> Option<&'static str> {
    match head {
        HeadStyle::Default => None,
        HeadStyle::None if line == LineStyle::None => None,
        HeadStyle::None => Some("no head"),
        HeadStyle::Harpoon => Some("harpoon"),
        HeadStyle::HarpoonAlt => Some("harpoon'"),
        HeadStyle::TwoHeads => Some("two heads"),
    }
}

fn tail_keyword(tail: TailStyle) -> Option<&'static str> {
    match tail {
        TailStyle::None => None,
        TailStyle::Hook => Some("hook"),
        TailStyle::HookAlt => Some("hook'"),
        TailStyle::MapsTo => Some("maps to"),
        TailStyle::Tail => Some("tail"),
    }
}

fn along_keyword(along: LabelAlong) -> Option<&'static str> {
    match along {
        LabelAlong::Center => None,
        LabelAlong::NearStart => Some("near start"),
        LabelAlong::NearEnd => Some("near end"),
        LabelAlong::VeryNearStart => Some("very near start"),
        LabelAlong::VeryNearEnd => Some("very near end"),
    }
}

/// Formats `name` with an `=value` suffix unless the value is the default.
fn with_value<T: PartialEq + std::fmt::Display>(name: &str, value: T, default: T) -> String {
    if value == default {
        name.to_string()
    } else {
        format!("{name}={value}")
    }
}

fn bend_option(bend: f64) -> Option<String> {
    if bend > 0.0 {
        Some(with_value("bend left", bend, DEFAULT_BEND))
    } else if bend < 0.0 {
        Some(with_value("bend right", -bend, DEFAULT_BEND))
    } else {
        None
    }
}

/// Negative shifts move the arrow left.
fn shift_option(shift: i32) -> Option<String> {
    match shift {
        0 => None,
        s if s < 0 => Some(with_value("shift left", -s, DEFAULT_SHIFT)),
        s => Some(with_value("shift right", s, DEFAULT_SHIFT)),
    }
}

fn loop_options(value: Loop) -> [String; 4] {
    let [first, second] = LOOP_ANGLES.map(|base| (base + value.angle()).rem_euclid(360.0));
    let (in_angle, out_angle) = if value.clockwise() {
        (first, second)
    } else {
        (second, first)
    };
    [
        "loop".to_string(),
        "distance=2em".to_string(),
        format!("in={in_angle}"),
        format!("out={out_angle}"),
    ]
}

/// Whether `text` must be wrapped in braces to survive re-parsing.
///
/// A leading `{` counts too, since the parser strips one wrapping pair.
pub(super) fn needs_braces(text: &str, significant: &[char]) -> bool {
    text.starts_with('{') || text.contains(significant)
}

fn quoted_label(label: &str, placement: LabelPlacement) -> String {
    let mut quoted = if needs_braces(label, &LABEL_SIGNIFICANT) {
        format!("\"{{{label}}}\"")
    } else {
        format!("\"{label}\"")
    };
    match placement {
        LabelPlacement::Left => {}
        LabelPlacement::Right => quoted.push('\''),
        LabelPlacement::Inside => quoted.push_str(" description"),
    }
    quoted
}

/// Builds the `\arrow[...]` directive for an edge spanning `offset`.
///
/// Options come in a fixed order: direction, label, line, head, tail,
/// longitudinal placement, bend, shift, loop.
pub(super) fn arrow_directive(offset: GridOffset, attributes: &EdgeAttributes) -> String {
    let mut options: Vec<String> = Vec::new();

    let direction = offset.direction_code();
    if !direction.is_empty() {
        options.push(direction);
    }
    if let Some(label) = attributes.label() {
        options.push(quoted_label(label, attributes.label_placement()));
    }

    let keywords = [
        line_keyword(attributes.line()),
        head_keyword(attributes.head(), attributes.line()),
        tail_keyword(attributes.tail()),
        along_keyword(attributes.label_along()),
    ];
    options.extend(keywords.into_iter().flatten().map(str::to_string));

    options.extend(bend_option(attributes.bend()));
    options.extend(shift_option(attributes.shift()));
    if let Some(value) = attributes.loop_() {
        options.extend(loop_options(value));
    }

    format!("\\arrow[{}]", options.join(", "))
}
