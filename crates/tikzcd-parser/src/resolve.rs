//! Attribute resolution for arrow option lists.
//!
//! [`resolve_arrow`] turns the sub-tokens of one `\arrow[...]` into a grid
//! displacement and [`EdgeAttributes`]. Options are first grouped into
//! [`ArrowOption`]s (name, optional `=value`, optional trailing `'`); each
//! option then maps to zero or more [`AttributeUpdate`]s which are merged in
//! order, so a later option overrides an earlier one for the same field.

use log::debug;
use tikzcd_core::{
    geometry::GridOffset,
    semantic::{
        AttributeUpdate, DEFAULT_BEND, DEFAULT_SHIFT, EdgeAttributes, HeadStyle, LabelAlong,
        LabelPlacement, LineStyle, Loop, TailStyle,
    },
};

use crate::tokens::{ArrowToken, PositionedArrowToken};

/// One option of an arrow option list.
#[derive(Debug, Clone, PartialEq)]
struct ArrowOption<'a> {
    name: &'a str,
    value: Option<f64>,
    alternate: bool,
}

/// A label and the placement marker that followed it.
#[derive(Debug, Clone, PartialEq)]
struct ArrowLabel {
    text: String,
    placement: LabelPlacement,
}

/// The scanned content of an option list, before resolution.
#[derive(Debug, Default)]
struct ArrowSpec<'a> {
    direction: Option<&'a str>,
    label: Option<ArrowLabel>,
    options: Vec<ArrowOption<'a>>,
}

/// Result of resolving one arrow.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedArrow {
    pub offset: GridOffset,
    pub attributes: EdgeAttributes,
}

/// Cursor over option sub-tokens that skips whitespace.
struct OptionCursor<'t, 'a> {
    tokens: &'t [PositionedArrowToken<'a>],
    position: usize,
}

impl<'t, 'a> OptionCursor<'t, 'a> {
    fn new(tokens: &'t [PositionedArrowToken<'a>]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(
            self.tokens.get(self.position).map(|t| &t.token),
            Some(ArrowToken::Whitespace)
        ) {
            self.position += 1;
        }
    }

    fn next(&mut self) -> Option<&'t ArrowToken<'a>> {
        self.skip_whitespace();
        let token = self.tokens.get(self.position).map(|t| &t.token)?;
        self.position += 1;
        Some(token)
    }

    fn peek(&mut self) -> Option<&'t ArrowToken<'a>> {
        self.skip_whitespace();
        self.tokens.get(self.position).map(|t| &t.token)
    }

    /// Consumes the next significant token if `accept` returns true for it.
    fn next_if(&mut self, accept: impl Fn(&ArrowToken<'a>) -> bool) -> Option<&'t ArrowToken<'a>> {
        match self.peek() {
            Some(token) if accept(token) => self.next(),
            _ => None,
        }
    }
}

/// Groups sub-tokens into direction, label and options.
fn collect_spec<'a>(tokens: &[PositionedArrowToken<'a>]) -> ArrowSpec<'a> {
    let mut spec = ArrowSpec::default();
    let mut cursor = OptionCursor::new(tokens);

    while let Some(token) = cursor.next() {
        match token {
            ArrowToken::Direction(code) => spec.direction = Some(*code),
            ArrowToken::Label(text) => {
                let placement = if cursor
                    .next_if(|t| matches!(t, ArrowToken::Alternate))
                    .is_some()
                {
                    LabelPlacement::Right
                } else if cursor
                    .next_if(|t| matches!(t, ArrowToken::ArgumentName("description")))
                    .is_some()
                {
                    LabelPlacement::Inside
                } else {
                    LabelPlacement::Left
                };
                spec.label = Some(ArrowLabel {
                    text: text.clone(),
                    placement,
                });
            }
            ArrowToken::ArgumentName(name) => {
                let value = match cursor.next_if(|t| matches!(t, ArrowToken::ArgumentValue(_))) {
                    Some(ArrowToken::ArgumentValue(value)) => Some(*value),
                    _ => None,
                };
                let alternate = cursor
                    .next_if(|t| matches!(t, ArrowToken::Alternate))
                    .is_some();
                spec.options.push(ArrowOption {
                    name: *name,
                    value,
                    alternate,
                });
            }
            ArrowToken::Whitespace
            | ArrowToken::Comma
            | ArrowToken::Command
            | ArrowToken::End
            | ArrowToken::Alternate
            | ArrowToken::ArgumentValue(_) => {}
        }
    }

    spec
}

/// Computes the loop descriptor from the `in` and `out` angles.
///
/// Loops that open by less than half a turn go clockwise.
fn loop_from_angles(in_angle: Option<f64>, out_angle: Option<f64>) -> Loop {
    let (Some(in_angle), Some(out_angle)) = (in_angle, out_angle) else {
        return Loop::new(0.0, false);
    };

    let gap = (out_angle - in_angle + 360.0).rem_euclid(360.0);
    if gap < 180.0 {
        Loop::new(in_angle + gap / 2.0 + 90.0, true)
    } else {
        Loop::new(out_angle + 270.0 - gap / 2.0, false)
    }
}

/// Maps one option to its attribute updates.
fn option_updates(
    option: &ArrowOption<'_>,
    loop_angles: (Option<f64>, Option<f64>),
) -> Vec<AttributeUpdate> {
    let value = option.value;
    match option.name {
        "harpoon" => vec![AttributeUpdate::Head(if option.alternate {
            HeadStyle::HarpoonAlt
        } else {
            HeadStyle::Harpoon
        })],
        "two heads" => vec![AttributeUpdate::Head(HeadStyle::TwoHeads)],
        "no head" => vec![AttributeUpdate::Head(HeadStyle::None)],
        "Rightarrow" => vec![AttributeUpdate::Line(LineStyle::Double)],
        "dashed" => vec![AttributeUpdate::Line(LineStyle::Dashed)],
        "dotted" => vec![AttributeUpdate::Line(LineStyle::Dotted)],
        "phantom" => vec![
            AttributeUpdate::LabelPlacement(LabelPlacement::Inside),
            AttributeUpdate::Tail(TailStyle::None),
            AttributeUpdate::Line(LineStyle::None),
            AttributeUpdate::Head(HeadStyle::None),
        ],
        "hook" => vec![AttributeUpdate::Tail(if option.alternate {
            TailStyle::HookAlt
        } else {
            TailStyle::Hook
        })],
        "maps to" => vec![AttributeUpdate::Tail(TailStyle::MapsTo)],
        "tail" => vec![AttributeUpdate::Tail(TailStyle::Tail)],
        "bend left" => vec![AttributeUpdate::Bend(value.unwrap_or(DEFAULT_BEND))],
        "bend right" => vec![AttributeUpdate::Bend(-value.unwrap_or(DEFAULT_BEND))],
        "shift left" => vec![AttributeUpdate::Shift(
            -value.map_or(DEFAULT_SHIFT, |v| v.round() as i32),
        )],
        "shift right" => vec![AttributeUpdate::Shift(
            value.map_or(DEFAULT_SHIFT, |v| v.round() as i32),
        )],
        "near start" => vec![AttributeUpdate::LabelAlong(LabelAlong::NearStart)],
        "near end" => vec![AttributeUpdate::LabelAlong(LabelAlong::NearEnd)],
        "very near start" => vec![AttributeUpdate::LabelAlong(LabelAlong::VeryNearStart)],
        "very near end" => vec![AttributeUpdate::LabelAlong(LabelAlong::VeryNearEnd)],
        "loop" => {
            let (in_angle, out_angle) = loop_angles;
            vec![AttributeUpdate::Loop(loop_from_angles(in_angle, out_angle))]
        }
        other => {
            debug!(option = other; "Ignoring arrow option");
            Vec::new()
        }
    }
}

/// Value of the last occurrence of `name` that carries a value.
fn last_value(options: &[ArrowOption<'_>], name: &str) -> Option<f64> {
    options
        .iter()
        .rev()
        .filter(|option| option.name == name)
        .find_map(|option| option.value)
}

/// Resolves the sub-tokens of one arrow directive.
///
/// The last direction code wins. Label placement is applied before the
/// options, so options such as `phantom` override it.
pub(crate) fn resolve_arrow(tokens: &[PositionedArrowToken<'_>]) -> ResolvedArrow {
    let spec = collect_spec(tokens);

    let offset = spec
        .direction
        .and_then(GridOffset::from_direction_code)
        .unwrap_or_default();

    let mut updates = Vec::new();
    if let Some(label) = spec.label {
        updates.push(AttributeUpdate::Label(label.text));
        updates.push(AttributeUpdate::LabelPlacement(label.placement));
    }

    let loop_angles = (
        last_value(&spec.options, "in"),
        last_value(&spec.options, "out"),
    );
    for option in &spec.options {
        updates.extend(option_updates(option, loop_angles));
    }

    ResolvedArrow {
        offset,
        attributes: EdgeAttributes::new().merged(updates),
    }
}
