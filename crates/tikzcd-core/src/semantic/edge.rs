//! Edge types and edge attributes for the semantic model.
//!
//! Arrow options are not stored as free-form key/value pairs. Each semantic
//! attribute has its own typed field on [`EdgeAttributes`], and every
//! modification is expressed as one [`AttributeUpdate`] variant. Applying a
//! sequence of updates with [`EdgeAttributes::apply`] is last-writer-wins per
//! field: an update only ever touches the field named by its variant.

use serde::{Deserialize, Serialize};

use crate::identifier::NodeId;

/// Bend applied by `bend left` / `bend right` when no value is given.
pub const DEFAULT_BEND: f64 = 30.0;

/// Shift applied by `shift left` / `shift right` when no value is given.
pub const DEFAULT_SHIFT: i32 = 1;

/// Bend magnitudes visited by [`EdgeAttributes::stepped_bend`].
const BEND_STEPS: [f64; 11] = [
    0.0, 30.0, 49.0, 60.0, 67.0, 71.0, 74.0, 76.0, 78.0, 79.0, 80.0,
];

/// Largest bend magnitude reachable by stepping.
pub const MAX_BEND: f64 = 80.0;

/// Side of the arrow a label is drawn on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPlacement {
    /// Left of the arrow, seen in the direction of travel.
    #[default]
    Left,
    /// Right of the arrow; the `'` marker after the label.
    Right,
    /// On top of the arrow; the `description` option.
    Inside,
}

impl LabelPlacement {
    /// Returns the placement on the other side of the arrow.
    ///
    /// `Inside` is its own mirror image.
    pub fn mirrored(self) -> Self {
        match self {
            LabelPlacement::Left => LabelPlacement::Right,
            LabelPlacement::Right => LabelPlacement::Left,
            LabelPlacement::Inside => LabelPlacement::Inside,
        }
    }
}

/// Stroke style of the arrow body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Double,
    Dashed,
    Dotted,
    /// Invisible body, as produced by `phantom`.
    None,
}

/// Arrow tip at the target end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadStyle {
    /// The regular tip implied by the line style.
    #[default]
    Default,
    None,
    Harpoon,
    HarpoonAlt,
    TwoHeads,
}

/// Decoration at the source end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailStyle {
    #[default]
    #[serde(alias = "default")]
    None,
    Hook,
    HookAlt,
    MapsTo,
    Tail,
}

/// Position of the label along the length of the arrow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAlong {
    #[default]
    Center,
    NearStart,
    NearEnd,
    VeryNearStart,
    VeryNearEnd,
}

/// Self-loop descriptor: the exit angle in degrees and the orientation.
///
/// Serialized as the pair `[angle, clockwise]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, bool)", into = "(f64, bool)")]
pub struct Loop {
    angle: f64,
    clockwise: bool,
}

impl Loop {
    /// Creates a loop descriptor. The angle is normalized into `0..360`.
    pub fn new(angle: f64, clockwise: bool) -> Self {
        Self {
            angle: angle.rem_euclid(360.0),
            clockwise,
        }
    }

    /// Exit angle in degrees, in `0..360`.
    pub fn angle(self) -> f64 {
        self.angle
    }

    /// Whether the loop runs clockwise.
    pub fn clockwise(self) -> bool {
        self.clockwise
    }

    /// Returns the loop turned a quarter of a circle further.
    pub fn rotated(self) -> Self {
        Self::new(self.angle + 90.0, self.clockwise)
    }

    /// Returns the loop with its orientation flipped.
    pub fn reversed(self) -> Self {
        Self::new(self.angle, !self.clockwise)
    }
}

impl From<(f64, bool)> for Loop {
    fn from((angle, clockwise): (f64, bool)) -> Self {
        Self::new(angle, clockwise)
    }
}

impl From<Loop> for (f64, bool) {
    fn from(value: Loop) -> Self {
        (value.angle, value.clockwise)
    }
}

/// Side used by the stepping helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A single modification of one [`EdgeAttributes`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeUpdate {
    Label(String),
    LabelPlacement(LabelPlacement),
    Line(LineStyle),
    Head(HeadStyle),
    Tail(TailStyle),
    LabelAlong(LabelAlong),
    Bend(f64),
    Shift(i32),
    Loop(Loop),
}

/// Visual attributes of an edge.
///
/// The default value describes a plain solid arrow without label, bend,
/// shift or loop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeAttributes {
    label: Option<String>,
    label_placement: LabelPlacement,
    line: LineStyle,
    head: HeadStyle,
    tail: TailStyle,
    label_along: LabelAlong,
    bend: f64,
    shift: i32,
    loop_: Option<Loop>,
}

impl EdgeAttributes {
    /// Creates default attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one update; only the field named by the variant changes.
    pub fn apply(&mut self, update: AttributeUpdate) {
        match update {
            AttributeUpdate::Label(label) => self.label = Some(label),
            AttributeUpdate::LabelPlacement(placement) => self.label_placement = placement,
            AttributeUpdate::Line(line) => self.line = line,
            AttributeUpdate::Head(head) => self.head = head,
            AttributeUpdate::Tail(tail) => self.tail = tail,
            AttributeUpdate::LabelAlong(along) => self.label_along = along,
            AttributeUpdate::Bend(bend) => self.bend = bend,
            AttributeUpdate::Shift(shift) => self.shift = shift,
            AttributeUpdate::Loop(value) => self.loop_ = Some(value),
        }
    }

    /// Applies updates in order; later updates to the same field win.
    ///
    /// # Examples
    ///
    /// ```
    /// # use tikzcd_core::semantic::{AttributeUpdate, EdgeAttributes, LineStyle};
    /// let attributes = EdgeAttributes::new().merged([
    ///     AttributeUpdate::Line(LineStyle::Dashed),
    ///     AttributeUpdate::Bend(30.0),
    ///     AttributeUpdate::Line(LineStyle::Dotted),
    /// ]);
    /// assert_eq!(attributes.line(), LineStyle::Dotted);
    /// assert_eq!(attributes.bend(), 30.0);
    /// ```
    pub fn merged(mut self, updates: impl IntoIterator<Item = AttributeUpdate>) -> Self {
        for update in updates {
            self.apply(update);
        }
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn label_placement(&self) -> LabelPlacement {
        self.label_placement
    }

    pub fn line(&self) -> LineStyle {
        self.line
    }

    pub fn head(&self) -> HeadStyle {
        self.head
    }

    pub fn tail(&self) -> TailStyle {
        self.tail
    }

    pub fn label_along(&self) -> LabelAlong {
        self.label_along
    }

    /// Signed bend in degrees; positive bends to the left.
    pub fn bend(&self) -> f64 {
        self.bend
    }

    /// Signed shift; positive shifts to the right.
    pub fn shift(&self) -> i32 {
        self.shift
    }

    pub fn loop_(&self) -> Option<Loop> {
        self.loop_
    }

    /// Returns a copy with the label replaced or removed.
    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Returns a copy with the loop descriptor replaced or removed.
    pub fn with_loop(mut self, value: Option<Loop>) -> Self {
        self.loop_ = value;
        self
    }

    /// Returns the attributes seen from the other end of the edge.
    ///
    /// Left and right label placements swap, bend and shift change sign and
    /// loops change orientation.
    pub fn mirrored(&self) -> Self {
        Self {
            label_placement: self.label_placement.mirrored(),
            bend: -self.bend,
            shift: -self.shift,
            loop_: self.loop_.map(Loop::reversed),
            ..self.clone()
        }
    }

    /// Moves the bend one step of the editor's bend table towards `side`.
    ///
    /// A bend already curving towards `side` grows; a bend curving the
    /// other way shrinks towards zero. The result is clamped to
    /// `±MAX_BEND`.
    pub fn stepped_bend(&self, side: Side) -> Self {
        let bend = self.bend;
        let increase = bend == 0.0
            || match side {
                Side::Left => bend > 0.0,
                Side::Right => bend < 0.0,
            };
        let sign = if bend != 0.0 {
            bend.signum()
        } else if side == Side::Left {
            1.0
        } else {
            -1.0
        };

        let magnitude = bend.abs();
        let mut index = BEND_STEPS
            .iter()
            .rposition(|&step| step <= magnitude)
            .unwrap_or(0);
        if index < BEND_STEPS.len() - 1
            && magnitude >= (BEND_STEPS[index + 1] + BEND_STEPS[index]) / 2.0
        {
            index += 1;
        }

        let next = if increase {
            (index + 1).min(BEND_STEPS.len() - 1)
        } else {
            index.saturating_sub(1)
        };

        Self {
            bend: (sign * BEND_STEPS[next]).clamp(-MAX_BEND, MAX_BEND),
            ..self.clone()
        }
    }

    /// Moves the shift one unit towards `side`.
    pub fn stepped_shift(&self, side: Side) -> Self {
        let delta = match side {
            Side::Left => -1,
            Side::Right => 1,
        };
        Self {
            shift: self.shift + delta,
            ..self.clone()
        }
    }
}

/// A directed edge between two nodes of the same diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: NodeId,
    target: NodeId,
    attributes: EdgeAttributes,
}

impl Edge {
    /// Create a new Edge.
    pub fn new(source: NodeId, target: NodeId, attributes: EdgeAttributes) -> Self {
        Self {
            source,
            target,
            attributes,
        }
    }

    /// Get the source node identifier.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Get the target node identifier.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Borrow the edge attributes.
    pub fn attributes(&self) -> &EdgeAttributes {
        &self.attributes
    }

    /// Whether this edge is a self-loop.
    pub fn is_loop(&self) -> bool {
        self.attributes.loop_.is_some()
    }

    /// Returns the same arrow pointing the other way.
    ///
    /// See [`EdgeAttributes::mirrored`] for how the attributes follow.
    pub fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
            attributes: self.attributes.mirrored(),
        }
    }
}
