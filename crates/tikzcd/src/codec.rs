//! Lossless diagram serialization for permalinks.
//!
//! Diagrams are stored as compact JSON:
//!
//! ```json
//! {"nodes":[{"position":[0,0],"value":"A"},{"position":[1,0],"value":"B"}],
//!  "edges":[{"from":0,"to":1,"value":"f","line":"dashed"}]}
//! ```
//!
//! Positions are relative to the top-left node and edge endpoints are node
//! indices. Attributes at their default are left out. The JSON can then be
//! carried as standard base64 or as an lz-string "encoded URI component".

use base64::{Engine as _, engine::general_purpose::STANDARD};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tikzcd_core::{
    geometry::{GridBounds, GridPosition},
    identifier::IdSource,
    semantic::{
        AttributeUpdate, Diagram, DiagramError, Edge, EdgeAttributes, HeadStyle, LabelAlong,
        LabelPlacement, LineStyle, Loop, TailStyle,
    },
};

/// Largest number of columns or rows a payload may span.
pub const MAX_GRID_SPAN: usize = 1024;

/// Errors raised while encoding or decoding a diagram payload.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid diagram JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("invalid compressed payload")]
    Compressed,

    #[error("edge {edge} refers to node index {index}, but there are only {nodes} nodes")]
    NodeIndex {
        edge: usize,
        index: usize,
        nodes: usize,
    },

    #[error("diagram spans {columns}x{rows} cells, the limit is {MAX_GRID_SPAN} per side")]
    GridTooLarge { columns: usize, rows: usize },

    #[error(transparent)]
    Diagram(#[from] DiagramError),
}

/// Rejects bounds wider or taller than [`MAX_GRID_SPAN`].
fn check_span(bounds: Option<GridBounds>) -> Result<(), CodecError> {
    match bounds {
        Some(bounds) if bounds.columns() > MAX_GRID_SPAN || bounds.rows() > MAX_GRID_SPAN => {
            Err(CodecError::GridTooLarge {
                columns: bounds.columns(),
                rows: bounds.rows(),
            })
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DiagramJson {
    #[serde(default)]
    nodes: Vec<NodeJson>,
    #[serde(default)]
    edges: Vec<EdgeJson>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeJson {
    position: [i32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EdgeJson {
    from: usize,
    to: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label_position: Option<LabelPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line: Option<LineStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    head: Option<HeadStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tail: Option<TailStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shift: Option<i32>,
    #[serde(default, rename = "loop", skip_serializing_if = "Option::is_none")]
    loop_: Option<Loop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label_position_longitudinal: Option<LabelAlong>,
}

/// `Some(value)` unless it equals the type's default.
fn non_default<T: Default + PartialEq>(value: T) -> Option<T> {
    (value != T::default()).then_some(value)
}

impl EdgeJson {
    fn from_attributes(from: usize, to: usize, attributes: &EdgeAttributes) -> Self {
        Self {
            from,
            to,
            value: attributes.label().map(str::to_string),
            label_position: non_default(attributes.label_placement()),
            line: non_default(attributes.line()),
            head: non_default(attributes.head()),
            tail: non_default(attributes.tail()),
            bend: non_default(attributes.bend()),
            shift: non_default(attributes.shift()),
            loop_: attributes.loop_(),
            label_position_longitudinal: non_default(attributes.label_along()),
        }
    }

    fn attributes(&self) -> EdgeAttributes {
        let updates = [
            self.label_position.map(AttributeUpdate::LabelPlacement),
            self.line.map(AttributeUpdate::Line),
            self.head.map(AttributeUpdate::Head),
            self.tail.map(AttributeUpdate::Tail),
            self.label_position_longitudinal
                .map(AttributeUpdate::LabelAlong),
            self.bend.map(AttributeUpdate::Bend),
            self.shift.map(AttributeUpdate::Shift),
        ];
        EdgeAttributes::new()
            .merged(updates.into_iter().flatten())
            .with_label(self.value.clone())
            .with_loop(self.loop_)
    }
}

impl DiagramJson {
    fn from_diagram(diagram: &Diagram) -> Result<Self, CodecError> {
        let bounds = diagram.bounds();
        check_span(bounds)?;
        let origin = bounds.map_or(GridPosition::default(), |bounds| bounds.min());

        let nodes = diagram
            .nodes()
            .map(|node| {
                let offset = origin.offset_to(node.position());
                NodeJson {
                    position: [offset.columns(), offset.rows()],
                    value: Some(node.label())
                        .filter(|label| !label.is_empty())
                        .map(str::to_string),
                }
            })
            .collect();

        let edges = diagram
            .edges()
            .iter()
            .filter_map(|edge| {
                let from = diagram.node_index(edge.source())?;
                let to = diagram.node_index(edge.target())?;
                Some(EdgeJson::from_attributes(from, to, edge.attributes()))
            })
            .collect();

        Ok(Self { nodes, edges })
    }

    fn into_diagram(self, ids: &mut impl IdSource) -> Result<Diagram, CodecError> {
        check_span(GridBounds::from_positions(
            self.nodes.iter().map(|node| GridPosition::from(node.position)),
        ))?;

        let mut diagram = Diagram::new();

        let mut node_ids = Vec::with_capacity(self.nodes.len());
        for node in self.nodes {
            let position = GridPosition::from(node.position);
            node_ids.push(diagram.insert_node(ids, position, node.value.unwrap_or_default())?);
        }

        for (index, edge) in self.edges.iter().enumerate() {
            let endpoint = |node: usize| {
                node_ids
                    .get(node)
                    .copied()
                    .ok_or(CodecError::NodeIndex {
                        edge: index,
                        index: node,
                        nodes: node_ids.len(),
                    })
            };
            let source = endpoint(edge.from)?;
            let target = endpoint(edge.to)?;
            diagram.add_edge(Edge::new(source, target, edge.attributes()))?;
        }

        Ok(diagram)
    }
}

/// Serialize a diagram to compact JSON.
///
/// # Errors
///
/// Returns [`CodecError::GridTooLarge`] for a diagram wider or taller than
/// [`MAX_GRID_SPAN`], and [`CodecError::Json`] if serialization fails.
pub fn to_json(diagram: &Diagram) -> Result<String, CodecError> {
    Ok(serde_json::to_string(&DiagramJson::from_diagram(diagram)?)?)
}

/// Deserialize a diagram from JSON, drawing one id per node from `ids`.
///
/// # Errors
///
/// Fails on malformed JSON, on positions spanning more than
/// [`MAX_GRID_SPAN`] columns or rows, on edge endpoints that are not valid
/// node indices, and on payloads that break the diagram's invariants (two nodes
/// on one position, a loop between different nodes).
pub fn from_json(json: &str, ids: &mut impl IdSource) -> Result<Diagram, CodecError> {
    let payload: DiagramJson = serde_json::from_str(json)?;
    payload.into_diagram(ids)
}

/// Serialize a diagram to standard base64 of its JSON.
pub fn to_base64(diagram: &Diagram) -> Result<String, CodecError> {
    Ok(STANDARD.encode(to_json(diagram)?))
}

fn decode_base64(payload: &str) -> Result<String, CodecError> {
    let bytes = STANDARD.decode(payload.trim())?;
    Ok(String::from_utf8(bytes)?)
}

/// Deserialize a diagram from base64-encoded JSON.
pub fn from_base64(payload: &str, ids: &mut impl IdSource) -> Result<Diagram, CodecError> {
    from_json(&decode_base64(payload)?, ids)
}

/// Serialize a diagram to an lz-string URI component.
pub fn to_compressed(diagram: &Diagram) -> Result<String, CodecError> {
    Ok(lz_str::compress_to_encoded_uri_component(
        to_json(diagram)?.as_str(),
    ))
}

fn decode_compressed(payload: &str) -> Result<String, CodecError> {
    let wide = lz_str::decompress_from_encoded_uri_component(payload.trim())
        .ok_or(CodecError::Compressed)?;
    String::from_utf16(&wide).map_err(|_| CodecError::Compressed)
}

/// Deserialize a diagram from an lz-string URI component.
pub fn from_compressed(payload: &str, ids: &mut impl IdSource) -> Result<Diagram, CodecError> {
    from_json(&decode_compressed(payload)?, ids)
}

/// Decode a permalink payload in either encoding.
///
/// The compressed form is tried first; if it does not yield valid diagram
/// JSON the payload is read as plain base64. `ids` is only drawn from for
/// the encoding that decoded.
///
/// # Errors
///
/// Returns the base64 error when neither encoding applies.
pub fn decode_permalink(payload: &str, ids: &mut impl IdSource) -> Result<Diagram, CodecError> {
    let compressed = decode_compressed(payload)
        .and_then(|json| Ok(serde_json::from_str::<DiagramJson>(&json)?));

    let parsed = match compressed {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(err:%; "Payload is not compressed, trying base64");
            serde_json::from_str::<DiagramJson>(&decode_base64(payload)?)?
        }
    };
    parsed.into_diagram(ids)
}
