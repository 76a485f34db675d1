//! The [`Diagram`] container.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::trace;
use thiserror::Error;

use crate::{
    geometry::{GridBounds, GridOffset, GridPosition},
    identifier::{IdSource, NodeId},
    semantic::{Edge, EdgeAttributes, Node},
};

/// Violations of the [`Diagram`] invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("node {0} already exists in the diagram")]
    DuplicateId(NodeId),

    #[error("grid position {position} is already occupied by node {occupant}")]
    OccupiedPosition {
        position: GridPosition,
        occupant: NodeId,
    },

    #[error("edge endpoint {0} is not a node of the diagram")]
    UnknownEndpoint(NodeId),

    #[error("loop edge must start and end at the same node, got {from} and {to}")]
    DetachedLoop { from: NodeId, to: NodeId },
}

/// Nodes on an integer grid connected by attributed edges.
///
/// The mutators keep three invariants: node ids are unique, no two nodes
/// share a grid position, and every edge endpoint is a node of the diagram.
/// Nodes iterate in insertion order; edges keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    nodes: IndexMap<NodeId, Node>,
    positions: HashMap<GridPosition, NodeId>,
    edges: Vec<Edge>,
}

impl Diagram {
    /// Creates an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Fails if the id is already used or the position is already occupied.
    pub fn add_node(&mut self, node: Node) -> Result<(), DiagramError> {
        if self.nodes.contains_key(&node.id()) {
            return Err(DiagramError::DuplicateId(node.id()));
        }
        if let Some(&occupant) = self.positions.get(&node.position()) {
            return Err(DiagramError::OccupiedPosition {
                position: node.position(),
                occupant,
            });
        }

        self.positions.insert(node.position(), node.id());
        self.nodes.insert(node.id(), node);
        Ok(())
    }

    /// Creates a node with an id drawn from `ids` and adds it.
    pub fn insert_node(
        &mut self,
        ids: &mut impl IdSource,
        position: GridPosition,
        label: impl Into<String>,
    ) -> Result<NodeId, DiagramError> {
        let id = ids.next_id();
        self.add_node(Node::new(id, position, label))?;
        Ok(id)
    }

    /// Adds an edge between two existing nodes.
    ///
    /// # Errors
    ///
    /// Fails if an endpoint is unknown, or if the edge carries a loop but
    /// its endpoints differ.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), DiagramError> {
        for endpoint in [edge.source(), edge.target()] {
            if !self.nodes.contains_key(&endpoint) {
                return Err(DiagramError::UnknownEndpoint(endpoint));
            }
        }
        if edge.is_loop() && edge.source() != edge.target() {
            return Err(DiagramError::DetachedLoop {
                from: edge.source(),
                to: edge.target(),
            });
        }

        self.edges.push(edge);
        Ok(())
    }

    /// Looks up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Looks up the node occupying `position`.
    pub fn node_at(&self, position: GridPosition) -> Option<&Node> {
        self.positions.get(&position).and_then(|id| self.nodes.get(id))
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns the edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Iterates the edges leaving `id`, in diagram order.
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |edge| edge.source() == id)
    }

    /// Index of a node in insertion order.
    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.nodes.get_index_of(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Checks if the diagram has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Bounding box of every node position, or `None` for an empty diagram.
    pub fn bounds(&self) -> Option<GridBounds> {
        GridBounds::from_positions(self.nodes.values().map(Node::position))
    }

    /// Returns a copy translated so that the bounding box starts at `(0, 0)`.
    pub fn normalized(&self) -> Self {
        let Some(bounds) = self.bounds() else {
            return self.clone();
        };
        let shift = bounds.min().offset_to(GridPosition::default());
        if shift.is_zero() {
            return self.clone();
        }

        trace!(columns = shift.columns(), rows = shift.rows(); "Translating diagram");
        self.translated(shift)
    }

    fn translated(&self, shift: GridOffset) -> Self {
        let nodes: IndexMap<NodeId, Node> = self
            .nodes
            .iter()
            .map(|(&id, node)| {
                let moved = node.clone().with_position(node.position() + shift);
                (id, moved)
            })
            .collect();
        let positions = nodes
            .values()
            .map(|node| (node.position(), node.id()))
            .collect();

        Self {
            nodes,
            positions,
            edges: self.edges.clone(),
        }
    }

    /// Compares two diagrams as drawings.
    ///
    /// Node identities, edge order, and empty nodes that no edge touches are
    /// ignored. Positions are compared relative to the top-left corner of
    /// the remaining nodes.
    pub fn equivalent(&self, other: &Diagram) -> bool {
        let ours = self.significant_nodes();
        let theirs = other.significant_nodes();
        if ours.len() != theirs.len() || self.edges.len() != other.edges.len() {
            return false;
        }

        let theirs_by_position: HashMap<GridPosition, &str> = theirs.into_iter().collect();
        let nodes_match = ours
            .iter()
            .all(|(position, label)| theirs_by_position.get(position) == Some(label));
        if !nodes_match {
            return false;
        }

        let our_edges = self.located_edges();
        let their_edges = other.located_edges();
        let mut used = vec![false; their_edges.len()];
        our_edges.iter().all(|edge| {
            let found = their_edges
                .iter()
                .enumerate()
                .find(|(index, candidate)| !used[*index] && *candidate == edge);
            match found {
                Some((index, _)) => {
                    used[index] = true;
                    true
                }
                None => false,
            }
        })
    }

    /// Labelled or referenced nodes, positioned relative to their own
    /// bounding box.
    fn significant_nodes(&self) -> Vec<(GridPosition, &str)> {
        let origin = self.significant_origin();
        self.nodes
            .values()
            .filter(|node| self.is_significant(node))
            .map(|node| (relative_to(origin, node.position()), node.label()))
            .collect()
    }

    /// Edges with endpoints replaced by relative positions.
    fn located_edges(&self) -> Vec<(GridPosition, GridPosition, &EdgeAttributes)> {
        let origin = self.significant_origin();
        self.edges
            .iter()
            .filter_map(|edge| {
                let source = self.nodes.get(&edge.source())?.position();
                let target = self.nodes.get(&edge.target())?.position();
                Some((
                    relative_to(origin, source),
                    relative_to(origin, target),
                    edge.attributes(),
                ))
            })
            .collect()
    }

    fn significant_origin(&self) -> GridPosition {
        GridBounds::from_positions(
            self.nodes
                .values()
                .filter(|node| self.is_significant(node))
                .map(Node::position),
        )
        .map(|bounds| bounds.min())
        .unwrap_or_default()
    }

    fn is_significant(&self, node: &Node) -> bool {
        !node.label().is_empty()
            || self
                .edges
                .iter()
                .any(|edge| edge.source() == node.id() || edge.target() == node.id())
    }
}

fn relative_to(origin: GridPosition, position: GridPosition) -> GridPosition {
    GridPosition::default() + origin.offset_to(position)
}
