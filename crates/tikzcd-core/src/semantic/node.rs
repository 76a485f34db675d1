//! Diagram node type for the semantic model.

use std::fmt;

use crate::{geometry::GridPosition, identifier::NodeId};

/// A labelled cell of the diagram grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    position: GridPosition,
    label: String,
}

impl Node {
    /// Create a new Node.
    pub fn new(id: NodeId, position: GridPosition, label: impl Into<String>) -> Self {
        Self {
            id,
            position,
            label: label.into(),
        }
    }

    /// Get the node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the grid position of the node.
    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// Get the label text. May be empty.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns a copy of this node placed at `position`.
    pub fn with_position(mut self, position: GridPosition) -> Self {
        self.position = position;
        self
    }

    /// Returns a copy of this node with a different label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Checks whether the label contains only whitespace.
    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?} at {}", self.id, self.label, self.position)
    }
}
