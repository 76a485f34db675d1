//! Node identities and the sources that hand them out.
//!
//! A [`NodeId`] is opaque: it is only meaningful within the [`Diagram`] that
//! contains the node. Code that creates nodes (the parser, the permalink
//! decoder, an editor) receives an [`IdSource`] from its caller instead of
//! consulting any process-wide counter, so independent parses never share
//! state.
//!
//! [`Diagram`]: crate::semantic::Diagram

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a node within one diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Creates an identity from a raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A generator of fresh node identities.
///
/// Implementations must never return the same id twice for the lifetime of
/// the diagram being built. Any `FnMut() -> NodeId` closure is an `IdSource`.
///
/// # Examples
///
/// ```
/// # use tikzcd_core::identifier::{IdSource, NodeId, SequentialIds};
/// let mut ids = SequentialIds::default();
/// assert_eq!(ids.next_id(), NodeId::new(0));
/// assert_eq!(ids.next_id(), NodeId::new(1));
///
/// let mut counter = 100;
/// let mut closure = move || {
///     counter += 1;
///     NodeId::new(counter)
/// };
/// assert_eq!(closure.next_id(), NodeId::new(101));
/// ```
pub trait IdSource {
    /// Returns a fresh identity.
    fn next_id(&mut self) -> NodeId;
}

impl<F> IdSource for F
where
    F: FnMut() -> NodeId,
{
    fn next_id(&mut self) -> NodeId {
        self()
    }
}

/// An [`IdSource`] counting upward from a starting value.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    /// Creates a source whose first id is `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}
