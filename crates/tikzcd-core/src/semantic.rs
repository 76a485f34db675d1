//! Semantic diagram model types.
//!
//! This module contains the text-independent representation of a `tikzcd`
//! diagram. Values of these types carry no references into the markup they
//! were parsed from; once built they are fully detached from their source.
//!
//! # Pipeline Position
//!
//! ```text
//! Markup Text
//!     ↓ lexer
//! Tokens
//!     ↓ builder (+ attribute resolver)
//! Semantic Model (these types)
//!     ↓ code generator
//! Markup Text
//! ```
//!
//! # Organization
//!
//! - [`diagram`] - The [`Diagram`] container and its invariants
//! - [`node`] - Grid-placed [`Node`]s
//! - [`edge`] - [`Edge`]s, their [`EdgeAttributes`] and the [`AttributeUpdate`] merge

pub mod diagram;
pub mod edge;
pub mod node;

pub use diagram::*;
pub use edge::*;
pub use node::*;
