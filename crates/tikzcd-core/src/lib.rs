//! tikzcd Core Types and Definitions
//!
//! This crate provides the text-independent model shared by the parser, the
//! code generator and the permalink codec. It includes:
//!
//! - **Geometry**: Grid positions, offsets and direction letters ([`geometry`] module)
//! - **Identifiers**: Opaque node identities and injectable identity sources ([`identifier`] module)
//! - **Semantic**: Nodes, edges, edge attributes and the [`semantic::Diagram`] container

pub mod geometry;
pub mod identifier;
pub mod semantic;
