//! Attribute nodes and their dependency graph
//!
//! - `node`: node storage, ids and the rule type
//! - `edges`: acyclic adjacency with path queries
//! - `builder`: declare nodes in any order, wire them in dependency order

pub mod builder;
pub mod edges;
pub mod node;

pub use builder::GraphBuilder;
pub use edges::DependencyGraph;
pub use node::{AttributeNode, NodeId, NodeKind, Rule};
