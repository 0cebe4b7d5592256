#![forbid(unsafe_code)]

//! Node/edge arena and filtered-view item tables for network-diagram layout.
//!
//! The graph is an index-based arena: nodes and edges live in `Vec`s in
//! registration order, edges refer to their endpoints by arena index, and
//! id lookup goes through a hash map. Chart data filtering never removes
//! entries from the arena; it only clears their data index, and
//! [`Graph::update`] reconciles the arena with the tables afterwards.

mod graph;
mod table;

pub use graph::{AdjacentIndices, Direction, Edge, EdgeKey, Graph, Node, NodeRef};
pub use table::ItemData;
