//! Adjacency-matrix graphs for maximum common subgraph search.
//!
//! Graphs are small and dense by the standards of this workspace's search
//! algorithm, so the topology is a flat row-major matrix of `u32` cells.
//! A cell stores the complete arc type between its two endpoints: for an
//! undirected edge with label `L`, both cells hold `L`; for a directed
//! edge `v -> w` with label `L`, the low half of `adj[v][w]` and the high
//! half of `adj[w][v]` hold `L`. Unlabelled edges use label `1`. A loop
//! is recorded as [`LOOP_BIT`] in the vertex label rather than on the
//! diagonal, which keeps loop vertices in their own label class.
//!
//! Graphs can be created programmatically or read from the DIMACS, LAD
//! and VF input formats.
//!
//! ```
//! use mcs_graph::GraphBuilder;
//!
//! let graph = GraphBuilder::new(4)
//!     .edge(0, 1)
//!     .edge(1, 2)
//!     .edge(1, 3)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(graph.node_count(), 4);
//! assert_eq!(graph.degrees(), vec![1, 3, 1, 1]);
//! assert!(graph.has_edge(1, 3));
//! assert!(!graph.has_edge(0, 2));
//! ```

use thiserror::Error;

mod builder;
mod graph;
pub mod input;

pub use crate::builder::GraphBuilder;
pub use crate::graph::{Graph, LOOP_BIT, MAX_EDGE_LABEL};
pub use crate::input::{read_graph, Format};

#[derive(Error, Debug)]
pub enum Error {
    #[error("error while loading graph")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("line {line}: expected {expected}")]
    Malformed { line: usize, expected: &'static str },
    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("graph size must be declared before any edge or label line")]
    MissingHeader,
    #[error("line {line}: more than one problem line")]
    DuplicateHeader { line: usize },
    #[error("vertex {vertex} out of range for a graph of {node_count} vertices")]
    VertexOutOfRange { vertex: usize, node_count: usize },
    #[error("edge label {label} does not fit into 16 bits")]
    EdgeLabelTooLarge { label: u32 },
    #[error("duplicate directed edge {from} -> {target}")]
    DuplicateEdge { from: usize, target: usize },
    #[error("loop at vertex {vertex} is not allowed in this format")]
    UnexpectedLoop { vertex: usize },
    #[error("loop must carry edge label 1, got {label}")]
    LoopLabel { label: u32 },
    #[error("expected {expected} edges, found {actual}")]
    EdgeCountMismatch { expected: usize, actual: usize },
    #[error("number of vertex labels must match the vertex count")]
    InvalidLabels,
}
