//! Exact maximum common induced subgraph search.
//!
//! Given two graphs, [`max_common_subgraph`] finds a largest partial
//! injective mapping between their vertex sets that preserves adjacency,
//! edge direction and labels, optionally restricted to mappings whose
//! image is weakly connected.
//!
//! The search partitions candidate pairs into *bidomains*: pairs of
//! vertex sets whose members agree on their vertex label and on their
//! adjacency to everything matched so far. Each committed pair splits
//! every bidomain by adjacency (and edge label) to the new pair, the sum
//! of the smaller sides bounds what is still achievable, and subtrees
//! that cannot beat the incumbent are discarded. Near the root, frames
//! advertise themselves to a pool of helper threads that race through
//! sibling branches off a shared counter.
//!
//! ```
//! use mcs::{max_common_subgraph, McsConfig};
//! use mcs_graph::GraphBuilder;
//!
//! let triangle = GraphBuilder::new(3)
//!     .edge(0, 1)
//!     .edge(1, 2)
//!     .edge(0, 2)
//!     .build()
//!     .unwrap();
//! let path = GraphBuilder::new(4)
//!     .edge(0, 1)
//!     .edge(1, 2)
//!     .edge(2, 3)
//!     .build()
//!     .unwrap();
//!
//! let solution = max_common_subgraph(&triangle, &path, McsConfig::default());
//!
//! // A triangle and a path share at most one edge as an induced subgraph.
//! assert_eq!(solution.size(), 2);
//! ```
//!
//! For a fixed input and thread count the returned *size* is
//! deterministic; which of several equally large mappings is returned
//! may vary between multi-threaded runs.

use std::time::Duration;

mod bidomain;
mod filter;
mod incumbent;
mod mcs;
mod pool;
mod search;
mod timeout;

pub use crate::mcs::{max_common_subgraph, validate_mapping};

/// How the brancher scores bidomains when picking the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heuristic {
    /// Smallest `max(|left|, |right|)` first.
    MinMax,
    /// Smallest `|left| * |right|` first.
    MinProduct,
}

impl std::str::FromStr for Heuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min_max" => Ok(Heuristic::MinMax),
            "min_product" => Ok(Heuristic::MinProduct),
            _ => Err(format!("unknown heuristic `{s}` (try min_max or min_product)")),
        }
    }
}

/// Search options.
#[derive(Debug, Clone, Copy)]
pub struct McsConfig {
    /// Respect edge direction.
    pub directed: bool,
    /// Match edge labels exactly.
    pub edge_labelled: bool,
    /// Match vertex labels exactly (the labels live on the graphs; this
    /// flag records how they were loaded).
    pub vertex_labelled: bool,
    /// Require the mapped subgraph to be weakly connected.
    pub connected: bool,
    /// Try target sizes `n, n - 1, ...` instead of growing from the
    /// empty mapping; finds induced subgraph isomorphisms quickly.
    pub big_first: bool,
    pub heuristic: Heuristic,
    /// Worker threads; `0` uses the hardware thread count.
    pub threads: usize,
    pub timeout: Option<Duration>,
}

impl Default for McsConfig {
    fn default() -> Self {
        Self {
            directed: false,
            edge_labelled: false,
            vertex_labelled: false,
            connected: false,
            big_first: false,
            heuristic: Heuristic::MinMax,
            threads: 0,
            timeout: None,
        }
    }
}

/// One matched pair: vertex `v` of the first graph mapped to vertex `w`
/// of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VtxPair {
    pub v: usize,
    pub w: usize,
}

/// The result of a search.
#[derive(Debug, Clone)]
pub struct Solution {
    /// The best mapping found, in ascending `v` order.
    pub mapping: Vec<VtxPair>,
    /// Search tree nodes visited, across all threads.
    pub nodes: u64,
    pub elapsed: Duration,
    /// True when the timeout fired; the mapping is the best found so far.
    pub aborted: bool,
}

impl Solution {
    pub fn size(&self) -> usize {
        self.mapping.len()
    }
}
