use rayon::prelude::*;

use crate::Error;

/// Set in a vertex label to mark a loop at that vertex.
///
/// Keeping loops out of the adjacency matrix means the search never has
/// to special-case the diagonal; the initial per-label partition already
/// restricts loop vertices to loop vertices.
pub const LOOP_BIT: u32 = 1 << 31;

/// Largest edge label that fits into one half of an adjacency cell.
pub const MAX_EDGE_LABEL: u32 = 0xFFFF;

/// An immutable graph over a flat row-major adjacency matrix.
///
/// `adj[v][w]` is the arc type between `v` and `w`: the low 16 bits hold
/// the label of the edge `v -> w`, the high 16 bits the label of
/// `w -> v`. Undirected edges occupy the low bits of both cells. A zero
/// cell means no edge in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    node_count: usize,
    adj: Vec<u32>,
    labels: Vec<u32>,
}

impl Graph {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            adj: vec![0; node_count * node_count],
            labels: vec![0; node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn label(&self, v: usize) -> u32 {
        self.labels[v]
    }

    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// The arc type between `v` and `w`; zero if the vertices are not
    /// adjacent in either direction.
    pub fn edge_label(&self, v: usize, w: usize) -> u32 {
        self.adj[v * self.node_count + w]
    }

    /// The row of arc types from `v` to every vertex of the graph.
    pub fn adj_row(&self, v: usize) -> &[u32] {
        &self.adj[v * self.node_count..(v + 1) * self.node_count]
    }

    pub fn has_edge(&self, v: usize, w: usize) -> bool {
        self.edge_label(v, w) != 0
    }

    pub fn has_loop(&self, v: usize) -> bool {
        self.labels[v] & LOOP_BIT != 0
    }

    /// Merges `label` into the label of `v`.
    pub fn add_vertex_label(&mut self, v: usize, label: u32) -> Result<(), Error> {
        self.check_vertex(v)?;
        self.labels[v] |= label;
        Ok(())
    }

    /// Adds an edge between `v` and `w`.
    ///
    /// A self-edge must carry label 1 and is recorded as [`LOOP_BIT`] in
    /// the vertex label. Directed edges may coexist in both directions
    /// between a pair of vertices, but the same direction twice is an
    /// error; undirected insertion is idempotent, which lets formats
    /// list each edge once per endpoint.
    pub fn add_edge(&mut self, v: usize, w: usize, label: u32, directed: bool) -> Result<(), Error> {
        self.check_vertex(v)?;
        self.check_vertex(w)?;

        if v == w {
            if label != 1 {
                return Err(Error::LoopLabel { label });
            }
            self.labels[v] |= LOOP_BIT;
            return Ok(());
        }

        if label > MAX_EDGE_LABEL {
            return Err(Error::EdgeLabelTooLarge { label });
        }

        let n = self.node_count;
        if directed {
            if self.adj[v * n + w] & MAX_EDGE_LABEL != 0 {
                return Err(Error::DuplicateEdge { from: v, target: w });
            }
            self.adj[v * n + w] |= label;
            self.adj[w * n + v] |= label << 16;
        } else {
            self.adj[v * n + w] = label;
            self.adj[w * n + v] = label;
        }
        Ok(())
    }

    /// The degree of every vertex. For directed graphs, outgoing and
    /// incoming edges of a pair count separately.
    pub fn degrees(&self) -> Vec<usize> {
        if self.node_count == 0 {
            return Vec::new();
        }
        self.adj
            .par_chunks(self.node_count)
            .map(|row| {
                row.iter()
                    .map(|&cell| {
                        usize::from(cell & MAX_EDGE_LABEL != 0)
                            + usize::from(cell & !MAX_EDGE_LABEL != 0)
                    })
                    .sum()
            })
            .collect()
    }

    /// The subgraph induced by `order`, with vertex `i` of the result
    /// being `order[i]` of `self`.
    pub fn induced_subgraph(&self, order: &[usize]) -> Graph {
        let n = order.len();
        let mut sub = Graph::new(n);
        for (i, &v) in order.iter().enumerate() {
            sub.labels[i] = self.labels[v];
            for (j, &w) in order.iter().enumerate() {
                sub.adj[i * n + j] = self.edge_label(v, w);
            }
        }
        sub
    }

    fn check_vertex(&self, v: usize) -> Result<(), Error> {
        if v < self.node_count {
            Ok(())
        } else {
            Err(Error::VertexOutOfRange {
                vertex: v,
                node_count: self.node_count,
            })
        }
    }
}
