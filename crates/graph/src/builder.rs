use crate::{Error, Graph};

/// A fluent builder for programmatic graphs, mostly used by tests and
/// benchmarks; file-based inputs go through [`crate::read_graph`].
///
/// ```
/// use mcs_graph::GraphBuilder;
///
/// let graph = GraphBuilder::new(3)
///     .labels(vec![1, 1, 2])
///     .edge(0, 1)
///     .edge_with_label(1, 2, 5)
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.label(2), 2);
/// assert_eq!(graph.edge_label(1, 2), 5);
/// ```
pub struct GraphBuilder {
    node_count: usize,
    directed: bool,
    labels: Option<Vec<u32>>,
    edges: Vec<(usize, usize, u32)>,
    loops: Vec<usize>,
}

impl GraphBuilder {
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            directed: false,
            labels: None,
            edges: Vec::new(),
            loops: Vec::new(),
        }
    }

    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Vertex labels, one per vertex.
    pub fn labels(mut self, labels: Vec<u32>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn edge(self, source: usize, target: usize) -> Self {
        self.edge_with_label(source, target, 1)
    }

    pub fn edge_with_label(mut self, source: usize, target: usize, label: u32) -> Self {
        self.edges.push((source, target, label));
        self
    }

    pub fn loop_at(mut self, vertex: usize) -> Self {
        self.loops.push(vertex);
        self
    }

    pub fn build(self) -> Result<Graph, Error> {
        let mut graph = Graph::new(self.node_count);

        if let Some(labels) = self.labels {
            if labels.len() != self.node_count {
                return Err(Error::InvalidLabels);
            }
            for (v, label) in labels.into_iter().enumerate() {
                graph.add_vertex_label(v, label)?;
            }
        }

        for v in self.loops {
            graph.add_edge(v, v, 1, self.directed)?;
        }

        for (source, target, label) in self.edges {
            graph.add_edge(source, target, label, self.directed)?;
        }

        Ok(graph)
    }
}
