//! The VF binary format: a stream of little-endian 16-bit words.
//!
//! Word 0 is the vertex count, followed by one vertex-label word per
//! vertex, then per vertex a length word and that many (target, label)
//! word pairs. Labels occupy the top `k` bits of their word, where `k`
//! grows with the vertex count so that roughly a third of the vertices
//! share a label class; decoded edge labels are offset by one to keep
//! zero as the no-edge value.

use crate::{Error, Graph};

pub fn parse(
    bytes: &[u8],
    directed: bool,
    edge_labelled: bool,
    vertex_labelled: bool,
) -> Result<Graph, Error> {
    let mut words = Words::new(bytes);

    let node_count = words.next()? as usize;
    let mut graph = Graph::new(node_count);
    let width = label_width(node_count);

    for v in 0..node_count {
        let raw = words.next()? as u32;
        if vertex_labelled {
            graph.add_vertex_label(v, raw >> (16 - width))?;
        }
    }

    for v in 0..node_count {
        let edges = words.next()? as usize;
        for _ in 0..edges {
            let target = words.next()? as usize;
            let raw = words.next()? as u32;
            let label = if edge_labelled {
                (raw >> (16 - width)) + 1
            } else {
                1
            };
            graph.add_edge(v, target, label, directed)?;
        }
    }

    Ok(graph)
}

/// Number of label bits for a graph of `node_count` vertices: the
/// smallest `k <= 16` with `2^k >= node_count * 33 / 100`.
fn label_width(node_count: usize) -> u32 {
    let target = node_count * 33 / 100;
    let mut reach = 1;
    let mut width = 0;
    while reach < target && width < 16 {
        reach *= 2;
        width += 1;
    }
    width
}

struct Words<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Words<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn next(&mut self) -> Result<u16, Error> {
        if self.pos + 2 > self.bytes.len() {
            return Err(Error::UnexpectedEof {
                expected: "16-bit word",
            });
        }
        let word = u16::from_le_bytes([self.bytes[self.pos], self.bytes[self.pos + 1]]);
        self.pos += 2;
        Ok(word)
    }
}
