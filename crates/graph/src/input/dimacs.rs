//! The DIMACS clique/subgraph text format.
//!
//! ```text
//! c comment
//! p edge 4 3
//! e 1 2
//! e 2 3
//! e 3 4
//! n 1 7
//! ```
//!
//! Vertices are 1-indexed, `n` lines carry optional vertex labels and
//! loops are not allowed.

use super::Numbers;
use crate::{Error, Graph};

pub fn parse(bytes: &[u8], directed: bool, vertex_labelled: bool) -> Result<Graph, Error> {
    let mut graph: Option<Graph> = None;
    let mut declared_edges = 0;
    let mut edges_read = 0;

    for (idx, line) in bytes.split(|&b| b == b'\n').enumerate() {
        let line_no = idx + 1;
        let line = trim(line);
        if line.is_empty() {
            continue;
        }

        match line[0] {
            b'p' => {
                if graph.is_some() {
                    return Err(Error::DuplicateHeader { line: line_no });
                }
                let expected = "p edge <vertices> <edges>";
                let rest = line
                    .strip_prefix(b"p edge")
                    .ok_or(Error::Malformed { line: line_no, expected })?;
                let mut numbers = Numbers::new(rest);
                let node_count = numbers
                    .next()
                    .ok_or(Error::Malformed { line: line_no, expected })?;
                declared_edges = numbers
                    .next()
                    .ok_or(Error::Malformed { line: line_no, expected })?;
                graph = Some(Graph::new(node_count));
            }
            b'e' => {
                let graph = graph.as_mut().ok_or(Error::MissingHeader)?;
                let (v, w) = two_fields(&line[1..], line_no, "e <vertex> <vertex>")?;
                if v == 0 || w == 0 {
                    return Err(Error::VertexOutOfRange {
                        vertex: 0,
                        node_count: graph.node_count(),
                    });
                }
                if v == w {
                    return Err(Error::UnexpectedLoop { vertex: v - 1 });
                }
                graph.add_edge(v - 1, w - 1, 1, directed)?;
                edges_read += 1;
            }
            b'n' => {
                let graph = graph.as_mut().ok_or(Error::MissingHeader)?;
                let (v, label) = two_fields(&line[1..], line_no, "n <vertex> <label>")?;
                if v == 0 {
                    return Err(Error::VertexOutOfRange {
                        vertex: 0,
                        node_count: graph.node_count(),
                    });
                }
                let label = u32::try_from(label).map_err(|_| Error::Malformed {
                    line: line_no,
                    expected: "n <vertex> <label>",
                })?;
                if vertex_labelled {
                    graph.add_vertex_label(v - 1, label)?;
                }
            }
            // Comments and anything unknown are skipped.
            _ => {}
        }
    }

    let graph = graph.ok_or(Error::MissingHeader)?;
    if declared_edges > 0 && edges_read != declared_edges {
        return Err(Error::EdgeCountMismatch {
            expected: declared_edges,
            actual: edges_read,
        });
    }
    Ok(graph)
}

fn two_fields(
    bytes: &[u8],
    line_no: usize,
    expected: &'static str,
) -> Result<(usize, usize), Error> {
    let mut numbers = Numbers::new(bytes);
    let first = numbers.next().ok_or(Error::Malformed {
        line: line_no,
        expected,
    })?;
    let second = numbers.next().ok_or(Error::Malformed {
        line: line_no,
        expected,
    })?;
    Ok((first, second))
}

fn trim(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|b| !b.is_ascii_whitespace());
    let end = line.iter().rposition(|b| !b.is_ascii_whitespace());
    match (start, end) {
        (Some(start), Some(end)) => &line[start..=end],
        _ => &[],
    }
}
