//! The LAD text format: one integer for the vertex count, then for each
//! vertex its neighbour count followed by that many 0-indexed neighbour
//! ids. Undirected files list every edge under both endpoints.

use super::Numbers;
use crate::{Error, Graph};

pub fn parse(bytes: &[u8], directed: bool) -> Result<Graph, Error> {
    let mut numbers = Numbers::new(bytes);

    let node_count = numbers.next().ok_or(Error::UnexpectedEof {
        expected: "vertex count",
    })?;
    let mut graph = Graph::new(node_count);

    for v in 0..node_count {
        let neighbours = numbers.next().ok_or(Error::UnexpectedEof {
            expected: "neighbour count",
        })?;
        for _ in 0..neighbours {
            let w = numbers.next().ok_or(Error::UnexpectedEof {
                expected: "neighbour id",
            })?;
            graph.add_edge(v, w, 1, directed)?;
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_triangle() {
        let graph = parse(b"3\n2 1 2\n2 0 2\n2 0 1\n", false).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(0, 2));
        assert!(graph.has_edge(1, 2));
    }

    #[test]
    fn parses_loops_into_the_label() {
        let graph = parse(b"2\n2 0 1\n1 0\n", false).unwrap();

        assert!(graph.has_loop(0));
        assert!(graph.has_edge(0, 1));
        assert!(!graph.has_edge(0, 0));
    }

    #[test]
    fn truncated_input_fails() {
        assert!(matches!(
            parse(b"2\n1 1\n1\n", false),
            Err(Error::UnexpectedEof {
                expected: "neighbour id"
            })
        ));
        assert!(matches!(
            parse(b"", false),
            Err(Error::UnexpectedEof {
                expected: "vertex count"
            })
        ));
    }

    #[test]
    fn neighbour_out_of_range_fails() {
        assert!(matches!(
            parse(b"2\n1 5\n0\n", false),
            Err(Error::VertexOutOfRange {
                vertex: 5,
                node_count: 2
            })
        ));
    }
}
