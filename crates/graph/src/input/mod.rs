//! Input formats for common subgraph benchmark corpora.

use std::path::Path;

use log::info;

use crate::{Error, Graph};

pub mod dimacs;
pub mod lad;
pub mod vf;

/// The three on-disk formats the benchmark corpora come in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Dimacs,
    Lad,
    VfBinary,
}

/// Reads a graph file.
///
/// `directed` controls the arc encoding, `edge_labelled` and
/// `vertex_labelled` control whether labels present in the input are
/// kept or collapsed to the unlabelled defaults.
pub fn read_graph(
    path: impl AsRef<Path>,
    format: Format,
    directed: bool,
    edge_labelled: bool,
    vertex_labelled: bool,
) -> Result<Graph, Error> {
    let bytes = std::fs::read(path.as_ref())?;

    let graph = match format {
        Format::Dimacs => dimacs::parse(&bytes, directed, vertex_labelled),
        Format::Lad => lad::parse(&bytes, directed),
        Format::VfBinary => vf::parse(&bytes, directed, edge_labelled, vertex_labelled),
    }?;

    info!(
        "read {} vertices from {}",
        graph.node_count(),
        path.as_ref().display()
    );

    Ok(graph)
}

/// Pulls whitespace-separated decimal integers out of a byte buffer.
pub(crate) struct Numbers<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Numbers<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn next(&mut self) -> Option<usize> {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        if self.pos == self.bytes.len() {
            return None;
        }
        let (value, digits) = atoi::FromRadix10::from_radix_10(&self.bytes[self.pos..]);
        if digits == 0 {
            return None;
        }
        self.pos += digits;
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn numbers_scans_across_whitespace() {
        let mut numbers = Numbers::new(b"  12\t3\n4096 ");

        assert_eq!(numbers.next(), Some(12));
        assert_eq!(numbers.next(), Some(3));
        assert_eq!(numbers.next(), Some(4096));
        assert_eq!(numbers.next(), None);
    }

    #[test]
    fn numbers_stops_at_garbage() {
        let mut numbers = Numbers::new(b"7 x");

        assert_eq!(numbers.next(), Some(7));
        assert_eq!(numbers.next(), None);
    }

    #[test]
    fn read_graph_from_dimacs_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "c tiny\np edge 3 2\ne 1 2\ne 2 3\n").unwrap();

        let graph = read_graph(file.path(), Format::Dimacs, false, false, false).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(1, 2));
        assert!(!graph.has_edge(0, 2));
    }

    #[test]
    fn read_graph_propagates_io_errors() {
        let result = read_graph("/definitely/not/here", Format::Lad, false, false, false);

        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
