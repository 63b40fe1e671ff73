//! Edge-list loading: one `u v w` triple of unsigned integers per line.
//!
//! The whole input is parsed before the graph is touched, so a malformed
//! line never leaves a half-loaded graph behind.

use crate::error::TableError;
use crate::graph::{Edge, Graph};
use crate::hash::KeyHasher;
use crate::slot_table::SlotAlloc;
use core::str::FromStr;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::num::ParseIntError;
use std::path::Path;

/// Why a single line is not an edge.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseEdgeError {
    #[error("expected 3 fields `u v w`, found {0}")]
    FieldCount(usize),
    #[error("invalid {field} `{text}`: {source}")]
    Integer {
        field: &'static str,
        text: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read edge list: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Format {
        line: usize,
        #[source]
        source: ParseEdgeError,
    },
    #[error(transparent)]
    Graph(#[from] TableError),
}

impl FromStr for Edge {
    type Err = ParseEdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let [u, v, w] = fields[..] else {
            return Err(ParseEdgeError::FieldCount(fields.len()));
        };
        Ok(Edge {
            u: field("u", u)?,
            v: field("v", v)?,
            w: field("w", w)?,
        })
    }
}

fn field(name: &'static str, text: &str) -> Result<u64, ParseEdgeError> {
    text.parse::<u64>().map_err(|source| ParseEdgeError::Integer {
        field: name,
        text: text.to_string(),
        source,
    })
}

/// Parse every non-blank line of `reader` as an edge.
pub fn parse_edges<R: BufRead>(reader: R) -> Result<Vec<Edge>, LoadError> {
    let mut edges = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let edge = line.parse::<Edge>().map_err(|source| LoadError::Format {
            line: i + 1,
            source,
        })?;
        edges.push(edge);
    }
    Ok(edges)
}

/// Parse `reader` and add both directions of every edge to `graph`.
pub fn read_edges_from<R, H, A>(graph: &mut Graph<H, A>, reader: R) -> Result<usize, LoadError>
where
    R: BufRead,
    H: KeyHasher + Clone,
    A: SlotAlloc + Clone,
{
    let edges = parse_edges(reader)?;
    graph.read_edges(&edges)?;
    Ok(edges.len())
}

/// Load the edge list at `path` into `graph`, returning the number of edges read.
pub fn load_edges<P, H, A>(graph: &mut Graph<H, A>, path: P) -> Result<usize, LoadError>
where
    P: AsRef<Path>,
    H: KeyHasher + Clone,
    A: SlotAlloc + Clone,
{
    let path = path.as_ref();
    let file = File::open(path)?;
    let n = read_edges_from(graph, BufReader::new(file))?;
    tracing::debug!(path = %path.display(), edges = n, "loaded edge list");
    Ok(n)
}

impl Graph {
    /// Build a graph from the edge list at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let mut g = Graph::new()?;
        load_edges(&mut g, path)?;
        Ok(g)
    }
}
