//! Graph: weighted adjacency structure built from two levels of `HashTable`.
//!
//! The vertex index maps each vertex id to a `NeighborKey`; the key resolves
//! in an arena that owns every neighbor table. A vertex's neighbor table maps
//! neighbor id to edge weight. A vertex enters the index together with its
//! neighbor table, on its first outgoing connection.
//!
//! `add_connection` is directed. `read_edges` inserts both directions of
//! every edge and stops at the first failure, keeping what it already added.

use crate::error::TableError;
use crate::hash::{KeyHasher, WordHash};
use crate::hash_table::HashTable;
use crate::slot_table::{SlotAlloc, SystemAlloc};
use core::borrow::Borrow;
use slotmap::SlotMap;

pub type VertexId = u64;
pub type Weight = u64;

slotmap::new_key_type! {
    /// Handle to a neighbor table owned by a `Graph`.
    pub struct NeighborKey;
}

/// Undirected weighted edge record fed to `Graph::read_edges`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Edge {
    pub u: VertexId,
    pub v: VertexId,
    pub w: Weight,
}

impl Edge {
    pub const fn new(u: VertexId, v: VertexId, w: Weight) -> Self {
        Self { u, v, w }
    }
}

impl From<(VertexId, VertexId, Weight)> for Edge {
    fn from((u, v, w): (VertexId, VertexId, Weight)) -> Self {
        Self { u, v, w }
    }
}

#[derive(Debug)]
pub struct Graph<H = WordHash, A = SystemAlloc> {
    // Declared first so neighbor tables are released before the index.
    neighbors: SlotMap<NeighborKey, HashTable<Weight, H, A>>,
    index: HashTable<NeighborKey, H, A>,
    neighbor_capacity: usize,
}

impl Graph {
    /// Empty graph with default-capacity vertex and neighbor tables.
    pub fn new() -> Result<Self, TableError> {
        Self::with_capacity(0, 0)
    }

    /// `vertices` sizes the vertex index; `neighbors` sizes each neighbor
    /// table created later. Zero selects the default capacity.
    pub fn with_capacity(vertices: usize, neighbors: usize) -> Result<Self, TableError> {
        Self::with_hasher_in(vertices, neighbors, WordHash::default(), SystemAlloc)
    }

    /// Build a graph holding both directions of every edge.
    pub fn from_edges<I>(edges: I) -> Result<Self, TableError>
    where
        I: IntoIterator,
        I::Item: Borrow<Edge>,
    {
        let mut g = Self::new()?;
        g.read_edges(edges)?;
        Ok(g)
    }
}

impl<H, A> Graph<H, A> {
    /// Number of vertices in the index, including vertices with no neighbors.
    pub fn vertex_count(&self) -> usize {
        self.index.len()
    }

    /// Number of directed `u -> v` entries.
    pub fn edge_count(&self) -> usize {
        self.neighbors.values().map(HashTable::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.index.keys()
    }
}

impl<H, A> Graph<H, A>
where
    H: KeyHasher + Clone,
    A: SlotAlloc + Clone,
{
    pub fn with_hasher_in(
        vertices: usize,
        neighbors: usize,
        hasher: H,
        alloc: A,
    ) -> Result<Self, TableError> {
        Ok(Self {
            neighbors: SlotMap::with_key(),
            index: HashTable::with_hasher_in(vertices, hasher, alloc)?,
            neighbor_capacity: neighbors,
        })
    }

    /// Record the directed connection `u -> v` with weight `w`, overwriting
    /// any previous weight for the same ordered pair.
    ///
    /// If the neighbor insertion fails, `u` stays in the vertex index.
    pub fn add_connection(&mut self, u: VertexId, v: VertexId, w: Weight) -> Result<(), TableError> {
        let key = match self.index.get(u) {
            Some(&key) => key,
            None => self.create_neighbor_table(u)?,
        };
        let adj = self
            .neighbors
            .get_mut(key)
            .ok_or(TableError::InvalidInput { vertex: u })?;
        adj.get_or_create(v)?.set(w);
        Ok(())
    }

    // Allocate an empty neighbor table and register it under `u`. Nothing is
    // left behind if either allocation fails.
    fn create_neighbor_table(&mut self, u: VertexId) -> Result<NeighborKey, TableError> {
        let table = HashTable::with_hasher_in(
            self.neighbor_capacity,
            self.index.hasher().clone(),
            self.index.allocator().clone(),
        )?;
        let key = self.neighbors.insert(table);
        match self.index.get_or_create(u) {
            Ok(mut slot) => {
                slot.set(key);
                Ok(key)
            }
            Err(err) => {
                self.neighbors.remove(key);
                Err(err)
            }
        }
    }

    /// Insert `u -> v` and `v -> u` for each edge, in order.
    ///
    /// Stops at the first failure and returns it; edges processed before it
    /// stay in the graph.
    pub fn read_edges<I>(&mut self, edges: I) -> Result<(), TableError>
    where
        I: IntoIterator,
        I::Item: Borrow<Edge>,
    {
        let mut processed = 0usize;
        for e in edges {
            let e: &Edge = e.borrow();
            let res = self
                .add_connection(e.u, e.v, e.w)
                .and_then(|()| self.add_connection(e.v, e.u, e.w));
            if let Err(err) = res {
                tracing::warn!(processed, u = e.u, v = e.v, error = %err, "edge ingestion aborted");
                return Err(err);
            }
            processed += 1;
        }
        tracing::debug!(
            processed,
            vertices = self.vertex_count(),
            "edge ingestion finished"
        );
        Ok(())
    }

    /// Neighbor table of `u`, if `u` has one.
    pub fn neighbor_table(&self, u: VertexId) -> Option<&HashTable<Weight, H, A>> {
        let key = *self.index.get(u)?;
        self.neighbors.get(key)
    }

    pub fn contains_vertex(&self, u: VertexId) -> bool {
        self.index.contains_key(u)
    }

    /// Weight of the directed connection `u -> v`.
    pub fn weight(&self, u: VertexId, v: VertexId) -> Option<Weight> {
        self.neighbor_table(u)?.get(v).copied()
    }

    /// `(neighbor, weight)` pairs of `u`; empty for unknown vertices.
    pub fn neighbors(&self, u: VertexId) -> impl Iterator<Item = (VertexId, Weight)> + '_ {
        self.neighbor_table(u)
            .into_iter()
            .flat_map(|adj| adj.iter().map(|(v, w)| (v, *w)))
    }

    pub fn degree(&self, u: VertexId) -> usize {
        self.neighbor_table(u).map_or(0, HashTable::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_is_empty() {
        let g = Graph::new().unwrap();
        assert!(g.is_empty());
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.weight(1, 2).is_none());
        assert_eq!(g.neighbors(1).count(), 0);
        assert_eq!(g.degree(1), 0);
    }

    #[test]
    fn add_connection_is_directed() {
        let mut g = Graph::new().unwrap();
        g.add_connection(1, 2, 10).unwrap();
        assert_eq!(g.weight(1, 2), Some(10));
        assert_eq!(g.weight(2, 1), None);
        assert!(g.contains_vertex(1));
        assert!(!g.contains_vertex(2));
    }

    #[test]
    fn duplicate_connection_is_last_write_wins() {
        let mut g = Graph::new().unwrap();
        g.add_connection(1, 2, 10).unwrap();
        g.add_connection(1, 2, 20).unwrap();
        assert_eq!(g.weight(1, 2), Some(20));
        assert_eq!(g.degree(1), 1);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn read_edges_inserts_both_directions() {
        let mut g = Graph::new().unwrap();
        g.read_edges([Edge::new(1, 2, 5), Edge::new(2, 3, 7)]).unwrap();
        assert_eq!(g.weight(1, 2), Some(5));
        assert_eq!(g.weight(2, 1), Some(5));
        assert_eq!(g.weight(2, 3), Some(7));
        assert_eq!(g.weight(3, 2), Some(7));
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.degree(2), 2);
    }

    #[test]
    fn neighbors_lists_every_connection() {
        let edges: Vec<Edge> = (1..=5u64).map(|v| Edge::new(0, v, v * 10)).collect();
        let g = Graph::from_edges(&edges).unwrap();
        let mut ns: Vec<_> = g.neighbors(0).collect();
        ns.sort_unstable();
        assert_eq!(ns, vec![(1, 10), (2, 20), (3, 30), (4, 40), (5, 50)]);

        let mut vs: Vec<_> = g.vertices().collect();
        vs.sort_unstable();
        assert_eq!(vs, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn self_loop_is_a_single_entry() {
        let mut g = Graph::new().unwrap();
        g.read_edges([Edge::new(4, 4, 1)]).unwrap();
        assert_eq!(g.weight(4, 4), Some(1));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn dense_vertex_grows_neighbor_table() {
        let mut g = Graph::with_capacity(0, 2).unwrap();
        for v in 0..200u64 {
            g.add_connection(9, v, v).unwrap();
        }
        let adj = g.neighbor_table(9).unwrap();
        assert_eq!(adj.len(), 200);
        assert_eq!(adj.capacity(), 512);
        assert!((0..200u64).all(|v| g.weight(9, v) == Some(v)));
    }
}
