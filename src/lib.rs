//! probe-graph: a linear-probing hash table keyed by `u64`, and an
//! undirected weighted graph stored as a two-level adjacency structure on
//! top of it.
//!
//! Internal Design:
//!
//! Summary
//! - Layers, leaf first:
//!   - SlotTable<V>: flat array of `Slot::{Empty, Occupied { key, value }}`
//!     whose length is a power of two. Probing is `(home + i) & mask`.
//!   - HashTable<V, H, A>: wraps a SlotTable; adds hashing, get-or-create,
//!     and growth by doubling with a full rehash.
//!   - Graph<H, A>: vertex -> neighbor table -> weight. The vertex index
//!     stores handles into an arena that owns every neighbor table.
//!
//! Constraints
//! - Append/update only: no deletion, hence no tombstones and probe
//!   sequences never shorten.
//! - Load factor: an insertion that would make `(count + 1) * 10 >=
//!   capacity * 7` grows the table first.
//! - Single writer: mutation takes `&mut self`; concurrent writers need an
//!   external lock or sharding by vertex id.
//!
//! Slot references and growth
//! - Growth reallocates the slot array. `SlotMut` borrows the table
//!   mutably so it cannot outlive the next mutating call; `SlotHandle` is a
//!   plain index checked against the table's growth epoch and resolves to
//!   `None` once stale.
//!
//! Failure semantics
//! - Only allocation fails. Growth allocates before moving anything, so a
//!   failed insertion leaves `len()` and `capacity()` unchanged.
//! - `Graph::read_edges` is fail-fast without rollback: edges added before
//!   the failing one stay.
//!
//! Hashing
//! - `KeyHasher` selects the mixing function. `WordHash` is SplitMix64 on
//!   64-bit targets and Knuth's multiplicative hash elsewhere.
//!
//! Notes and non-goals
//! - No `remove`; tables never shrink.
//! - Loading text edge lists lives in `loader` and parses the whole input
//!   before touching the graph.

pub mod error;
pub mod graph;
pub mod hash;
pub mod hash_table;
mod hash_table_proptest;
pub mod loader;
pub mod slot_table;

// Public surface
pub use error::TableError;
pub use graph::{Edge, Graph, NeighborKey, VertexId, Weight};
pub use hash::{KeyHasher, Knuth32, SplitMix64, WordHash};
pub use hash_table::{HashTable, SlotHandle, SlotMut};
pub use loader::{load_edges, parse_edges, read_edges_from, LoadError, ParseEdgeError};
pub use slot_table::{Probe, Slot, SlotAlloc, SystemAlloc, DEFAULT_CAPACITY};
