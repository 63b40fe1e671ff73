//! Error types for tables and graphs.

/// Errors reported by [`crate::HashTable`] and [`crate::Graph`].
///
/// A failed operation never leaves a table in an inconsistent state: the
/// insertion that triggered the failure simply did not happen.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TableError {
    /// The slot array could not be allocated, either during construction or
    /// while growing. Also reported when the requested capacity overflows.
    #[error("failed to allocate a slot array of {capacity} slots")]
    AllocationFailure { capacity: usize },

    /// A vertex refers to a neighbor table the graph does not own.
    #[error("vertex {vertex} has no neighbor table owned by this graph")]
    InvalidInput { vertex: u64 },

    /// Probing wrapped around the whole table without finding the key or a
    /// free slot. Unreachable while the load factor stays below 0.7.
    #[error("probe wrapped around a full table of {capacity} slots")]
    TableFull { capacity: usize },
}
