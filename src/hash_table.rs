//! HashTable: linear-probing table keyed by `u64`, grown by full rehash.
//!
//! Growth reallocates the slot array, so any position inside it is only
//! meaningful until the next insertion that may grow. The API encodes that
//! in two ways:
//! - `SlotMut` borrows the table mutably; the borrow checker rejects keeping
//!   it across another mutating call.
//! - `SlotHandle` is a plain copyable index stamped with the table's growth
//!   epoch. It resolves only through a fresh borrow of the table and turns
//!   into `None` once the table has grown since it was minted.

use crate::error::TableError;
use crate::hash::{KeyHasher, WordHash};
use crate::slot_table::{needs_growth, table_capacity, Probe, SlotAlloc, SlotTable, SystemAlloc};

/// Index of an occupied slot, valid until the owning table grows.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotHandle {
    index: usize,
    epoch: u32,
}

impl SlotHandle {
    /// Raw slot position at the time the handle was minted.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn key<V, H, A>(&self, table: &HashTable<V, H, A>) -> Option<u64> {
        table.handle_entry(*self).map(|(k, _)| k)
    }

    pub fn value<'a, V, H, A>(&self, table: &'a HashTable<V, H, A>) -> Option<&'a V> {
        table.handle_entry(*self).map(|(_, v)| v)
    }

    pub fn value_mut<'a, V, H, A>(&self, table: &'a mut HashTable<V, H, A>) -> Option<&'a mut V> {
        table.handle_value_mut(*self)
    }
}

/// Mutable access to one occupied slot, returned by the insertion paths.
#[derive(Debug)]
pub struct SlotMut<'a, V> {
    key: u64,
    value: &'a mut V,
    handle: SlotHandle,
    created: bool,
}

impl<'a, V> SlotMut<'a, V> {
    pub fn key(&self) -> u64 {
        self.key
    }

    /// Handle to re-find this slot later without probing.
    pub fn handle(&self) -> SlotHandle {
        self.handle
    }

    /// True when this call inserted the key.
    pub fn is_new(&self) -> bool {
        self.created
    }

    pub fn get(&self) -> &V {
        self.value
    }

    pub fn get_mut(&mut self) -> &mut V {
        self.value
    }

    pub fn into_mut(self) -> &'a mut V {
        self.value
    }

    /// Overwrite the stored value, returning the previous one.
    pub fn set(&mut self, value: V) -> V {
        core::mem::replace(self.value, value)
    }
}

/// Open-addressing table from `u64` keys to values of type `V`.
///
/// Capacity is always a power of two and the load factor stays below 0.7
/// after every insertion. Entries are never removed.
///
/// Every mutating call takes `&mut self`, so a table shared across threads
/// needs an owner that serializes writers (a `Mutex`, or one table per shard).
#[derive(Debug)]
pub struct HashTable<V, H = WordHash, A = SystemAlloc> {
    hasher: H,
    alloc: A,
    slots: SlotTable<V>,
    epoch: u32,
}

impl<V> HashTable<V> {
    /// Empty table with the default capacity of 16 slots.
    pub fn new() -> Result<Self, TableError> {
        Self::with_capacity(0)
    }

    /// Empty table with at least `capacity` slots (rounded up to a power of two).
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_hasher_in(capacity, WordHash::default(), SystemAlloc)
    }
}

impl<V, H, A> HashTable<V, H, A> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn load_factor(&self) -> f64 {
        self.slots.len() as f64 / self.slots.capacity() as f64
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Entries in slot order, which is unspecified and changes on growth.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &V)> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u64, &mut V)> {
        self.slots.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.slots.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.slots.iter().map(|(_, v)| v)
    }

    fn handle_entry(&self, h: SlotHandle) -> Option<(u64, &V)> {
        if h.epoch != self.epoch {
            return None;
        }
        self.slots.get(h.index)
    }

    fn handle_value_mut(&mut self, h: SlotHandle) -> Option<&mut V> {
        if h.epoch != self.epoch {
            return None;
        }
        self.slots.get_mut(h.index).map(|(_, v)| v)
    }
}

impl<V, H, A> HashTable<V, H, A>
where
    H: KeyHasher,
    A: SlotAlloc,
{
    pub fn with_hasher_in(capacity: usize, hasher: H, alloc: A) -> Result<Self, TableError> {
        let capacity = table_capacity(capacity)?;
        let slots = SlotTable::allocate(capacity, &alloc)?;
        Ok(Self {
            hasher,
            alloc,
            slots,
            epoch: 0,
        })
    }

    /// Raw probe: the slot holding `key`, or the first free slot on its path.
    /// Never creates or grows.
    pub fn probe(&self, key: u64) -> Result<Probe, TableError> {
        let hash = self.hasher.hash_key(key);
        self.slots.probe(key, hash)
    }

    pub fn find(&self, key: u64) -> Option<SlotHandle> {
        match self.probe(key) {
            Ok(Probe::Occupied(index)) => Some(SlotHandle {
                index,
                epoch: self.epoch,
            }),
            // A full wrap means the key is not present.
            Ok(Probe::Vacant(_)) | Err(_) => None,
        }
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: u64) -> Option<&V> {
        let h = self.find(key)?;
        self.slots.get(h.index).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: u64) -> Option<&mut V> {
        let h = self.find(key)?;
        self.slots.get_mut(h.index).map(|(_, v)| v)
    }

    /// Slot for `key`, inserting `V::default()` if absent.
    ///
    /// Existing entries are returned untouched. On `AllocationFailure` the
    /// table is exactly as it was before the call.
    pub fn get_or_create(&mut self, key: u64) -> Result<SlotMut<'_, V>, TableError>
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Slot for `key`, inserting `default()` if absent. `default` only runs
    /// when the key is inserted.
    pub fn get_or_insert_with<F>(&mut self, key: u64, default: F) -> Result<SlotMut<'_, V>, TableError>
    where
        F: FnOnce() -> V,
    {
        match self.locate(key)? {
            Probe::Occupied(index) => Ok(self.occupied(index)),
            Probe::Vacant(index) => {
                let handle = SlotHandle {
                    index,
                    epoch: self.epoch,
                };
                let value = self.slots.occupy(index, key, default());
                Ok(SlotMut {
                    key,
                    value,
                    handle,
                    created: true,
                })
            }
        }
    }

    /// Insert or overwrite, returning the previous value.
    pub fn insert(&mut self, key: u64, value: V) -> Result<Option<V>, TableError> {
        match self.locate(key)? {
            Probe::Occupied(index) => Ok(Some(self.occupied(index).set(value))),
            Probe::Vacant(index) => {
                self.slots.occupy(index, key, value);
                Ok(None)
            }
        }
    }

    fn occupied(&mut self, index: usize) -> SlotMut<'_, V> {
        let handle = SlotHandle {
            index,
            epoch: self.epoch,
        };
        let (key, value) = self.slots.occupied_mut(index);
        SlotMut {
            key,
            value,
            handle,
            created: false,
        }
    }

    // Probe for `key`, growing first if inserting it would reach the load
    // limit. A returned `Vacant` slot is safe to occupy.
    fn locate(&mut self, key: u64) -> Result<Probe, TableError> {
        let hash = self.hasher.hash_key(key);
        match self.slots.probe(key, hash)? {
            Probe::Vacant(_) if needs_growth(self.slots.len(), self.slots.capacity()) => {
                Self::grow(&mut self.slots, &self.hasher, &self.alloc)?;
                self.epoch = self.epoch.wrapping_add(1);
                self.slots.probe(key, hash)
            }
            probe => Ok(probe),
        }
    }

    fn grow(slots: &mut SlotTable<V>, hasher: &H, alloc: &A) -> Result<(), TableError> {
        let old_capacity = slots.capacity();
        let new_capacity = old_capacity
            .checked_mul(2)
            .ok_or(TableError::AllocationFailure {
                capacity: old_capacity,
            })?;
        // Allocate before touching anything so failure leaves the table intact.
        let fresh = SlotTable::allocate(new_capacity, alloc)?;
        let old = core::mem::replace(slots, fresh);
        let entries = old.len();
        for (key, value) in old.into_entries() {
            slots.insert_unique(key, hasher.hash_key(key), value)?;
        }
        debug_assert_eq!(slots.len(), entries);
        tracing::debug!(old_capacity, new_capacity, entries, "hash table grew");
        Ok(())
    }
}
