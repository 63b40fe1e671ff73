//! SlotTable: the flat slot array underneath `HashTable`.
//!
//! Owns its buffer exclusively and knows nothing about growth. Probing is
//! plain index arithmetic: `(home + i) & mask` for `i in 0..capacity`.
//! There is no deletion, so an `Empty` slot always terminates a probe
//! sequence and no tombstones exist.

use crate::error::TableError;

/// Capacity used when the caller asks for zero slots.
pub const DEFAULT_CAPACITY: usize = 16;

/// One entry of the slot array.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Slot<V> {
    Empty,
    Occupied { key: u64, value: V },
}

impl<V> Slot<V> {
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied { .. })
    }
}

/// Outcome of a probe: the slot holding the key, or the first free slot
/// along the key's probe path.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Probe {
    Occupied(usize),
    Vacant(usize),
}

impl Probe {
    pub fn index(self) -> usize {
        match self {
            Probe::Occupied(i) | Probe::Vacant(i) => i,
        }
    }
}

/// Source of slot arrays. The seam through which allocation failure reaches
/// the table.
pub trait SlotAlloc {
    /// Return `capacity` empty slots, or `AllocationFailure`.
    fn allocate<V>(&self, capacity: usize) -> Result<Vec<Slot<V>>, TableError>;
}

/// Allocates from the global allocator, reporting exhaustion instead of
/// aborting.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemAlloc;

impl SlotAlloc for SystemAlloc {
    fn allocate<V>(&self, capacity: usize) -> Result<Vec<Slot<V>>, TableError> {
        let mut slots = Vec::new();
        if let Err(err) = slots.try_reserve_exact(capacity) {
            tracing::warn!(capacity, error = %err, "slot array allocation failed");
            return Err(TableError::AllocationFailure { capacity });
        }
        slots.resize_with(capacity, || Slot::Empty);
        Ok(slots)
    }
}

/// Round a requested capacity to the power of two actually allocated.
pub fn table_capacity(requested: usize) -> Result<usize, TableError> {
    if requested == 0 {
        return Ok(DEFAULT_CAPACITY);
    }
    requested
        .checked_next_power_of_two()
        .ok_or(TableError::AllocationFailure {
            capacity: requested,
        })
}

/// Whether inserting one more entry would reach the 0.7 load factor.
#[inline]
pub const fn needs_growth(count: usize, capacity: usize) -> bool {
    (count + 1) * 10 >= capacity * 7
}

#[derive(Debug)]
pub struct SlotTable<V> {
    slots: Vec<Slot<V>>,
    count: usize,
}

impl<V> SlotTable<V> {
    /// Allocate `capacity` empty slots. `capacity` must be a power of two.
    pub fn allocate<A: SlotAlloc>(capacity: usize, alloc: &A) -> Result<Self, TableError> {
        debug_assert!(capacity.is_power_of_two());
        let slots = alloc.allocate(capacity)?;
        debug_assert_eq!(slots.len(), capacity);
        Ok(Self { slots, count: 0 })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    /// Linear probe from the home index of `hash`.
    pub fn probe(&self, key: u64, hash: u64) -> Result<Probe, TableError> {
        let mask = self.mask();
        let home = (hash as usize) & mask;
        for i in 0..self.slots.len() {
            let pos = (home + i) & mask;
            match &self.slots[pos] {
                Slot::Empty => return Ok(Probe::Vacant(pos)),
                Slot::Occupied { key: k, .. } if *k == key => return Ok(Probe::Occupied(pos)),
                Slot::Occupied { .. } => {}
            }
        }
        Err(TableError::TableFull {
            capacity: self.slots.len(),
        })
    }

    /// Store a new entry in a slot returned as `Probe::Vacant`.
    pub fn occupy(&mut self, index: usize, key: u64, value: V) -> &mut V {
        debug_assert!(!self.slots[index].is_occupied());
        self.slots[index] = Slot::Occupied { key, value };
        self.count += 1;
        self.occupied_mut(index).1
    }

    /// Entry in a slot returned as `Probe::Occupied`, or just filled by `occupy`.
    pub fn occupied_mut(&mut self, index: usize) -> (u64, &mut V) {
        let Slot::Occupied { key, value } = &mut self.slots[index] else {
            unreachable!("slot {index} is not occupied");
        };
        (*key, value)
    }

    /// Insert a key known to be absent, as done while rehashing.
    pub fn insert_unique(&mut self, key: u64, hash: u64, value: V) -> Result<(), TableError> {
        let index = self.probe(key, hash)?.index();
        self.occupy(index, key, value);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<(u64, &V)> {
        match self.slots.get(index)? {
            Slot::Occupied { key, value } => Some((*key, value)),
            Slot::Empty => None,
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<(u64, &mut V)> {
        match self.slots.get_mut(index)? {
            Slot::Occupied { key, value } => Some((*key, value)),
            Slot::Empty => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &V)> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((*key, value)),
            Slot::Empty => None,
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u64, &mut V)> {
        self.slots.iter_mut().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((*key, value)),
            Slot::Empty => None,
        })
    }

    /// Consume the table, yielding every occupied entry.
    pub fn into_entries(self) -> impl Iterator<Item = (u64, V)> {
        self.slots.into_iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key, value)),
            Slot::Empty => None,
        })
    }
}
