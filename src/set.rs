//! The hot set: a hash set using open addressing with tombstone sentinels.

use std::hash::{BuildHasher, Hash, RandomState};
use std::mem;

use crate::load::{DefaultLoadPolicy, LoadPolicy};
use crate::probe;
use crate::storage::SlotBuffer;
use crate::tombstone::{TombstoneSource, ValueTombstone};

/// An open-addressing hash set with in-place tombstone markers and eager
/// repair on deletion.
///
/// Every slot of the backing array holds either a live element or the current
/// tombstone sentinel; there is no occupancy bitmap. A slot is free exactly
/// when it compares equal to the sentinel, so the sentinel must never equal a
/// value a caller inserts (see [`HotSet::stable_insert`]).
///
/// Erasing an element immediately re-places every element whose probe
/// sequence ran through the erased slot, so lookups never degrade from stale
/// tombstones the way they do under lazy deletion; the price is O(cluster
/// length) work per erase.
///
/// Slot indices and iterators are invalidated by every structural mutation:
/// a growing insert, any erase, [`HotSet::shrink`],
/// [`HotSet::change_tombstone`] and [`HotSet::clear`].
///
/// Note: this container is not thread-safe; wrap it in external
/// synchronization for concurrent access.
#[derive(Debug, Clone)]
pub struct HotSet<T, Tomb = ValueTombstone<T>, S = RandomState, L = DefaultLoadPolicy> {
    /// Backing slot array; zero-length or power-of-two sized.
    slots: SlotBuffer<T>,
    /// Number of live elements.
    occupied: usize,
    /// Maximum live elements before an insert forces growth.
    capacity: usize,
    /// Hash policy.
    hasher: S,
    /// Load-factor policy.
    load: L,
    /// Tombstone sentinel policy.
    tomb: Tomb,
}

impl<T> HotSet<T>
where
    T: Eq + Hash + Clone,
{
    /// Creates an empty set whose sentinel is `tombstone`; allocates nothing.
    #[must_use]
    pub fn with_tombstone(tombstone: T) -> Self {
        Self::with_capacity(0, tombstone)
    }

    /// Creates a set sized for `capacity` elements with `tombstone` as the
    /// sentinel.
    ///
    /// The allocation is the load policy's rounding of the hint (a hint of 10
    /// yields 32 slots under the default policy); a hint of 0 allocates
    /// nothing.
    #[must_use]
    pub fn with_capacity(capacity: usize, tombstone: T) -> Self {
        Self::with_policies(
            capacity,
            ValueTombstone::new(tombstone),
            RandomState::new(),
            DefaultLoadPolicy,
        )
    }
}

impl<T, Tomb, S, L> HotSet<T, Tomb, S, L>
where
    T: Eq + Hash + Clone,
    Tomb: TombstoneSource<T>,
    S: BuildHasher,
    L: LoadPolicy,
{
    /// Creates a set from explicitly supplied policies.
    #[must_use]
    pub fn with_policies(capacity: usize, tombstone: Tomb, hasher: S, load: L) -> Self {
        let size = load.allocated(capacity);
        let slots = if size == 0 {
            SlotBuffer::empty()
        } else {
            SlotBuffer::filled_with(size, &tombstone.tombstone())
        };
        let capacity = load.occupancy(size);
        Self { slots, occupied: 0, capacity, hasher, load, tomb: tombstone }
    }

    /// Number of live elements in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Returns true if the set holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Number of elements the set may hold before an insert reallocates.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots in the backing array.
    #[must_use]
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    /// Returns the current tombstone sentinel.
    #[must_use]
    pub fn tombstone(&self) -> T {
        self.tomb.tombstone()
    }

    /// Returns true if `value` compares equal to the sentinel.
    #[must_use]
    pub fn is_tombstone(&self, value: &T) -> bool {
        *value == self.tomb.tombstone()
    }

    /// The raw backing array: live elements interleaved with sentinel slots,
    /// in slot order.
    #[must_use]
    pub fn raw_slots(&self) -> &[T] {
        self.slots.as_slice()
    }

    /// Probes for `value` without mutating the set.
    ///
    /// Returns the resolved slot index and whether the value is present. On a
    /// miss the index names the slot where the value would be inserted (it is
    /// `allocated()` when the set has no allocation, or none of the slots on
    /// the probe route is free).
    #[must_use]
    pub fn find(&self, value: &T) -> (usize, bool) {
        if self.slots.is_empty() {
            return (0, false);
        }
        let start = self.start_slot(value);
        probe::find_slot(self.slots.as_slice(), start, &self.tomb.tombstone(), value)
    }

    /// Returns a reference to the stored element equal to `value`.
    #[must_use]
    pub fn get(&self, value: &T) -> Option<&T> {
        let (index, present) = self.find(value);
        if present { self.slots.as_slice().get(index) } else { None }
    }

    /// Returns true if the set contains `value`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.find(value).1
    }

    /// Inserts `value`, growing the backing array first if the set is at
    /// capacity (which invalidates all slot indices and iterators).
    ///
    /// Returns the slot the value landed in and whether an equal value was
    /// already present; a present value is overwritten, so the last write
    /// wins and `len()` is unchanged.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `value` compares equal to the tombstone
    /// sentinel. In release builds such an insert silently corrupts the
    /// occupancy accounting; never do it.
    pub fn insert(&mut self, value: T) -> (usize, bool) {
        if self.occupied == self.capacity {
            self.rehash(self.load.grow(self.slots.len()));
        }
        match self.stable_insert(value) {
            Ok(result) => result,
            // The grow above guarantees a free slot on every probe route.
            Err(_) => (self.slots.len(), false),
        }
    }

    /// Inserts `value` without ever reallocating; no iterator or slot index
    /// is invalidated.
    ///
    /// Requires `len() < capacity()`. When that contract is broken and the
    /// probe exhausts a full pass, the value is handed back as `Err` and the
    /// set is untouched.
    ///
    /// # Errors
    ///
    /// `Err(value)` if the set has no free slot for it.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `value` compares equal to the tombstone
    /// sentinel.
    pub fn stable_insert(&mut self, value: T) -> Result<(usize, bool), T> {
        let tomb = self.tomb.tombstone();
        debug_assert!(value != tomb, "inserted value equals the tombstone sentinel");
        if self.slots.is_empty() {
            return Err(value);
        }
        let start = self.start_slot(&value);
        let (index, present) = probe::find_slot(self.slots.as_slice(), start, &tomb, &value);
        match self.slots.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                if !present {
                    self.occupied = self.occupied.saturating_add(1);
                }
                Ok((index, present))
            }
            None => Err(value),
        }
    }

    /// Removes the element equal to `value`; returns whether one was present.
    ///
    /// A successful erase tombstones the slot and immediately re-places every
    /// element in the probe cluster behind it, so every surviving element
    /// stays reachable from its hash-selected start slot. Invalidates all
    /// slot indices and iterators.
    pub fn erase(&mut self, value: &T) -> bool {
        let (index, present) = self.find(value);
        if present {
            self.remove_at(index);
        }
        present
    }

    /// Removes the element stored at slot `index` (as returned by
    /// [`HotSet::find`] or [`HotSet::insert`]).
    ///
    /// Returns false without touching the set when the index is out of range
    /// or the slot holds the sentinel. Invalidates all slot indices and
    /// iterators on success.
    pub fn erase_at(&mut self, index: usize) -> bool {
        let live = match self.slots.as_slice().get(index) {
            Some(slot) => !self.is_tombstone(slot),
            None => false,
        };
        if live {
            self.remove_at(index);
        }
        live
    }

    /// Replaces the tombstone policy, rewriting every sentinel slot to the
    /// new sentinel. Returns the number of live elements that were logically
    /// deleted by the swap.
    ///
    /// Any live element that compares equal to the **new** sentinel becomes a
    /// free slot where it stands: it is counted, `len()` drops, and no
    /// relocation or notification happens. Elements whose probe sequence ran
    /// through such a slot can become unreachable. This is deliberate
    /// ("logical deletion by sentinel change") but easy to misuse; only swap
    /// to a sentinel the set cannot contain unless that is exactly the
    /// effect wanted. Invalidates all slot indices and iterators.
    pub fn change_tombstone(&mut self, source: Tomb) -> usize {
        let old = self.tomb.tombstone();
        let new = source.tombstone();
        self.tomb = source;
        if new == old {
            return 0;
        }
        let mut removed = 0usize;
        for slot in self.slots.as_mut_slice() {
            if *slot == old {
                *slot = new.clone();
            } else if *slot == new {
                removed = removed.saturating_add(1);
            }
        }
        self.occupied = self.occupied.saturating_sub(removed);
        removed
    }

    /// Shrinks the backing array to what the load policy assigns for the
    /// current element count, if that is smaller than the present allocation.
    ///
    /// Rehashes every live element into the smaller array (stale tombstones
    /// are dropped on the way); an empty set releases its allocation
    /// entirely. Invalidates all slot indices and iterators.
    pub fn shrink(&mut self) {
        let target = self.load.allocated(self.occupied);
        if target < self.slots.len() {
            self.rehash(target);
        }
    }

    /// Removes every element, keeping the allocation.
    pub fn clear(&mut self) {
        let tomb = self.tomb.tombstone();
        for slot in self.slots.as_mut_slice() {
            *slot = tomb.clone();
        }
        self.occupied = 0;
    }

    /// Iterates over the live elements in slot order.
    ///
    /// The order is unspecified and changes across rehashes. Mutating the set
    /// while holding the iterator is prevented by borrowing.
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { slots: self.slots.as_slice(), tomb: self.tomb.tombstone(), index: 0 }
    }

    /// Maps a value to its probe start slot; requires a non-empty allocation.
    fn start_slot(&self, value: &T) -> usize {
        self.load.select(self.slots.len(), self.hasher.hash_one(value))
    }

    /// Tombstones slot `index`, decrements the count and repairs the probe
    /// cluster behind the slot.
    fn remove_at(&mut self, index: usize) {
        self.occupied = self.occupied.saturating_sub(1);
        let tomb = self.tomb.tombstone();
        let hasher = &self.hasher;
        let load = &self.load;
        let slots = self.slots.as_mut_slice();
        if let Some(slot) = slots.get_mut(index) {
            *slot = tomb.clone();
        }
        let len = slots.len();
        probe::repair_cluster(slots, index, &tomb, |value| {
            load.select(len, hasher.hash_one(value))
        });
    }

    /// Reallocates to `new_size` slots and re-places every live element.
    ///
    /// The fresh sentinel-filled array is fully built before the old one is
    /// displaced, so a panic while filling leaves the set as it was. Old
    /// tombstones are not carried over; rehashing is how they are reclaimed.
    fn rehash(&mut self, new_size: usize) {
        let tomb = self.tomb.tombstone();
        let fresh = if new_size == 0 {
            SlotBuffer::empty()
        } else {
            SlotBuffer::filled_with(new_size, &tomb)
        };
        let old = mem::replace(&mut self.slots, fresh);
        self.capacity = self.load.occupancy(new_size);
        let hasher = &self.hasher;
        let load = &self.load;
        let slots = self.slots.as_mut_slice();
        for value in old.into_values() {
            if value == tomb {
                continue;
            }
            let start = load.select(slots.len(), hasher.hash_one(&value));
            let (index, _) = probe::find_slot(slots, start, &tomb, &value);
            if let Some(slot) = slots.get_mut(index) {
                *slot = value;
            }
        }
    }
}

impl<T> Default for HotSet<T>
where
    T: Eq + Hash + Clone + Default,
{
    /// Creates an empty set using `T::default()` as the sentinel; the default
    /// value itself is then not insertable.
    fn default() -> Self {
        Self::with_tombstone(T::default())
    }
}

impl<T, Tomb, S, L> Extend<T> for HotSet<T, Tomb, S, L>
where
    T: Eq + Hash + Clone,
    Tomb: TombstoneSource<T>,
    S: BuildHasher,
    L: LoadPolicy,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

/// Forward iterator over the live elements of a [`HotSet`], skipping
/// sentinel slots.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    /// The backing slots being walked.
    slots: &'a [T],
    /// Sentinel to skip.
    tomb: T,
    /// Next slot to examine.
    index: usize,
}

impl<'a, T: Eq> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        while let Some(slot) = self.slots.get(self.index) {
            self.index = self.index.saturating_add(1);
            if *slot != self.tomb {
                return Some(slot);
            }
        }
        None
    }
}
