//! Linear probe engine over a tombstone-marked slot array.
//!
//! A probe walks from its hash-selected start slot to the end of the array,
//! then wraps and continues from the front back to the start: one full pass,
//! split into two contiguous scans so no step pays for a modulo.

use std::mem;

/// Probes for `needle` starting at `start`.
///
/// Returns `(index, true)` when a slot equal to `needle` is found, and
/// `(index, false)` at the first tombstone, which is the correct insertion
/// point for `needle`. If the full pass finishes without either (the array
/// holds no tombstone on the route), returns `(slots.len(), false)`; callers
/// that maintain occupancy below the allocation never see this.
///
/// `start` must be below `slots.len()`.
pub(crate) fn find_slot<T: Eq>(slots: &[T], start: usize, tomb: &T, needle: &T) -> (usize, bool) {
    debug_assert!(start < slots.len());
    let (head, tail) = slots.split_at(start.min(slots.len()));
    for (offset, slot) in tail.iter().enumerate() {
        if slot == tomb {
            return (start.saturating_add(offset), false);
        }
        if slot == needle {
            return (start.saturating_add(offset), true);
        }
    }
    for (index, slot) in head.iter().enumerate() {
        if slot == tomb {
            return (index, false);
        }
        if slot == needle {
            return (index, true);
        }
    }
    (slots.len(), false)
}

/// Re-places every live element whose probe sequence ran through the slot
/// that was just tombstoned at `removed`.
///
/// Walks forward from the slot after `removed` until the next tombstone.
/// Each live element on the way is lifted out (its slot tombstoned) and
/// re-placed via [`find_slot`] from its own start slot, which `start_of`
/// supplies. Elements that did not depend on the removed slot land straight
/// back where they were; the rest slide toward their hash-selected slot, so
/// no surviving element is left stranded behind the new tombstone.
///
/// A bounded loop of at most one full pass; `slots.len()` must be zero or a
/// power of two.
pub(crate) fn repair_cluster<T, F>(slots: &mut [T], removed: usize, tomb: &T, start_of: F)
where
    T: Eq + Clone,
    F: Fn(&T) -> usize,
{
    let len = slots.len();
    if len == 0 {
        return;
    }
    let mask = len.wrapping_sub(1);
    let mut index = removed.saturating_add(1) & mask;
    for _ in 1..len {
        let Some(slot) = slots.get_mut(index) else {
            return;
        };
        if *slot == *tomb {
            return;
        }
        let value = mem::replace(slot, tomb.clone());
        let (dest, _) = find_slot(slots, start_of(&value), tomb, &value);
        if let Some(dest_slot) = slots.get_mut(dest) {
            *dest_slot = value;
        }
        index = index.saturating_add(1) & mask;
    }
}
