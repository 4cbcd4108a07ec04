//! Owned, fixed-length slot storage built on raw uninitialized memory.
//!
//! `SlotBuffer` is the primitive the set uses instead of a managed container:
//! it owns a block of slots that are all constructed up front (with the
//! tombstone sentinel) and stay constructed until the buffer is dropped or
//! drained. The fill/clone paths are panic-safe: if a `clone` panics partway
//! through, the already-constructed prefix is destroyed before the panic
//! propagates.

use std::mem::{self, MaybeUninit};
use std::{fmt, ptr, slice};

/// A heap block of `T` slots that are all initialized between construction
/// and drop.
///
/// Invariant: every slot holds a constructed value from the moment a
/// constructor returns until the buffer is dropped or consumed by
/// [`SlotBuffer::into_values`]. The safe slice accessors rely on it.
pub(crate) struct SlotBuffer<T> {
    /// The owned slots; all initialized per the struct invariant.
    slots: Box<[MaybeUninit<T>]>,
}

impl<T> SlotBuffer<T> {
    /// Creates a zero-length buffer without allocating.
    pub(crate) fn empty() -> Self {
        Self { slots: Box::default() }
    }

    /// Allocates `len` slots and clone-constructs `value` into each of them.
    pub(crate) fn filled_with(len: usize, value: &T) -> Self
    where
        T: Clone,
    {
        let mut slots = Box::new_uninit_slice(len);
        fill_clone(&mut slots, value);
        Self { slots }
    }

    /// Returns the number of slots.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the buffer holds no slots.
    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Views every slot as an initialized value.
    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: all slots are initialized per the struct invariant.
        unsafe { slice::from_raw_parts(self.slots.as_ptr().cast::<T>(), self.slots.len()) }
    }

    /// Views every slot as an initialized value, mutably.
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: all slots are initialized per the struct invariant.
        unsafe { slice::from_raw_parts_mut(self.slots.as_mut_ptr().cast::<T>(), self.slots.len()) }
    }

    /// Consumes the buffer, yielding each slot's value by move.
    ///
    /// Values left unread when the iterator is dropped are destroyed in place.
    pub(crate) fn into_values(mut self) -> IntoValues<T> {
        let slots = mem::take(&mut self.slots);
        // The slots now belong to the iterator; skip the buffer's destructor.
        mem::forget(self);
        IntoValues { slots, next: 0 }
    }
}

impl<T: Clone> Clone for SlotBuffer<T> {
    fn clone(&self) -> Self {
        let mut slots = Box::new_uninit_slice(self.slots.len());
        clone_range(&mut slots, self.as_slice());
        Self { slots }
    }
}

impl<T> Drop for SlotBuffer<T> {
    fn drop(&mut self) {
        // SAFETY: all slots are initialized and dropped exactly once here.
        unsafe { ptr::drop_in_place(ptr::from_mut::<[T]>(self.as_mut_slice())) }
    }
}

impl<T> fmt::Debug for SlotBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotBuffer").field("len", &self.slots.len()).finish()
    }
}

/// Moving iterator over the values of a consumed [`SlotBuffer`].
pub(crate) struct IntoValues<T> {
    /// Slots taken over from the buffer.
    slots: Box<[MaybeUninit<T>]>,
    /// Index of the next unread slot; everything before it has been moved out.
    next: usize,
}

impl<T> Iterator for IntoValues<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let slot = self.slots.get(self.next)?;
        // SAFETY: slots at `next..` are still initialized and each is read
        // at most once before `next` advances past it.
        let value = unsafe { slot.assume_init_read() };
        self.next = self.next.saturating_add(1);
        Some(value)
    }
}

impl<T> Drop for IntoValues<T> {
    fn drop(&mut self) {
        for slot in self.slots.iter_mut().skip(self.next) {
            // SAFETY: unread slots still hold initialized values.
            unsafe { slot.assume_init_drop() };
        }
    }
}

impl<T> fmt::Debug for IntoValues<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoValues")
            .field("len", &self.slots.len())
            .field("next", &self.next)
            .finish()
    }
}

/// Destroys the constructed prefix of a slot range if construction panics
/// before completing.
struct InitGuard<'a, T> {
    /// The slot range under construction.
    slots: &'a mut [MaybeUninit<T>],
    /// Number of leading slots that hold constructed values.
    initialized: usize,
}

impl<T> Drop for InitGuard<'_, T> {
    fn drop(&mut self) {
        for slot in self.slots.iter_mut().take(self.initialized) {
            // SAFETY: the first `initialized` slots hold constructed values.
            unsafe { slot.assume_init_drop() };
        }
    }
}

/// Clone-constructs `value` into every slot of `dst`.
fn fill_clone<T: Clone>(dst: &mut [MaybeUninit<T>], value: &T) {
    let mut guard = InitGuard { slots: dst, initialized: 0 };
    for slot in guard.slots.iter_mut() {
        slot.write(value.clone());
        guard.initialized = guard.initialized.saturating_add(1);
    }
    mem::forget(guard);
}

/// Clone-constructs each value of `src` into the matching slot of `dst`.
///
/// `dst` must be at least as long as `src`; extra `dst` slots are left
/// untouched (callers allocate exact-length destinations).
fn clone_range<T: Clone>(dst: &mut [MaybeUninit<T>], src: &[T]) {
    debug_assert!(dst.len() >= src.len());
    let mut guard = InitGuard { slots: dst, initialized: 0 };
    for (slot, value) in guard.slots.iter_mut().zip(src) {
        slot.write(value.clone());
        guard.initialized = guard.initialized.saturating_add(1);
    }
    mem::forget(guard);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts drops so tests can verify every constructed value is destroyed.
    struct Counted<'a> {
        /// Shared drop counter.
        drops: &'a AtomicUsize,
    }

    impl Clone for Counted<'_> {
        fn clone(&self) -> Self {
            Self { drops: self.drops }
        }
    }

    impl Drop for Counted<'_> {
        fn drop(&mut self) {
            self.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn filled_buffer_drops_every_slot() {
        let drops = AtomicUsize::new(0);
        let template = Counted { drops: &drops };
        let buffer = SlotBuffer::filled_with(8, &template);
        assert_eq!(buffer.len(), 8);
        drop(buffer);
        assert_eq!(drops.load(Ordering::SeqCst), 8);
        drop(template);
    }

    #[test]
    fn into_values_moves_and_drops_the_remainder() {
        let drops = AtomicUsize::new(0);
        let template = Counted { drops: &drops };
        let buffer = SlotBuffer::filled_with(6, &template);

        let mut values = buffer.into_values();
        let first = values.next();
        assert!(first.is_some());
        drop(first);
        assert_eq!(drops.load(Ordering::SeqCst), 1);

        // Dropping the iterator destroys the five unread slots.
        drop(values);
        assert_eq!(drops.load(Ordering::SeqCst), 6);
        drop(template);
    }

    #[test]
    fn clone_is_independent_of_the_source() {
        let mut buffer = SlotBuffer::filled_with(4, &7u32);
        let copy = buffer.clone();
        for slot in buffer.as_mut_slice() {
            *slot = 9;
        }
        assert_eq!(copy.as_slice(), &[7, 7, 7, 7]);
        assert_eq!(buffer.as_slice(), &[9, 9, 9, 9]);
    }

    #[test]
    fn empty_buffer_has_no_slots() {
        let buffer = SlotBuffer::<String>::empty();
        assert!(buffer.is_empty());
        assert_eq!(buffer.as_slice().len(), 0);
        assert_eq!(buffer.into_values().count(), 0);
    }

    #[test]
    fn panicking_clone_destroys_the_constructed_prefix() {
        /// Panics on the fourth clone; counts drops of the survivors.
        struct Explosive<'a> {
            /// Shared drop counter.
            drops: &'a AtomicUsize,
            /// Shared clone counter; the fourth clone panics.
            clones: &'a AtomicUsize,
        }

        impl Clone for Explosive<'_> {
            fn clone(&self) -> Self {
                let seen = self.clones.fetch_add(1, Ordering::SeqCst);
                assert!(seen < 3, "clone budget exhausted");
                Self { drops: self.drops, clones: self.clones }
            }
        }

        impl Drop for Explosive<'_> {
            fn drop(&mut self) {
                self.drops.fetch_add(1, Ordering::SeqCst);
            }
        }

        let drops = AtomicUsize::new(0);
        let clones = AtomicUsize::new(0);
        let template = Explosive { drops: &drops, clones: &clones };
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            SlotBuffer::filled_with(8, &template)
        }));
        assert!(result.is_err());
        // The three clones that succeeded were destroyed during unwinding.
        assert_eq!(drops.load(Ordering::SeqCst), 3);
        drop(template);
    }
}
