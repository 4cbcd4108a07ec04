//! Tombstone sentinel policies.
//!
//! A hot set has no occupancy bitmap: a slot is free exactly when it compares
//! equal to the tombstone sentinel. The sentinel comes from a policy object
//! that produces the value on demand, so it can be a stored value, a constant
//! of the element type, or anything a caller implements.

/// Produces the tombstone sentinel for a set of `T`.
///
/// The produced value must never compare equal to a value a caller inserts;
/// a colliding insert is a contract violation (see
/// [`HotSet::stable_insert`](crate::HotSet::stable_insert)).
/// Successive calls must produce values that compare equal to each other.
pub trait TombstoneSource<T> {
    /// Returns the sentinel value.
    fn tombstone(&self) -> T;
}

/// A tombstone policy holding the sentinel as a plain value and handing out
/// clones of it.
#[derive(Debug, Clone)]
pub struct ValueTombstone<T> {
    /// The stored sentinel.
    value: T,
}

impl<T> ValueTombstone<T> {
    /// Wraps `value` as the sentinel.
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone> TombstoneSource<T> for ValueTombstone<T> {
    fn tombstone(&self) -> T {
        self.value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_tombstone_hands_out_equal_clones() {
        let source = ValueTombstone::new("gone".to_string());
        assert_eq!(source.tombstone(), "gone");
        assert_eq!(source.tombstone(), source.tombstone());
    }

    #[test]
    fn custom_sources_are_pluggable() {
        /// A zero-sized policy producing `u64::MAX` as the sentinel.
        struct MaxSentinel;

        impl TombstoneSource<u64> for MaxSentinel {
            fn tombstone(&self) -> u64 {
                u64::MAX
            }
        }

        assert_eq!(MaxSentinel.tombstone(), u64::MAX);
    }
}
