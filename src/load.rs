//! Load-factor policy: how many elements fit in an allocation, how
//! allocations grow, and how a hash picks a starting slot.

/// Smallest allocation handed out by [`DefaultLoadPolicy::grow`], to avoid a
/// run of tiny reallocations while a set warms up.
const GROWTH_FLOOR: usize = 32;

/// Maps allocation sizes to permitted occupancy and growth targets.
///
/// Implementations must keep `occupancy(n) < n` for every `n >= 1` (so a
/// probe always has a tombstone to stop at) and may assume every allocation
/// they are asked about is zero or a power of two.
pub trait LoadPolicy {
    /// Maximum number of live elements allowed in `allocated` slots.
    fn occupancy(&self, allocated: usize) -> usize;

    /// Smallest allocation whose occupancy covers `occupied` elements.
    fn allocated(&self, occupied: usize) -> usize;

    /// Next allocation size when a table of `allocated` slots is full.
    fn grow(&self, allocated: usize) -> usize;

    /// Maps a hash to a starting slot for a table of `len` slots.
    ///
    /// `len` must be a power of two of at least 1; the default masks the low
    /// bits instead of taking a modulo.
    #[allow(clippy::cast_possible_truncation)]
    fn select(&self, len: usize, hash: u64) -> usize {
        (hash as usize) & len.wrapping_sub(1)
    }
}

/// The stock policy: 75% occupancy, power-of-two allocations, doubling growth
/// with a floor of 32 slots.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLoadPolicy;

impl LoadPolicy for DefaultLoadPolicy {
    // 75% of the allocation, computed as 1/2 + 1/4.
    fn occupancy(&self, allocated: usize) -> usize {
        let half = allocated >> 1;
        half.saturating_add(half >> 2)
    }

    fn allocated(&self, occupied: usize) -> usize {
        if occupied == 0 {
            return 0;
        }
        occupied.saturating_mul(2).next_power_of_two()
    }

    fn grow(&self, allocated: usize) -> usize {
        GROWTH_FLOOR.max(allocated.saturating_mul(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_is_three_quarters() {
        let policy = DefaultLoadPolicy;
        assert_eq!(policy.occupancy(0), 0);
        assert_eq!(policy.occupancy(4), 2);
        assert_eq!(policy.occupancy(32), 24);
        assert_eq!(policy.occupancy(64), 48);
        assert_eq!(policy.occupancy(1024), 768);
    }

    #[test]
    fn allocated_rounds_up_to_a_power_of_two() {
        let policy = DefaultLoadPolicy;
        assert_eq!(policy.allocated(0), 0);
        assert_eq!(policy.allocated(1), 2);
        assert_eq!(policy.allocated(10), 32);
        assert_eq!(policy.allocated(16), 32);
        assert_eq!(policy.allocated(17), 64);
    }

    #[test]
    fn allocated_always_covers_the_request() {
        let policy = DefaultLoadPolicy;
        for occupied in 1..2000 {
            let size = policy.allocated(occupied);
            assert!(size.is_power_of_two());
            assert!(
                policy.occupancy(size) >= occupied,
                "allocation {size} cannot hold {occupied} elements"
            );
        }
    }

    #[test]
    fn grow_doubles_with_a_floor() {
        let policy = DefaultLoadPolicy;
        assert_eq!(policy.grow(0), 32);
        assert_eq!(policy.grow(8), 32);
        assert_eq!(policy.grow(32), 64);
        assert_eq!(policy.grow(1024), 2048);
    }

    #[test]
    fn select_masks_the_hash() {
        let policy = DefaultLoadPolicy;
        assert_eq!(policy.select(16, 0), 0);
        assert_eq!(policy.select(16, 15), 15);
        assert_eq!(policy.select(16, 16), 0);
        assert_eq!(policy.select(16, 0xffff_fff3), 3);
        assert_eq!(policy.select(1, u64::MAX), 0);
    }
}
