//! # Hot Set
//!
//! A Rust implementation of an open-addressing hash set with in-place
//! tombstone markers ("hot" = hash, open-addressing with tombstone).
//!
//! This crate provides one container and the policies that configure it:
//!
//! - `HotSet`: a single-threaded hash set storing elements in one contiguous
//!   slot array, where a free slot is marked by a caller-supplied tombstone
//!   sentinel value instead of an occupancy bitmap
//! - `LoadPolicy` / `DefaultLoadPolicy`: 75% occupancy, power-of-two
//!   allocations, doubling growth
//! - `TombstoneSource` / `ValueTombstone`: where the sentinel value comes from
//!
//! Deletion is eager: erasing an element immediately re-places every element
//! whose probe sequence ran through the erased slot, so probe sequences never
//! rot under stale tombstones the way they do with lazy deletion.
//!
//! ## Basic Usage
//!
//! ```rust
//! use hotset::HotSet;
//!
//! // The empty string is reserved as the tombstone sentinel and must never
//! // be inserted.
//! let mut words = HotSet::with_capacity(10, String::new());
//!
//! words.insert("tarn".to_string());
//! words.insert("cirque".to_string());
//! assert!(words.contains(&"tarn".to_string()));
//! assert_eq!(words.len(), 2);
//!
//! words.erase(&"tarn".to_string());
//! assert!(!words.contains(&"tarn".to_string()));
//! assert_eq!(words.len(), 1);
//! ```
//!
//! ## The tombstone contract
//!
//! The sentinel must never compare equal to a value the caller inserts;
//! debug builds assert this on every insert. `change_tombstone` swaps the
//! sentinel at runtime and logically deletes any live element equal to the
//! new sentinel; see its documentation before using it.
//!
//! ```rust
//! use hotset::{HotSet, ValueTombstone};
//!
//! let mut ids = HotSet::with_capacity(4, 0u64);
//! ids.insert(1);
//! ids.insert(2);
//!
//! // Retire sentinel 0 in favor of u64::MAX; 0 becomes insertable.
//! let lost = ids.change_tombstone(ValueTombstone::new(u64::MAX));
//! assert_eq!(lost, 0);
//! ids.insert(0);
//! assert!(ids.contains(&0));
//! ```

/// Module implementing the load-factor and slot-selection policy
mod load;
/// Module implementing the two-phase probe walk and the deletion-repair pass
mod probe;
/// Module implementing the hash set container and its iterator
mod set;
/// Module implementing owned slot storage over raw uninitialized memory
mod storage;
/// Module implementing tombstone sentinel policies
mod tombstone;

pub use load::{DefaultLoadPolicy, LoadPolicy};
pub use set::{HotSet, Iter};
pub use tombstone::{TombstoneSource, ValueTombstone};
