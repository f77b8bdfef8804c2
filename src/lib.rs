#![warn(missing_docs)]
#![cfg_attr(
    any(feature = "std", feature = "foldhash"),
    doc = include_str!("../README.md")
)]
#![cfg_attr(
    not(any(feature = "std", feature = "foldhash")),
    doc = "An open-addressing hash map using linear probing and Fibonacci hashing."
)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// Errors reported by the map.
pub mod error;

/// A HashMap implementation using linear probing and Fibonacci hashing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a key-value map interface with configurable hashers.
pub mod hash_map;

/// The raw open-addressing table backing `HashMap`.
///
/// Callers supply hashes and equality predicates directly, which makes the
/// table usable for values whose key is derived from the value itself.
pub mod hash_table;

pub use error::Error;
pub use hash_map::HashMap;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is specified.
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}
