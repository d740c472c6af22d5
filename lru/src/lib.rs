//! Least-recently-used containers.
//!
//! - [`BasicLru`]: single-threaded fixed-capacity map with O(1) recency
//!   updates, backed by an arena-allocated doubly-linked list whose node slots
//!   are recycled on eviction.
//! - [`LruCache`]: the same container behind a mutex, safe for concurrent use.
//!
//! A capacity of zero is normalised to one; it is never rejected.

pub mod basic;
mod list;
pub mod sync;

pub use basic::BasicLru;
pub use sync::LruCache;
