//! Hashing primitives for ethash.
//!
//! - **Keccak-256** for the seed hash chain
//! - **Keccak-512** for cache rows and dataset items
//!
//! Both use the original Keccak padding, not the finalized SHA-3 standard.

pub mod hash;

pub use hash::{keccak256, keccak512};
