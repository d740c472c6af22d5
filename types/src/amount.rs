//! Wei amounts.
//!
//! Rewards are plain 256-bit unsigned integers denominated in wei, matching
//! the account balance representation of the execution layer.

use alloy_primitives::U256;

/// An amount of wei.
pub type Wei = U256;

/// One ether (10^18 wei).
pub const ETHER: Wei = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Convert a whole number of ether into wei.
pub fn ether(amount: u64) -> Wei {
    U256::from(amount) * ETHER
}
