//! Reward constants.

use classic_types::{Wei, U256};

/// Block reward from genesis (5 ETC).
pub const FRONTIER_BLOCK_REWARD: Wei = U256::from_limbs([5_000_000_000_000_000_000, 0, 0, 0]);

/// Block reward after EIP-649 (3 ETC).
pub const EIP649_BLOCK_REWARD: Wei = U256::from_limbs([3_000_000_000_000_000_000, 0, 0, 0]);

/// Block reward after EIP-1234 (2 ETC).
pub const EIP1234_BLOCK_REWARD: Wei = U256::from_limbs([2_000_000_000_000_000_000, 0, 0, 0]);

/// Blocks per ECIP-1017 era when the chain does not configure one.
pub const ERA_LENGTH_DEFAULT: u64 = 5_000_000;

/// Per-era disinflation is `QUOTIENT / DIVISOR`, i.e. a 20% cut.
pub const DISINFLATION_QUOTIENT: u64 = 4;
pub const DISINFLATION_DIVISOR: u64 = 5;

/// Uncles are rewarded in eighths of the block reward by distance.
pub(crate) const UNCLE_DEPTH: u64 = 8;

/// The winner earns this fraction of the block reward per included uncle.
pub(crate) const UNCLE_INCLUSION_DIVISOR: u64 = 32;
