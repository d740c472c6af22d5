//! Ethash block rewards.
//!
//! Two regimes decide what a block pays:
//! - the **flat path**: a fixed block reward (schedule, EIP-1234, EIP-649 or
//!   Frontier), uncles paid in eighths by distance, 1/32 inclusion bonus
//! - the **era path** (ECIP-1017): the Frontier reward cut by 20% every era,
//!   uncles paid 1/32 of the era's winner reward from era 1 onwards
//!
//! The engine is a set of pure functions over a [`ForkConfigurator`]; only
//! [`accumulate_rewards`] writes, and only through a [`StateMutator`].
//!
//! [`ForkConfigurator`]: classic_types::ForkConfigurator

pub mod block_reward;
pub mod constants;
pub mod engine;
pub mod era;
pub mod flat;
pub mod state;

pub use block_reward::ethash_block_reward;
pub use constants::{EIP1234_BLOCK_REWARD, EIP649_BLOCK_REWARD, FRONTIER_BLOCK_REWARD};
pub use engine::{accumulate_rewards, get_rewards, BlockRewards};
pub use era::{
    block_era, block_uncle_reward_by_era, block_winner_reward_by_era,
    block_winner_reward_for_uncles_by_era,
};
pub use state::StateMutator;
