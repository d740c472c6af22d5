//! Block reward computation and accumulation.

use tracing::trace;

use classic_types::{ForkConfigurator, Header, Wei};

use crate::block_reward::ethash_block_reward;
use crate::constants::FRONTIER_BLOCK_REWARD;
use crate::era::{
    block_era, block_uncle_reward_by_era, block_winner_reward_by_era,
    block_winner_reward_for_uncles_by_era,
};
use crate::flat::flat_rewards;
use crate::state::StateMutator;

/// Payouts for one block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockRewards {
    /// Credited to the block's coinbase, inclusion bonuses included.
    pub miner: Wei,
    /// One entry per uncle, in the order the uncles were given.
    pub uncles: Vec<Wei>,
}

/// Compute the rewards for `header` and its `uncles`.
///
/// Once ECIP-1017 is active the era path applies, whatever the flat schedule
/// says; before that the flat block reward is paid.
pub fn get_rewards<C>(config: &C, header: &Header, uncles: &[Header]) -> BlockRewards
where
    C: ForkConfigurator + ?Sized,
{
    if config.is_enabled(config.ethash_ecip1017_transition(), header.number) {
        return era_rewards(config, header, uncles);
    }
    let reward = ethash_block_reward(Some(config), Some(header.number));
    flat_rewards(header, uncles, reward)
}

fn era_rewards<C>(config: &C, header: &Header, uncles: &[Header]) -> BlockRewards
where
    C: ForkConfigurator + ?Sized,
{
    let reward = FRONTIER_BLOCK_REWARD;
    let era = block_era(header.number, config.ethash_ecip1017_era_rounds());

    let miner = block_winner_reward_by_era(era, reward)
        .saturating_add(block_winner_reward_for_uncles_by_era(era, uncles, reward));
    let uncles = uncles
        .iter()
        .map(|uncle| block_uncle_reward_by_era(era, header, uncle, reward))
        .collect();
    BlockRewards { miner, uncles }
}

/// Credit the rewards of `header` to `state`: every uncle's coinbase first,
/// in order, then the block's coinbase.
pub fn accumulate_rewards<C, S>(config: &C, state: &mut S, header: &Header, uncles: &[Header])
where
    C: ForkConfigurator + ?Sized,
    S: StateMutator + ?Sized,
{
    let rewards = get_rewards(config, header, uncles);
    for (uncle, reward) in uncles.iter().zip(&rewards.uncles) {
        state.add_balance(uncle.coinbase, *reward);
    }
    state.add_balance(header.coinbase, rewards.miner);
    trace!(
        block = header.number,
        uncles = uncles.len(),
        miner = %rewards.miner,
        "accumulated block rewards"
    );
}
