//! Flat (pre-ECIP-1017) reward path.

use classic_types::{Header, Wei, U256};

use crate::constants::{UNCLE_DEPTH, UNCLE_INCLUSION_DIVISOR};
use crate::engine::BlockRewards;

/// `reward * (uncle + 8 - number) / 8`, or zero for uncles older than the
/// inclusion window.
pub fn uncle_reward_by_distance(header: &Header, uncle: &Header, reward: Wei) -> Wei {
    let distance = uncle
        .number
        .saturating_add(UNCLE_DEPTH)
        .saturating_sub(header.number);
    reward.saturating_mul(U256::from(distance)) / U256::from(UNCLE_DEPTH)
}

/// Rewards for `header` and `uncles` at a flat block reward.
pub(crate) fn flat_rewards(header: &Header, uncles: &[Header], reward: Wei) -> BlockRewards {
    let bonus = reward / U256::from(UNCLE_INCLUSION_DIVISOR);
    let mut miner = reward;
    let uncles = uncles
        .iter()
        .map(|uncle| {
            miner = miner.saturating_add(bonus);
            uncle_reward_by_distance(header, uncle, reward)
        })
        .collect();
    BlockRewards { miner, uncles }
}
