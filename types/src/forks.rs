//! Fork configuration oracle.
//!
//! The reward engine and the ethash artifact stores never own chain
//! configuration; they consult a [`ForkConfigurator`] for activation heights
//! and the block reward schedule. The oracle is read-only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::amount::Wei;
use crate::block::BlockNumber;

/// Read-only view of the fork transitions relevant to ethash.
///
/// Every transition getter returns `None` when the fork is not scheduled on
/// this chain.
pub trait ForkConfigurator {
    /// Whether a fork with the given activation height is active at `number`.
    ///
    /// An unscheduled fork is never enabled.
    fn is_enabled(&self, transition: Option<BlockNumber>, number: BlockNumber) -> bool {
        transition.is_some_and(|activation| number >= activation)
    }

    /// EIP-649 (Byzantium difficulty bomb delay, 3 ETH reward).
    fn ethash_eip649_transition(&self) -> Option<BlockNumber>;

    /// EIP-1234 (Constantinople difficulty bomb delay, 2 ETH reward).
    fn ethash_eip1234_transition(&self) -> Option<BlockNumber>;

    /// ECIP-1017 (monetary policy: era-based disinflation).
    fn ethash_ecip1017_transition(&self) -> Option<BlockNumber>;

    /// Number of blocks in one ECIP-1017 era.
    fn ethash_ecip1017_era_rounds(&self) -> Option<u64>;

    /// ECIP-1099 (doubled epoch length).
    fn ethash_ecip1099_transition(&self) -> Option<BlockNumber>;

    /// Block reward schedule keyed by activation height.
    fn ethash_block_reward_schedule(&self) -> &RewardSchedule;
}

/// Block rewards keyed by the block height at which they activate.
///
/// Entries may be supplied in any order; [`RewardSchedule::reward_at`]
/// always resolves to the greatest activation height not above the target.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewardSchedule(BTreeMap<BlockNumber, Wei>);

impl RewardSchedule {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Schedule (or replace) a reward from `activation` onwards.
    pub fn insert(&mut self, activation: BlockNumber, reward: Wei) {
        self.0.insert(activation, reward);
    }

    /// The reward in force at `number`, if any entry has activated.
    pub fn reward_at(&self, number: BlockNumber) -> Option<Wei> {
        self.0
            .range(..=number)
            .next_back()
            .map(|(_, reward)| *reward)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending activation order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockNumber, Wei)> + '_ {
        self.0.iter().map(|(activation, reward)| (*activation, *reward))
    }
}

impl FromIterator<(BlockNumber, Wei)> for RewardSchedule {
    fn from_iter<I: IntoIterator<Item = (BlockNumber, Wei)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
