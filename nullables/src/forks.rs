//! Nullable fork oracle: every fork unscheduled until told otherwise.

use classic_types::{BlockNumber, ForkConfigurator, RewardSchedule, Wei};

/// A fork configurator built up programmatically.
///
/// Starts with no fork scheduled and an empty reward schedule, so the
/// reward engine falls back to the Frontier reward.
#[derive(Clone, Debug, Default)]
pub struct NullForks {
    eip649: Option<BlockNumber>,
    eip1234: Option<BlockNumber>,
    ecip1017: Option<BlockNumber>,
    era_rounds: Option<u64>,
    ecip1099: Option<BlockNumber>,
    schedule: RewardSchedule,
}

impl NullForks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_eip649(mut self, block: BlockNumber) -> Self {
        self.eip649 = Some(block);
        self
    }

    pub fn with_eip1234(mut self, block: BlockNumber) -> Self {
        self.eip1234 = Some(block);
        self
    }

    /// Enable ECIP-1017 at `block` with eras of `era_rounds` blocks.
    pub fn with_ecip1017(mut self, block: BlockNumber, era_rounds: u64) -> Self {
        self.ecip1017 = Some(block);
        self.era_rounds = Some(era_rounds);
        self
    }

    pub fn with_ecip1099(mut self, block: BlockNumber) -> Self {
        self.ecip1099 = Some(block);
        self
    }

    /// Schedule `reward` from `activation` onwards.
    pub fn with_reward(mut self, activation: BlockNumber, reward: Wei) -> Self {
        self.schedule.insert(activation, reward);
        self
    }
}

impl ForkConfigurator for NullForks {
    fn ethash_eip649_transition(&self) -> Option<BlockNumber> {
        self.eip649
    }

    fn ethash_eip1234_transition(&self) -> Option<BlockNumber> {
        self.eip1234
    }

    fn ethash_ecip1017_transition(&self) -> Option<BlockNumber> {
        self.ecip1017
    }

    fn ethash_ecip1017_era_rounds(&self) -> Option<u64> {
        self.era_rounds
    }

    fn ethash_ecip1099_transition(&self) -> Option<BlockNumber> {
        self.ecip1099
    }

    fn ethash_block_reward_schedule(&self) -> &RewardSchedule {
        &self.schedule
    }
}
