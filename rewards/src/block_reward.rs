//! Flat block reward selection.

use classic_types::{BlockNumber, ForkConfigurator, Wei};

use crate::constants::{EIP1234_BLOCK_REWARD, EIP649_BLOCK_REWARD, FRONTIER_BLOCK_REWARD};

/// The flat block reward at `number`.
///
/// A configured reward schedule takes precedence; otherwise the reward steps
/// down through the EIP-1234 and EIP-649 constants to the Frontier reward.
/// Without a configurator or block number the Frontier reward applies.
pub fn ethash_block_reward<C>(config: Option<&C>, number: Option<BlockNumber>) -> Wei
where
    C: ForkConfigurator + ?Sized,
{
    let (Some(config), Some(number)) = (config, number) else {
        return FRONTIER_BLOCK_REWARD;
    };

    if let Some(reward) = config.ethash_block_reward_schedule().reward_at(number) {
        return reward;
    }
    if config.is_enabled(config.ethash_eip1234_transition(), number) {
        return EIP1234_BLOCK_REWARD;
    }
    if config.is_enabled(config.ethash_eip649_transition(), number) {
        return EIP649_BLOCK_REWARD;
    }
    FRONTIER_BLOCK_REWARD
}

#[cfg(test)]
mod tests {
    use super::*;
    use classic_types::amount::ether;
    use classic_types::{ChainConfig, RewardSchedule};

    fn config(eip649: Option<u64>, eip1234: Option<u64>, schedule: RewardSchedule) -> ChainConfig {
        ChainConfig {
            eip649_block: eip649,
            eip1234_block: eip1234,
            ecip1017_block: None,
            block_reward_schedule: schedule,
            ..ChainConfig::default()
        }
    }

    #[test]
    fn frontier_without_config_or_number() {
        assert_eq!(
            ethash_block_reward::<ChainConfig>(None, Some(10)),
            FRONTIER_BLOCK_REWARD
        );
        assert_eq!(
            ethash_block_reward(Some(&ChainConfig::classic()), None),
            FRONTIER_BLOCK_REWARD
        );
        assert_eq!(FRONTIER_BLOCK_REWARD, ether(5));
    }

    #[test]
    fn fork_constants_step_down() {
        let config = config(Some(100), Some(200), RewardSchedule::new());
        assert_eq!(ethash_block_reward(Some(&config), Some(99)), ether(5));
        assert_eq!(ethash_block_reward(Some(&config), Some(100)), ether(3));
        assert_eq!(ethash_block_reward(Some(&config), Some(200)), ether(2));
        assert_eq!(EIP649_BLOCK_REWARD, ether(3));
        assert_eq!(EIP1234_BLOCK_REWARD, ether(2));
    }

    #[test]
    fn schedule_takes_precedence() {
        let schedule = [(0, ether(4)), (150, ether(1))].into_iter().collect();
        let config = config(Some(100), Some(200), schedule);
        assert_eq!(ethash_block_reward(Some(&config), Some(120)), ether(4));
        assert_eq!(ethash_block_reward(Some(&config), Some(250)), ether(1));
    }

    #[test]
    fn schedule_not_yet_active_falls_back() {
        let schedule = [(1_000, ether(1))].into_iter().collect();
        let config = config(Some(100), None, schedule);
        assert_eq!(ethash_block_reward(Some(&config), Some(500)), ether(3));
        assert_eq!(ethash_block_reward(Some(&config), Some(1_000)), ether(1));
    }
}
