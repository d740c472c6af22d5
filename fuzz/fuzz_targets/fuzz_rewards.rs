#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use classic_rewards::{block_era, block_winner_reward_by_era, get_rewards};
use classic_types::{Address, ChainConfig, Header, U256};

#[derive(Arbitrary, Debug)]
struct Input {
    number: u64,
    uncles: Vec<u64>,
    eip649: Option<u64>,
    eip1234: Option<u64>,
    ecip1017: Option<u64>,
    era_rounds: Option<u64>,
    schedule: Vec<(u64, u64)>,
}

// Reward computation is total: it must never panic, whatever the fork
// heights, era length or uncle numbers.
fuzz_target!(|input: Input| {
    let config = ChainConfig {
        eip649_block: input.eip649,
        eip1234_block: input.eip1234,
        ecip1017_block: input.ecip1017,
        ecip1017_era_rounds: input.era_rounds,
        block_reward_schedule: input
            .schedule
            .iter()
            .map(|(at, reward)| (*at, U256::from(*reward)))
            .collect(),
        ..ChainConfig::default()
    };
    let header = Header::new(input.number, Address::ZERO);
    let uncles: Vec<_> = input
        .uncles
        .iter()
        .take(4)
        .map(|n| Header::new(*n, Address::ZERO))
        .collect();

    let rewards = get_rewards(&config, &header, &uncles);
    assert_eq!(rewards.uncles.len(), uncles.len());

    let era = block_era(input.number, input.era_rounds);
    let _ = block_winner_reward_by_era(era, U256::MAX);
});
