use classic_nullables::{NullForks, NullState};
use classic_rewards::{accumulate_rewards, get_rewards, StateMutator};
use classic_types::amount::ether;
use classic_types::{address, Address, ChainConfig, Header, U256};

const MINER: Address = address!("1000000000000000000000000000000000000001");
const UNCLE: Address = address!("2000000000000000000000000000000000000002");

#[test]
fn mordor_era_two_block() {
    let config = ChainConfig::mordor();
    let header = Header::new(4_000_001, MINER);
    let uncles = [Header::new(4_000_000, UNCLE)];

    let mut state = NullState::new();
    accumulate_rewards(&config, &mut state, &header, &uncles);

    // Era 2: 5 * (4/5)^2 = 3.2 ETC.
    let winner = U256::from(3_200_000_000_000_000_000u64);
    let share = winner / U256::from(32u64);
    assert_eq!(state.balance(&UNCLE), share);
    assert_eq!(state.balance(&MINER), winner + share);
    assert_eq!(state.credits(), &[(UNCLE, share), (MINER, winner + share)]);
}

#[test]
fn uncle_and_miner_share_coinbase() {
    let forks = NullForks::new().with_reward(0, ether(5));
    let header = Header::new(100, MINER);
    let uncles = [Header::new(99, MINER)];

    let mut state = NullState::new();
    accumulate_rewards(&forks, &mut state, &header, &uncles);

    let rewards = get_rewards(&forks, &header, &uncles);
    assert_eq!(state.balance(&MINER), rewards.miner + rewards.uncles[0]);
    assert_eq!(state.credits().len(), 2);
}

#[test]
fn repeated_blocks_accumulate() {
    let forks = NullForks::new().with_eip649(0);
    let mut state = NullState::new();
    for number in 1..=3 {
        accumulate_rewards(&forks, &mut state, &Header::new(number, MINER), &[]);
    }
    assert_eq!(state.balance(&MINER), ether(9));
    assert_eq!(state.total_credited(), ether(9));
}

#[test]
fn works_through_trait_objects() {
    let forks = NullForks::new();
    let mut state = NullState::new();
    let dyn_state: &mut dyn StateMutator = &mut state;
    accumulate_rewards(&forks, dyn_state, &Header::new(1, MINER), &[]);
    assert_eq!(state.balance(&MINER), ether(5));
}
