//! ECIP-1017 era arithmetic.
//!
//! Every era the winner's reward shrinks to 4/5 of the previous era's. The
//! power terms are computed separately in 2048-bit arithmetic before the
//! division, so the result is exactly `reward * 4^era / 5^era` rounded down.

use alloy_primitives::ruint::Uint;

use classic_types::{Header, Wei, U256};

use crate::constants::{
    DISINFLATION_DIVISOR, DISINFLATION_QUOTIENT, ERA_LENGTH_DEFAULT, UNCLE_INCLUSION_DIVISOR,
};
use crate::flat::uncle_reward_by_distance;

/// Wide enough for `U256::MAX * 4^era` and `5^era` up to the first era at
/// which every 256-bit reward has decayed to zero.
type Wide = Uint<2048, 32>;

/// Zero-based era of block `number`.
///
/// Eras are `(1..=L)`, `(L+1..=2L)`, ...; the genesis block belongs to era 0.
/// An unset or zero era length uses [`ERA_LENGTH_DEFAULT`].
pub fn block_era(number: u64, era_length: Option<u64>) -> u64 {
    let era_length = match era_length {
        Some(length) if length > 0 => length,
        _ => ERA_LENGTH_DEFAULT,
    };
    if number == 0 {
        return 0;
    }
    (number - 1) / era_length
}

/// The winner's base reward in `era`.
///
/// Exact for every `era` and `reward`: `(5/4)^796` exceeds `2^256`, so any
/// era large enough to overflow the intermediate powers pays zero anyway.
pub fn block_winner_reward_by_era(era: u64, reward: Wei) -> Wei {
    if era == 0 {
        return reward;
    }
    disinflate(era, reward).unwrap_or(U256::ZERO)
}

fn disinflate(era: u64, reward: Wei) -> Option<Wei> {
    let era = Wide::from(era);
    let quotient = Wide::from(DISINFLATION_QUOTIENT).checked_pow(era)?;
    let divisor = Wide::from(DISINFLATION_DIVISOR).checked_pow(era)?;
    let scaled = Wide::from_limbs_slice(reward.as_limbs()).checked_mul(quotient)?;
    let result = scaled / divisor;
    // The result never exceeds `reward`, so the upper limbs are zero.
    Some(U256::from_limbs_slice(&result.as_limbs()[..4]))
}

/// The reward of one uncle included in `header`, in `era`.
///
/// Era 0 pays by distance like the flat path; later eras pay every uncle
/// 1/32 of the era's winner reward.
pub fn block_uncle_reward_by_era(era: u64, header: &Header, uncle: &Header, reward: Wei) -> Wei {
    if era == 0 {
        return uncle_reward_by_distance(header, uncle, reward);
    }
    block_winner_reward_for_uncles_by_era(era, std::slice::from_ref(uncle), reward)
}

/// The winner's bonus for including `uncles`, in `era`.
pub fn block_winner_reward_for_uncles_by_era(era: u64, uncles: &[Header], reward: Wei) -> Wei {
    let per_uncle = block_winner_reward_by_era(era, reward) / U256::from(UNCLE_INCLUSION_DIVISOR);
    per_uncle.saturating_mul(U256::from(uncles.len()))
}
