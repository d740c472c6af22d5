//! Block header view consumed by the reward engine.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Height of a block in the canonical chain.
pub type BlockNumber = u64;

/// The subset of a block header the reward engine reads.
///
/// Uncles are represented by the same type: only their number and coinbase
/// take part in reward computation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub number: BlockNumber,
    pub coinbase: Address,
}

impl Header {
    pub fn new(number: BlockNumber, coinbase: Address) -> Self {
        Self { number, coinbase }
    }
}
