//! Chain configuration with JSON support.

use serde::{Deserialize, Serialize};

use crate::amount::ether;
use crate::block::BlockNumber;
use crate::forks::{ForkConfigurator, RewardSchedule};
use crate::network::NetworkId;
use crate::ConfigError;

/// The ethash-related fork schedule of a chain.
///
/// Field names follow the genesis `config` object so a chain configuration
/// can be loaded from the same JSON blob the node is started with. Unknown
/// keys are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    /// EIP-155 chain id.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default, rename = "eip649FBlock", skip_serializing_if = "Option::is_none")]
    pub eip649_block: Option<BlockNumber>,

    #[serde(default, rename = "eip1234FBlock", skip_serializing_if = "Option::is_none")]
    pub eip1234_block: Option<BlockNumber>,

    #[serde(default, rename = "ecip1017FBlock", skip_serializing_if = "Option::is_none")]
    pub ecip1017_block: Option<BlockNumber>,

    #[serde(default, rename = "ecip1017EraRounds", skip_serializing_if = "Option::is_none")]
    pub ecip1017_era_rounds: Option<u64>,

    #[serde(default, rename = "ecip1099FBlock", skip_serializing_if = "Option::is_none")]
    pub ecip1099_block: Option<BlockNumber>,

    /// Flat block reward schedule used before ECIP-1017 activates.
    #[serde(default, rename = "blockReward")]
    pub block_reward_schedule: RewardSchedule,
}

fn default_chain_id() -> u64 {
    NetworkId::Classic.chain_id()
}

impl ChainConfig {
    /// Ethereum Classic mainnet.
    pub fn classic() -> Self {
        Self {
            chain_id: NetworkId::Classic.chain_id(),
            eip649_block: None,
            eip1234_block: None,
            ecip1017_block: Some(5_000_000),
            ecip1017_era_rounds: Some(5_000_000),
            ecip1099_block: Some(11_700_000),
            block_reward_schedule: [(0, ether(5))].into_iter().collect(),
        }
    }

    /// The Mordor testnet.
    pub fn mordor() -> Self {
        Self {
            chain_id: NetworkId::Mordor.chain_id(),
            eip649_block: None,
            eip1234_block: None,
            ecip1017_block: Some(0),
            ecip1017_era_rounds: Some(2_000_000),
            ecip1099_block: Some(2_520_000),
            block_reward_schedule: [(0, ether(5))].into_iter().collect(),
        }
    }

    /// Preset configuration for a known network.
    pub fn for_network(network: NetworkId) -> Self {
        match network {
            NetworkId::Classic => Self::classic(),
            NetworkId::Mordor => Self::mordor(),
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl ForkConfigurator for ChainConfig {
    fn ethash_eip649_transition(&self) -> Option<BlockNumber> {
        self.eip649_block
    }

    fn ethash_eip1234_transition(&self) -> Option<BlockNumber> {
        self.eip1234_block
    }

    fn ethash_ecip1017_transition(&self) -> Option<BlockNumber> {
        self.ecip1017_block
    }

    fn ethash_ecip1017_era_rounds(&self) -> Option<u64> {
        self.ecip1017_era_rounds
    }

    fn ethash_ecip1099_transition(&self) -> Option<BlockNumber> {
        self.ecip1099_block
    }

    fn ethash_block_reward_schedule(&self) -> &RewardSchedule {
        &self.block_reward_schedule
    }
}
