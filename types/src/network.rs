//! Network identifier.

use serde::{Deserialize, Serialize};

/// Identifies which Ethereum Classic network a configuration targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// Ethereum Classic mainnet.
    Classic,
    /// The Mordor proof-of-work testnet.
    Mordor,
}

impl NetworkId {
    /// EIP-155 chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Classic => 61,
            Self::Mordor => 63,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Mordor => "mordor",
        }
    }
}
