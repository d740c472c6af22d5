//! Fundamental types for the Ethereum Classic ethash support layer.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! block headers, wei amounts, network identifiers, and the fork configuration
//! oracle consulted by the reward engine and the artifact stores.

pub mod amount;
pub mod block;
pub mod chain;
pub mod error;
pub mod forks;
pub mod network;

pub use alloy_primitives::{address, Address, U256};
pub use amount::{Wei, ETHER};
pub use block::{BlockNumber, Header};
pub use chain::ChainConfig;
pub use error::ConfigError;
pub use forks::{ForkConfigurator, RewardSchedule};
pub use network::NetworkId;
