//! Nullable infrastructure for deterministic testing.
//!
//! The reward engine talks to the outside world through two traits: the
//! [`ForkConfigurator`](classic_types::ForkConfigurator) oracle and the
//! [`StateMutator`](classic_rewards::StateMutator) balance writer. This crate
//! provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record every write for later inspection
//!
//! Usage: swap real implementations for nullables in tests.

pub mod forks;
pub mod state;

pub use forks::NullForks;
pub use state::NullState;
