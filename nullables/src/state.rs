//! Nullable state: in-memory balances for testing.

use std::collections::HashMap;

use classic_rewards::StateMutator;
use classic_types::{Address, Wei, U256};

/// An in-memory balance table that records every credit in order.
#[derive(Debug, Default)]
pub struct NullState {
    balances: HashMap<Address, Wei>,
    credits: Vec<(Address, Wei)>,
}

impl NullState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance of `address` (zero if never credited).
    pub fn balance(&self, address: &Address) -> Wei {
        self.balances.get(address).copied().unwrap_or(U256::ZERO)
    }

    /// Every `add_balance` call, in call order.
    pub fn credits(&self) -> &[(Address, Wei)] {
        &self.credits
    }

    /// Sum of all credits.
    pub fn total_credited(&self) -> Wei {
        self.credits
            .iter()
            .fold(U256::ZERO, |sum, (_, amount)| sum.saturating_add(*amount))
    }

    /// Forget all balances and recorded credits.
    pub fn reset(&mut self) {
        self.balances.clear();
        self.credits.clear();
    }
}

impl StateMutator for NullState {
    fn add_balance(&mut self, address: Address, amount: Wei) {
        let balance = self.balances.entry(address).or_insert(U256::ZERO);
        *balance = balance.saturating_add(amount);
        self.credits.push((address, amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classic_types::address;

    #[test]
    fn credits_accumulate_per_address() {
        let a = address!("0000000000000000000000000000000000000001");
        let b = address!("0000000000000000000000000000000000000002");
        let mut state = NullState::new();
        state.add_balance(a, U256::from(5u64));
        state.add_balance(b, U256::from(1u64));
        state.add_balance(a, U256::from(2u64));

        assert_eq!(state.balance(&a), U256::from(7u64));
        assert_eq!(state.balance(&b), U256::from(1u64));
        assert_eq!(state.credits().len(), 3);
        assert_eq!(state.credits()[1], (b, U256::from(1u64)));
        assert_eq!(state.total_credited(), U256::from(8u64));
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = NullState::new();
        state.add_balance(Address::ZERO, U256::from(1u64));
        state.reset();
        assert_eq!(state.balance(&Address::ZERO), U256::ZERO);
        assert!(state.credits().is_empty());
    }
}
