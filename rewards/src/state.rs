//! State access consumed by reward accumulation.

use classic_types::{Address, Wei};

/// Write access to account balances.
///
/// Implemented by the execution layer's state database; rewards only ever
/// add to balances.
pub trait StateMutator {
    fn add_balance(&mut self, address: Address, amount: Wei);
}

impl<T: StateMutator + ?Sized> StateMutator for &mut T {
    fn add_balance(&mut self, address: Address, amount: Wei) {
        (**self).add_balance(address, amount);
    }
}
