use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::TokenError;

/// Per-endpoint balance ledger with a total-supply aggregate.
///
/// Balances are non-negative by construction; every mutation either keeps
/// the supply fixed (transfer) or moves it in lockstep with a balance
/// (mint/burn).
#[derive(Debug, Default)]
pub struct Ledger {
    balances: HashMap<Address, U256>,
    total_supply: U256,
}

impl Ledger {
    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or(U256::ZERO)
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn mint(&mut self, to: Address, amount: U256) -> Result<(), TokenError> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self.balances.entry(to).or_insert(U256::ZERO);
        *balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        Ok(())
    }

    pub fn burn(&mut self, from: Address, amount: U256) -> Result<(), TokenError> {
        self.debit(from, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        self.debit(from, amount)?;
        let balance = self.balances.entry(to).or_insert(U256::ZERO);
        *balance = balance.checked_add(amount).ok_or(TokenError::Overflow)?;
        Ok(())
    }

    fn debit(&mut self, from: Address, amount: U256) -> Result<(), TokenError> {
        let balance = self.balance_of(&from);
        let remaining = balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                account: from,
                balance,
                needed: amount,
            })?;
        if remaining.is_zero() {
            self.balances.remove(&from);
        } else {
            self.balances.insert(from, remaining);
        }
        Ok(())
    }
}
