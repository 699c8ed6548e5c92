// ============================================================================
// Ledger Gateway Interface
// Moves value between trading parties on reserve, fill and refund
// ============================================================================

use crate::domain::{AccountId, Amount};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors surfaced by a ledger implementation, propagated unmodified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient funds: {account} needs {required}{unit}, has {available}{unit}")]
    InsufficientFunds {
        account: String,
        unit: String,
        required: u64,
        available: u128,
    },
}

/// Account/balance ledger the engine settles against.
///
/// The engine debits once when an order is submitted (reserving its full
/// sell amount) and credits on every fill payout and every refund.
pub trait Ledger: Send {
    /// Remove `amount` from `account`.
    fn debit(&mut self, account: &AccountId, amount: &Amount) -> Result<(), LedgerError>;

    /// Add `amount` to `account`.
    fn credit(&mut self, account: &AccountId, amount: &Amount);
}

/// Deterministic in-memory ledger for tests, demos and simulations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InMemoryLedger {
    balances: BTreeMap<(AccountId, String), u128>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: seed a balance
    pub fn with_balance(mut self, account: impl Into<AccountId>, amount: Amount) -> Self {
        self.deposit(&account.into(), &amount);
        self
    }

    pub fn deposit(&mut self, account: &AccountId, amount: &Amount) {
        self.credit(account, amount);
    }

    pub fn balance(&self, account: &AccountId, unit: &str) -> u128 {
        self.balances
            .get(&(account.clone(), unit.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of every account's balance in `unit`.
    pub fn total(&self, unit: &str) -> u128 {
        self.balances
            .iter()
            .filter(|((_, u), _)| u == unit)
            .map(|(_, balance)| *balance)
            .sum()
    }
}

impl Ledger for InMemoryLedger {
    fn debit(&mut self, account: &AccountId, amount: &Amount) -> Result<(), LedgerError> {
        let key = (account.clone(), amount.unit.clone());
        let available = self.balances.get(&key).copied().unwrap_or(0);
        let required = amount.quantity as u128;

        if available < required {
            return Err(LedgerError::InsufficientFunds {
                account: account.to_string(),
                unit: amount.unit.clone(),
                required: amount.quantity,
                available,
            });
        }

        self.balances.insert(key, available - required);
        Ok(())
    }

    fn credit(&mut self, account: &AccountId, amount: &Amount) {
        if amount.is_zero() {
            return;
        }
        let balance = self
            .balances
            .entry((account.clone(), amount.unit.clone()))
            .or_insert(0);
        *balance = balance.saturating_add(amount.quantity as u128);
    }
}
