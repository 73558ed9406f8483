//! Position Ledger
//!
//! Per-account record of deposited collateral and outstanding debt. Every
//! mutation is checked arithmetic; callers decide when a failed mutation
//! means rollback versus surfacing the error directly.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use synthusd_common::{
    errors::{SusdError, SusdResult},
    types::{AccountPosition, Address, CollateralKind},
    BTreeMap,
};

/// All account positions held by the engine
#[derive(Debug, Clone, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PositionLedger {
    positions: BTreeMap<Address, AccountPosition>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Position for an account, if it has ever been touched
    pub fn position(&self, account: &Address) -> Option<&AccountPosition> {
        self.positions.get(account)
    }

    /// Outstanding debt, zero for untouched accounts
    pub fn debt_of(&self, account: &Address) -> u128 {
        self.positions.get(account).map(|p| p.debt).unwrap_or(0)
    }

    /// Deposited amount of one kind, zero for untouched accounts
    pub fn collateral_of(&self, account: &Address, kind: &CollateralKind) -> u128 {
        self.positions
            .get(account)
            .map(|p| p.deposited(kind))
            .unwrap_or(0)
    }

    /// Credit deposited collateral, returning the new deposited amount
    pub fn add_collateral(
        &mut self,
        account: &Address,
        kind: &CollateralKind,
        amount: u128,
    ) -> SusdResult<u128> {
        let position = self.positions.entry(*account).or_default();
        let current = position.deposited(kind);
        let updated = current.checked_add(amount).ok_or(SusdError::Overflow)?;
        position.collateral.insert(*kind, updated);
        Ok(updated)
    }

    /// Debit deposited collateral, returning the new deposited amount.
    ///
    /// Fails with `InsufficientCollateral` when the account holds less of
    /// the kind than requested.
    pub fn remove_collateral(
        &mut self,
        account: &Address,
        kind: &CollateralKind,
        amount: u128,
    ) -> SusdResult<u128> {
        let available = self.collateral_of(account, kind);
        if available < amount {
            return Err(SusdError::InsufficientCollateral {
                available,
                requested: amount,
            });
        }
        let position = self.positions.entry(*account).or_default();
        let updated = available - amount;
        if updated == 0 {
            position.collateral.remove(kind);
        } else {
            position.collateral.insert(*kind, updated);
        }
        Ok(updated)
    }

    /// Increase outstanding debt, returning the new total
    pub fn add_debt(&mut self, account: &Address, amount: u128) -> SusdResult<u128> {
        let position = self.positions.entry(*account).or_default();
        position.debt = position.debt.checked_add(amount).ok_or(SusdError::Overflow)?;
        Ok(position.debt)
    }

    /// Decrease outstanding debt, returning the new total.
    ///
    /// Repaying more than is owed is a programming-contract violation and
    /// surfaces as `Underflow`.
    pub fn remove_debt(&mut self, account: &Address, amount: u128) -> SusdResult<u128> {
        let position = self.positions.entry(*account).or_default();
        position.debt = position.debt.checked_sub(amount).ok_or(SusdError::Underflow)?;
        Ok(position.debt)
    }
}
