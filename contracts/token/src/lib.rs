//! sUSD Token
//!
//! Reference fungible-token ledger for the synthUSD currency. The solvency
//! engine is the sole authorized minter and burner; it is configured as the
//! token's owner and pulls repayments into its own custody before retiring
//! them.
//!
//! The engine talks to the token through the [`Currency`] trait; the
//! [`TokenHandle`] adapter binds a shared ledger to a fixed caller address
//! so the engine and tests can observe one set of balances.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use synthusd_common::{
    constants::token,
    errors::{SusdError, SusdResult},
    traits::Currency,
    types::Address,
};

// ============ Token State ============

/// sUSD token ledger.
///
/// `Default` is intentionally not implemented: construction must name the
/// owner explicitly so a zero address can never end up holding mint
/// authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct SynthUsdToken {
    /// Sole authorized minter/burner (the engine's custody address)
    owner: Address,
    /// Per-account balances, 18 fractional decimals
    balances: BTreeMap<Address, u128>,
    /// Total circulating supply
    total_supply: u128,
}

impl SynthUsdToken {
    /// Create a new empty ledger with the given owner
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            balances: BTreeMap::new(),
            total_supply: 0,
        }
    }

    /// Get token name
    pub fn name() -> &'static str {
        token::NAME
    }

    /// Get token symbol
    pub fn symbol() -> &'static str {
        token::SYMBOL
    }

    /// Get token decimals
    pub fn decimals() -> u8 {
        token::DECIMALS
    }

    /// Current balance of an account
    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Total circulating supply
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Credit freshly minted currency. Owner-gated.
    pub fn mint(&mut self, caller: Address, to: Address, amount: u128) -> SusdResult<()> {
        if caller != self.owner {
            return Err(SusdError::Unauthorized {
                expected: self.owner,
                actual: caller,
            });
        }
        if amount == 0 {
            return Err(SusdError::InvalidAmount);
        }

        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(SusdError::Overflow)?;
        let entry = self.balances.entry(to).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(SusdError::Overflow)?;
        self.total_supply = new_supply;
        Ok(())
    }

    /// Retire currency from the caller's own balance. Owner-gated.
    pub fn burn(&mut self, caller: Address, amount: u128) -> SusdResult<()> {
        if caller != self.owner {
            return Err(SusdError::Unauthorized {
                expected: self.owner,
                actual: caller,
            });
        }
        if amount == 0 {
            return Err(SusdError::InvalidAmount);
        }

        self.debit(caller, amount)?;
        self.total_supply -= amount;
        Ok(())
    }

    /// Move currency from the caller's balance to another account
    pub fn transfer(&mut self, caller: Address, to: Address, amount: u128) -> SusdResult<()> {
        if amount == 0 {
            return Err(SusdError::InvalidAmount);
        }
        self.debit(caller, amount)?;
        let entry = self.balances.entry(to).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(SusdError::Overflow)?;
        Ok(())
    }

    /// Move currency between accounts on the caller's authority.
    ///
    /// The owner may move funds from any account (engine custody pulls on
    /// burn and liquidation); anyone else may only move their own.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> SusdResult<()> {
        if caller != self.owner && caller != from {
            return Err(SusdError::Unauthorized {
                expected: from,
                actual: caller,
            });
        }
        if amount == 0 {
            return Err(SusdError::InvalidAmount);
        }
        self.debit(from, amount)?;
        let entry = self.balances.entry(to).or_insert(0);
        *entry = entry.checked_add(amount).ok_or(SusdError::Overflow)?;
        Ok(())
    }

    fn debit(&mut self, account: Address, amount: u128) -> SusdResult<()> {
        let balance = self.balance_of(account);
        if balance < amount {
            return Err(SusdError::InsufficientBalance {
                available: balance,
                requested: amount,
            });
        }
        self.balances.insert(account, balance - amount);
        Ok(())
    }
}

// ============ Currency Adapter ============

/// Shareable handle binding a token ledger to a fixed caller address.
///
/// The engine holds one handle with its custody address as the caller;
/// tests hold further handles onto the same ledger to seed balances and
/// inspect outcomes.
#[derive(Debug, Clone)]
pub struct TokenHandle {
    token: Rc<RefCell<SynthUsdToken>>,
    caller: Address,
}

impl TokenHandle {
    /// Wrap a shared ledger for the given caller
    pub fn new(token: Rc<RefCell<SynthUsdToken>>, caller: Address) -> Self {
        Self { token, caller }
    }
}

impl Currency for TokenHandle {
    fn mint(&mut self, to: Address, amount: u128) -> bool {
        self.token
            .borrow_mut()
            .mint(self.caller, to, amount)
            .is_ok()
    }

    fn burn(&mut self, amount: u128) -> bool {
        self.token.borrow_mut().burn(self.caller, amount).is_ok()
    }

    fn transfer_from(&mut self, from: Address, to: Address, amount: u128) -> bool {
        self.token
            .borrow_mut()
            .transfer_from(self.caller, from, to, amount)
            .is_ok()
    }

    fn balance_of(&self, account: Address) -> u128 {
        self.token.borrow().balance_of(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthusd_common::constants::token::ONE;

    const OWNER: Address = [9u8; 32];
    const ALICE: Address = [1u8; 32];
    const BOB: Address = [2u8; 32];

    #[test]
    fn test_mint_owner_gated() {
        let mut token = SynthUsdToken::new(OWNER);

        token.mint(OWNER, ALICE, 100 * ONE).unwrap();
        assert_eq!(token.balance_of(ALICE), 100 * ONE);
        assert_eq!(token.total_supply(), 100 * ONE);

        let result = token.mint(ALICE, ALICE, ONE);
        assert!(matches!(result, Err(SusdError::Unauthorized { .. })));
        assert_eq!(token.total_supply(), 100 * ONE);
    }

    #[test]
    fn test_mint_zero_rejected() {
        let mut token = SynthUsdToken::new(OWNER);
        assert_eq!(token.mint(OWNER, ALICE, 0), Err(SusdError::InvalidAmount));
    }

    #[test]
    fn test_burn_reduces_supply() {
        let mut token = SynthUsdToken::new(OWNER);
        token.mint(OWNER, OWNER, 50 * ONE).unwrap();

        token.burn(OWNER, 20 * ONE).unwrap();
        assert_eq!(token.balance_of(OWNER), 30 * ONE);
        assert_eq!(token.total_supply(), 30 * ONE);
    }

    #[test]
    fn test_burn_requires_custody_balance() {
        let mut token = SynthUsdToken::new(OWNER);
        token.mint(OWNER, ALICE, 50 * ONE).unwrap();

        // Owner custody is empty; funds sit with Alice
        let result = token.burn(OWNER, ONE);
        assert!(matches!(result, Err(SusdError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_transfer() {
        let mut token = SynthUsdToken::new(OWNER);
        token.mint(OWNER, ALICE, 10 * ONE).unwrap();

        token.transfer(ALICE, BOB, 4 * ONE).unwrap();
        assert_eq!(token.balance_of(ALICE), 6 * ONE);
        assert_eq!(token.balance_of(BOB), 4 * ONE);

        let result = token.transfer(ALICE, BOB, 100 * ONE);
        assert!(matches!(result, Err(SusdError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_transfer_from_authority() {
        let mut token = SynthUsdToken::new(OWNER);
        token.mint(OWNER, ALICE, 10 * ONE).unwrap();

        // Owner may pull from any account
        token.transfer_from(OWNER, ALICE, OWNER, 3 * ONE).unwrap();
        assert_eq!(token.balance_of(OWNER), 3 * ONE);

        // A third party may not
        let result = token.transfer_from(BOB, ALICE, BOB, ONE);
        assert!(matches!(result, Err(SusdError::Unauthorized { .. })));
    }

    #[test]
    fn test_handle_implements_currency() {
        let token = Rc::new(RefCell::new(SynthUsdToken::new(OWNER)));
        let mut handle = TokenHandle::new(Rc::clone(&token), OWNER);

        assert!(handle.mint(ALICE, 5 * ONE));
        assert_eq!(handle.balance_of(ALICE), 5 * ONE);

        assert!(handle.transfer_from(ALICE, OWNER, 5 * ONE));
        assert!(handle.burn(5 * ONE));
        assert_eq!(token.borrow().total_supply(), 0);

        // Failures surface as false, never panics
        assert!(!handle.burn(ONE));
    }

    #[test]
    fn test_metadata() {
        assert_eq!(SynthUsdToken::name(), "synthUSD");
        assert_eq!(SynthUsdToken::symbol(), "sUSD");
        assert_eq!(SynthUsdToken::decimals(), 18);
    }
}
