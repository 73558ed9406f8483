//! Collaborator Traits
//!
//! The engine's external seams. The currency token, the collateral assets,
//! and the price feeds are collaborators the engine talks to through these
//! traits; it never reaches into their state directly. Mutating calls
//! report success as `bool`; a `false` return is surfaced by the engine as
//! `TransferFailed` or `MintingFailed` and rolls back the ledger mutation
//! of the operation in flight.

use crate::types::Address;

/// The synthetic currency component. The engine is the sole authorized
/// minter and burner.
pub trait Currency {
    /// Credit freshly minted currency to an account
    fn mint(&mut self, to: Address, amount: u128) -> bool;

    /// Retire currency held in the caller's own custody
    fn burn(&mut self, amount: u128) -> bool;

    /// Move currency between accounts on the caller's authority
    fn transfer_from(&mut self, from: Address, to: Address, amount: u128) -> bool;

    /// Current balance of an account
    fn balance_of(&self, account: Address) -> u128;
}

/// A collateral asset ledger, one per registered collateral kind
pub trait CollateralAsset {
    /// Move assets out of the caller's own custody
    fn transfer(&mut self, to: Address, amount: u128) -> bool;

    /// Move assets between accounts on the caller's authority
    fn transfer_from(&mut self, from: Address, to: Address, amount: u128) -> bool;

    /// Current balance of an account
    fn balance_of(&self, account: Address) -> u128;
}

/// A price source for one collateral kind.
///
/// Prices carry 8 fractional decimals. Freshness is the provider's
/// responsibility; a feed that cannot vouch for its data returns `None`,
/// which the engine surfaces as `OracleUnavailable`.
pub trait PriceFeed {
    /// Last known USD price, 8 fractional decimals
    fn latest_price(&self) -> Option<u64>;
}
