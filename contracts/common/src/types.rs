//! Core Types for the synthUSD Protocol
//!
//! Fundamental data structures shared by the engine and the token crates.

use crate::BTreeMap;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Type alias for addresses (32-byte hash)
pub type Address = [u8; 32];

// ============ Collateral Types ============

/// Opaque identifier for an accepted collateral asset.
///
/// The set of kinds is fixed when the engine is constructed; operations
/// against unregistered kinds are rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct CollateralKind(pub [u8; 32]);

impl CollateralKind {
    /// Derive a deterministic kind id from a human-readable symbol
    pub fn from_symbol(symbol: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(symbol.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Raw 32-byte identifier
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

// ============ Position Types ============

/// An account's position: deposited collateral per kind plus total minted
/// debt. Created implicitly on first deposit or mint; a position with zero
/// collateral and zero debt is behaviorally absent.
#[derive(
    Debug, Clone, Default, PartialEq, Eq,
    Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct AccountPosition {
    /// Deposited amount per collateral kind, native 18-decimal units
    pub collateral: BTreeMap<CollateralKind, u128>,
    /// Total minted sUSD debt, 18 fractional decimals
    pub debt: u128,
}

impl AccountPosition {
    /// Deposited amount for one kind (zero when absent)
    pub fn deposited(&self, kind: &CollateralKind) -> u128 {
        self.collateral.get(kind).copied().unwrap_or(0)
    }

    /// True when the position holds nothing at all
    pub fn is_empty(&self) -> bool {
        self.debt == 0 && self.collateral.values().all(|amount| *amount == 0)
    }
}

/// Read-only snapshot of an account's solvency inputs
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct AccountInformation {
    /// Total minted debt, 18 fractional decimals
    pub total_debt: u128,
    /// USD value of all deposited collateral, 18 fractional decimals
    pub collateral_value_usd: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_symbol_is_deterministic() {
        let a = CollateralKind::from_symbol("WETH");
        let b = CollateralKind::from_symbol("WETH");
        let c = CollateralKind::from_symbol("WBTC");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_position() {
        let mut position = AccountPosition::default();
        assert!(position.is_empty());

        position.collateral.insert(CollateralKind::from_symbol("WETH"), 1);
        assert!(!position.is_empty());

        // Zeroed-out deposits count as absent
        position.collateral.insert(CollateralKind::from_symbol("WETH"), 0);
        assert!(position.is_empty());
    }

    #[test]
    fn test_deposited_defaults_to_zero() {
        let position = AccountPosition::default();
        assert_eq!(position.deposited(&CollateralKind::from_symbol("WETH")), 0);
    }
}
