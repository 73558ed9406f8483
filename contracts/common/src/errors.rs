//! Error Types for the synthUSD Protocol
//!
//! Typed errors for every failure an operation can surface. Each check is
//! local and immediate: no operation partially commits, and any failure
//! unwinds the ledger mutations made earlier in the same operation before
//! it reaches the caller.

/// Result type alias for synthUSD operations
pub type SusdResult<T> = Result<T, SusdError>;

/// Main error enum for all synthUSD protocol errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SusdError {
    // ============ Input Errors ============
    /// Zero or otherwise invalid magnitude provided
    InvalidAmount,

    /// Collateral kind is not registered with the engine
    UnsupportedCollateral { kind: [u8; 32] },

    /// Construction-time parallel lists differ in length
    ConfigurationMismatch { kinds: usize, feeds: usize },

    // ============ Solvency Errors ============
    /// Operation would leave the acting account below the minimum
    /// health factor
    HealthFactorBroken { health_factor: u128 },

    /// Liquidation target is not insolvent
    NotLiquidatable { health_factor: u128 },

    /// Liquidation executed no net improvement of the target's position
    HealthFactorNotImproved { before: u128, after: u128 },

    /// Liquidator holds less currency than the debt they offered to cover
    InsufficientLiquidatorBalance { available: u128, required: u128 },

    /// Redeem request exceeds the source account's deposited amount
    InsufficientCollateral { available: u128, requested: u128 },

    // ============ Token Errors ============
    /// Balance too small for the requested move
    InsufficientBalance { available: u128, requested: u128 },

    /// Caller lacks the authority for this operation
    Unauthorized { expected: [u8; 32], actual: [u8; 32] },

    // ============ Collaborator Errors ============
    /// External asset or currency move was rejected
    TransferFailed,

    /// Currency component rejected the mint credit
    MintingFailed,

    /// A rollback compensation move was rejected; the engine ledger was
    /// restored but collaborator balances may not reflect it
    CompensationFailed,

    /// Price feed has no usable price for the kind
    OracleUnavailable { kind: [u8; 32] },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    Overflow,

    /// Arithmetic underflow occurred
    Underflow,

    /// Division by zero
    DivisionByZero,

    // ============ State Errors ============
    /// A mutating operation was entered while another still held the
    /// exclusive per-call lock
    ReentrantCall,
}

impl SusdError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "E001_INVALID_AMOUNT",
            Self::UnsupportedCollateral { .. } => "E002_UNSUPPORTED_COLLATERAL",
            Self::ConfigurationMismatch { .. } => "E003_CONFIG_MISMATCH",
            Self::HealthFactorBroken { .. } => "E010_HEALTH_FACTOR_BROKEN",
            Self::NotLiquidatable { .. } => "E011_NOT_LIQUIDATABLE",
            Self::HealthFactorNotImproved { .. } => "E012_NOT_IMPROVED",
            Self::InsufficientLiquidatorBalance { .. } => "E013_LIQUIDATOR_BALANCE",
            Self::InsufficientCollateral { .. } => "E014_INSUFFICIENT_COLLATERAL",
            Self::InsufficientBalance { .. } => "E015_INSUFFICIENT_BALANCE",
            Self::Unauthorized { .. } => "E016_UNAUTHORIZED",
            Self::TransferFailed => "E020_TRANSFER_FAILED",
            Self::MintingFailed => "E021_MINTING_FAILED",
            Self::CompensationFailed => "E023_COMPENSATION_FAILED",
            Self::OracleUnavailable { .. } => "E022_ORACLE_UNAVAILABLE",
            Self::Overflow => "E030_OVERFLOW",
            Self::Underflow => "E031_UNDERFLOW",
            Self::DivisionByZero => "E032_DIV_ZERO",
            Self::ReentrantCall => "E040_REENTRANT_CALL",
        }
    }

    /// Returns true if this error is recoverable (the caller can fix it
    /// and retry the same operation)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::HealthFactorBroken { .. } => true, // add collateral or mint less
            Self::InsufficientLiquidatorBalance { .. } => true, // acquire currency
            Self::InsufficientCollateral { .. } => true, // redeem less
            Self::InsufficientBalance { .. } => true,    // acquire funds
            Self::OracleUnavailable { .. } => true,  // wait for the feed
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_error_codes_unique() {
        let errors = [
            SusdError::InvalidAmount,
            SusdError::UnsupportedCollateral { kind: [0u8; 32] },
            SusdError::ConfigurationMismatch { kinds: 2, feeds: 1 },
            SusdError::HealthFactorBroken { health_factor: 0 },
            SusdError::NotLiquidatable { health_factor: 0 },
            SusdError::HealthFactorNotImproved { before: 0, after: 0 },
            SusdError::InsufficientLiquidatorBalance { available: 0, required: 1 },
            SusdError::InsufficientCollateral { available: 0, requested: 1 },
            SusdError::InsufficientBalance { available: 0, requested: 1 },
            SusdError::Unauthorized { expected: [0u8; 32], actual: [1u8; 32] },
            SusdError::TransferFailed,
            SusdError::MintingFailed,
            SusdError::CompensationFailed,
            SusdError::OracleUnavailable { kind: [0u8; 32] },
            SusdError::Overflow,
            SusdError::Underflow,
            SusdError::DivisionByZero,
            SusdError::ReentrantCall,
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn test_contract_violations_not_recoverable() {
        assert!(!SusdError::Underflow.is_recoverable());
        assert!(!SusdError::ReentrantCall.is_recoverable());
        assert!(!SusdError::TransferFailed.is_recoverable());
        assert!(!SusdError::CompensationFailed.is_recoverable());
    }
}
