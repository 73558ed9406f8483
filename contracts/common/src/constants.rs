//! Protocol Constants
//!
//! All fixed-point precisions and solvency parameters for the synthUSD
//! protocol. Every value is compile-time fixed; there is no governance
//! path that changes them after deployment.

/// Token Metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "synthUSD";
    /// Token symbol
    pub const SYMBOL: &str = "sUSD";
    /// Decimal places (18, matching collateral native units)
    pub const DECIMALS: u8 = 18;
    /// One unit with decimals (1 sUSD = 10^18 base units)
    pub const ONE: u128 = 1_000_000_000_000_000_000;
}

/// Fixed-point precision constants
pub mod precision {
    /// 18-decimal fixed-point scale shared by debt, collateral amounts,
    /// USD values, and health factors
    pub const PRECISION: u128 = 1_000_000_000_000_000_000;

    /// Oracle prices carry 8 fractional decimals
    pub const FEED_PRECISION: u128 = 100_000_000;

    /// Rescales an 8-decimal price to the 18-decimal scale
    pub const ADDITIONAL_FEED_PRECISION: u128 = 10_000_000_000;
}

/// Solvency and liquidation parameters
pub mod liquidation {
    use super::precision::PRECISION;

    /// Share of nominal collateral value that counts toward covering debt.
    /// 50 out of LIQUIDATION_PRECISION encodes a 200% over-collateralization
    /// requirement.
    pub const LIQUIDATION_THRESHOLD: u128 = 50;

    /// Denominator for LIQUIDATION_THRESHOLD and LIQUIDATION_BONUS
    pub const LIQUIDATION_PRECISION: u128 = 100;

    /// Percentage premium paid to a liquidator on top of the collateral
    /// value covering the repaid debt
    pub const LIQUIDATION_BONUS: u128 = 10;

    /// Minimum post-operation health factor (ratio of 1.0).
    /// Mutating operations leaving the acting account below this fail.
    pub const MIN_HEALTH_FACTOR: u128 = PRECISION;
}

/// Oracle configuration
pub mod oracle {
    /// Price precision (8 decimals)
    pub const PRICE_DECIMALS: u8 = 8;

    /// One dollar at feed precision
    pub const PRICE_ONE: u64 = 100_000_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_encodes_double_collateralization() {
        // Half of nominal value counts: 200% collateral backs 100% debt.
        assert_eq!(
            liquidation::LIQUIDATION_PRECISION / liquidation::LIQUIDATION_THRESHOLD,
            2
        );
    }

    #[test]
    fn test_feed_rescale_reaches_internal_precision() {
        assert_eq!(
            precision::FEED_PRECISION * precision::ADDITIONAL_FEED_PRECISION,
            precision::PRECISION
        );
    }

    #[test]
    fn test_min_health_factor_is_one() {
        assert_eq!(liquidation::MIN_HEALTH_FACTOR, precision::PRECISION);
        assert_eq!(token::ONE, precision::PRECISION);
    }
}
