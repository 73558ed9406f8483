//! Fixed-Point Math for the synthUSD Protocol
//!
//! Valuation and health-factor calculations over 18-decimal fixed-point
//! integers. Oracle prices carry 8 fractional decimals and are rescaled to
//! the internal 18-decimal scale before use.
//!
//! Every division truncates toward zero, and the operation order is part of
//! the contract: `health_factor` applies the liquidation threshold before
//! scaling by `PRECISION`, and reordering those steps changes the rounded
//! result at solvency boundaries. Intermediates run in `U256` because the
//! 18-decimal products overflow `u128` for realistic positions.

use crate::constants::liquidation::{
    LIQUIDATION_PRECISION, LIQUIDATION_THRESHOLD,
};
use crate::constants::precision::{ADDITIONAL_FEED_PRECISION, PRECISION};
use crate::errors::{SusdError, SusdResult};
use primitive_types::U256;

/// Narrow a U256 intermediate back to u128
fn to_u128(value: U256) -> SusdResult<u128> {
    if value > U256::from(u128::MAX) {
        return Err(SusdError::Overflow);
    }
    Ok(value.as_u128())
}

/// USD value of a collateral amount at the given 8-decimal price
///
/// `amount * (price * 10^10) / 10^18`: the price is rescaled to 18
/// decimals, then the amount's own 18-decimal fixed point is divided
/// back out.
pub fn usd_value(amount: u128, price: u64) -> SusdResult<u128> {
    let scaled_price = U256::from(price)
        .checked_mul(U256::from(ADDITIONAL_FEED_PRECISION))
        .ok_or(SusdError::Overflow)?;

    let value = U256::from(amount)
        .checked_mul(scaled_price)
        .ok_or(SusdError::Overflow)?
        .checked_div(U256::from(PRECISION))
        .ok_or(SusdError::DivisionByZero)?;

    to_u128(value)
}

/// Collateral amount worth the given USD value at the given price
///
/// `usd * 10^18 / (price * 10^10)`. Truncation biases against the party
/// receiving the converted amount, which is the direction liquidation
/// seizure must round.
pub fn amount_from_usd(usd: u128, price: u64) -> SusdResult<u128> {
    let scaled_price = U256::from(price)
        .checked_mul(U256::from(ADDITIONAL_FEED_PRECISION))
        .ok_or(SusdError::Overflow)?;
    if scaled_price.is_zero() {
        return Err(SusdError::DivisionByZero);
    }

    let amount = U256::from(usd)
        .checked_mul(U256::from(PRECISION))
        .ok_or(SusdError::Overflow)?
        / scaled_price;

    to_u128(amount)
}

/// Health factor for a (debt, collateral USD value) pair
///
/// Zero debt is maximally safe and reports `u128::MAX`. Otherwise
/// `(collateral_usd * LIQUIDATION_THRESHOLD / LIQUIDATION_PRECISION)
/// * PRECISION / debt`, truncating at each step in exactly that order.
/// Results beyond `u128::MAX` saturate.
pub fn health_factor(debt: u128, collateral_usd: u128) -> u128 {
    if debt == 0 {
        return u128::MAX;
    }

    let threshold_adjusted = U256::from(collateral_usd)
        * U256::from(LIQUIDATION_THRESHOLD)
        / U256::from(LIQUIDATION_PRECISION);

    let factor = threshold_adjusted * U256::from(PRECISION) / U256::from(debt);

    factor.min(U256::from(u128::MAX)).as_u128()
}

/// Largest debt repayment the given kind-specific collateral value can fund
/// once the liquidation bonus is added on top
///
/// `collateral_usd * LIQUIDATION_PRECISION /
/// (LIQUIDATION_PRECISION + LIQUIDATION_BONUS)`
pub fn max_debt_coverable(collateral_usd: u128) -> u128 {
    use crate::constants::liquidation::LIQUIDATION_BONUS;

    let capped = U256::from(collateral_usd) * U256::from(LIQUIDATION_PRECISION)
        / U256::from(LIQUIDATION_PRECISION + LIQUIDATION_BONUS);

    // Always <= collateral_usd, so the narrowing cannot fail
    capped.min(U256::from(u128::MAX)).as_u128()
}

/// Safe addition with overflow check
pub fn safe_add(a: u128, b: u128) -> SusdResult<u128> {
    a.checked_add(b).ok_or(SusdError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u128, b: u128) -> SusdResult<u128> {
    a.checked_sub(b).ok_or(SusdError::Underflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::liquidation::MIN_HEALTH_FACTOR;
    use crate::constants::token::ONE;

    const PRICE_2000: u64 = 2_000_00000000; // $2,000 with 8 decimals
    const PRICE_1000: u64 = 1_000_00000000;

    #[test]
    fn test_usd_value() {
        // 10 units at $2,000 = $20,000
        let value = usd_value(10 * ONE, PRICE_2000).unwrap();
        assert_eq!(value, 20_000 * ONE);

        // Fractional amount: 0.5 units at $2,000 = $1,000
        let value = usd_value(ONE / 2, PRICE_2000).unwrap();
        assert_eq!(value, 1_000 * ONE);
    }

    #[test]
    fn test_amount_from_usd() {
        // $9,000 at $1,000 per unit = 9 units
        let amount = amount_from_usd(9_000 * ONE, PRICE_1000).unwrap();
        assert_eq!(amount, 9 * ONE);
    }

    #[test]
    fn test_amount_from_usd_zero_price() {
        assert_eq!(
            amount_from_usd(ONE, 0),
            Err(SusdError::DivisionByZero)
        );
    }

    #[test]
    fn test_valuation_roundtrip_within_one_unit() {
        // Truncation error is bounded by one base unit
        let odd_price: u64 = 1_234_56789012;
        for amount in [1u128, 7, ONE - 1, ONE, 3 * ONE + 1, 1_000_000 * ONE] {
            let usd = usd_value(amount, odd_price).unwrap();
            let recovered = amount_from_usd(usd, odd_price).unwrap();
            assert!(recovered <= amount, "recovery must not overshoot");
            assert!(amount - recovered <= 1, "off by more than one unit");
        }
    }

    #[test]
    fn test_health_factor_zero_debt_is_max() {
        assert_eq!(health_factor(0, 0), u128::MAX);
        assert_eq!(health_factor(0, 20_000 * ONE), u128::MAX);
    }

    #[test]
    fn test_health_factor_boundary_values() {
        // $20,000 collateral, 9,000 debt: (20000 * 50/100) * 1e18 / 9000
        let factor = health_factor(9_000 * ONE, 20_000 * ONE);
        assert_eq!(factor, 10_000 * ONE / 9_000);
        assert!(factor >= MIN_HEALTH_FACTOR);

        // 10,001 debt drops below 1.0
        let factor = health_factor(10_001 * ONE, 20_000 * ONE);
        assert!(factor < MIN_HEALTH_FACTOR);

        // Exactly 10,000 debt sits exactly at 1.0
        let factor = health_factor(10_000 * ONE, 20_000 * ONE);
        assert_eq!(factor, MIN_HEALTH_FACTOR);
    }

    #[test]
    fn test_health_factor_division_order() {
        // The threshold division truncates before scaling by PRECISION:
        // 1 * 50 / 100 = 0, so the factor is 0, not 5e17 as the
        // reordered computation would give.
        assert_eq!(health_factor(1, 1), 0);
    }

    #[test]
    fn test_health_factor_saturates() {
        // Tiny debt against huge collateral saturates instead of wrapping
        assert_eq!(health_factor(1, u128::MAX), u128::MAX);
    }

    #[test]
    fn test_max_debt_coverable() {
        // $10,000 of collateral funds 10000 * 100 / 110 of debt plus bonus
        let cap = max_debt_coverable(10_000 * ONE);
        assert_eq!(cap, 10_000 * ONE * 100 / 110);
        assert!(cap < 10_000 * ONE);
    }

    #[test]
    fn test_safe_math() {
        assert_eq!(safe_add(1, 2), Ok(3));
        assert_eq!(safe_add(u128::MAX, 1), Err(SusdError::Overflow));
        assert_eq!(safe_sub(2, 1), Ok(1));
        assert_eq!(safe_sub(1, 2), Err(SusdError::Underflow));
    }
}
