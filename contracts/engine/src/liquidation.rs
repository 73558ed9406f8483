//! Liquidation Planning
//!
//! Pure computation of what a liquidation may seize, separated from the
//! ledger effects so the arithmetic is testable on its own.
//!
//! ## Key Features
//! - Caps the covered debt at what the target's kind-specific collateral
//!   can fund once the bonus is added on top
//! - 10% liquidator bonus on the seized base amount
//! - All conversions truncate toward zero, shorting the liquidator rather
//!   than over-seizing the target

use synthusd_common::{
    constants::liquidation::{LIQUIDATION_BONUS, LIQUIDATION_PRECISION},
    errors::{SusdError, SusdResult},
    math,
};

/// Computed effects of one liquidation call, before any state is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidationPlan {
    /// Debt actually repaid, after capping at what the collateral funds
    pub debt_to_cover: u128,
    /// Collateral worth exactly the covered debt
    pub base_collateral: u128,
    /// Liquidator incentive on top of the base amount
    pub bonus_collateral: u128,
    /// Total collateral leaving the target's position
    pub total_seized: u128,
}

/// Plan a liquidation of `requested_debt` against a position holding
/// collateral of one kind worth `kind_collateral_usd`, priced at `price`
/// (8 fractional decimals).
pub fn plan_liquidation(
    requested_debt: u128,
    kind_collateral_usd: u128,
    price: u64,
) -> SusdResult<LiquidationPlan> {
    let cap = math::max_debt_coverable(kind_collateral_usd);
    let debt_to_cover = requested_debt.min(cap);

    let base_collateral = math::amount_from_usd(debt_to_cover, price)?;
    let bonus_collateral = base_collateral
        .checked_mul(LIQUIDATION_BONUS)
        .ok_or(SusdError::Overflow)?
        / LIQUIDATION_PRECISION;
    let total_seized = math::safe_add(base_collateral, bonus_collateral)?;

    Ok(LiquidationPlan {
        debt_to_cover,
        base_collateral,
        bonus_collateral,
        total_seized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthusd_common::constants::token::ONE;

    const PRICE_1000: u64 = 1_000_00000000;

    #[test]
    fn test_uncapped_plan() {
        // 10 units at $1,000: $10,000 of collateral, cover 9,000 debt.
        // Base 9 units, bonus 0.9, seize 9.9 total.
        let plan = plan_liquidation(9_000 * ONE, 10_000 * ONE, PRICE_1000).unwrap();

        assert_eq!(plan.debt_to_cover, 9_000 * ONE);
        assert_eq!(plan.base_collateral, 9 * ONE);
        assert_eq!(plan.bonus_collateral, 9 * ONE / 10);
        assert_eq!(plan.total_seized, 99 * ONE / 10);
    }

    #[test]
    fn test_cap_binds() {
        // $10,000 of collateral can fund at most 10000 * 100 / 110 of debt
        let cap = 10_000 * ONE * 100 / 110;
        let plan = plan_liquidation(9_500 * ONE, 10_000 * ONE, PRICE_1000).unwrap();

        assert_eq!(plan.debt_to_cover, cap);
        assert!(plan.debt_to_cover < 9_500 * ONE);
        // Base plus bonus never exceeds the collateral backing it
        assert!(plan.total_seized <= 10 * ONE);
    }

    #[test]
    fn test_seizure_never_exceeds_deposit() {
        // Sweep requested amounts around the cap; the plan must never
        // seize more than the 10 units backing the USD value.
        for requested in [ONE, 5_000 * ONE, 9_090 * ONE, 9_091 * ONE, u128::MAX / 2] {
            let plan = plan_liquidation(requested, 10_000 * ONE, PRICE_1000).unwrap();
            assert!(plan.total_seized <= 10 * ONE, "requested {requested}");
        }
    }

    #[test]
    fn test_zero_collateral_plans_nothing() {
        let plan = plan_liquidation(9_000 * ONE, 0, PRICE_1000).unwrap();
        assert_eq!(plan.debt_to_cover, 0);
        assert_eq!(plan.total_seized, 0);
    }
}
