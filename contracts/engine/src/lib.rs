//! synthUSD Engine
//!
//! Core engine of the synthUSD protocol: accounts deposit approved
//! collateral assets, mint the sUSD synthetic dollar against them, and are
//! liquidated when their position's health factor falls below 1.0.
//!
//! ## Key Features
//! - Multi-collateral position ledger with per-kind price feeds
//! - 18-decimal fixed-point valuation and health-factor math
//! - Incentivized liquidation with a 10% collateral bonus
//! - All-or-nothing operations: collaborator failures roll the ledger back

pub mod engine;
pub mod ledger;
pub mod liquidation;
pub mod oracle;
pub mod registry;

pub use engine::SusdEngine;
pub use ledger::PositionLedger;
pub use liquidation::{plan_liquidation, LiquidationPlan};
pub use oracle::{SharedPriceFeed, StaticPriceFeed};
pub use registry::CollateralRegistry;
