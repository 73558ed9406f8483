//! synthUSD Common Library
//!
//! Shared types, constants, and utilities for the synthUSD protocol crates.
//!
//! synthUSD is a collateral-backed synthetic currency: users lock accepted
//! collateral assets, mint sUSD debt against them up to a solvency limit,
//! and third parties may liquidate under-collateralized positions for a
//! bonus. This crate holds everything the engine and the token share:
//!
//! - **Constants**: fixed-point precisions and liquidation parameters
//! - **Errors**: the typed error taxonomy for all protocol operations
//! - **Types**: addresses, collateral kinds, position snapshots
//! - **Math**: truncating fixed-point valuation and health-factor math
//! - **Events**: protocol events and the in-memory event log
//! - **Traits**: collaborator seams (currency, collateral assets, price feeds)
//!
//! This crate is `no_std` compatible for embedded targets when built
//! without the default `std` feature.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Re-export alloc types for submodules based on feature
#[cfg(not(feature = "std"))]
pub use alloc::{boxed::Box, collections::BTreeMap, rc::Rc, vec::Vec};
#[cfg(feature = "std")]
pub use std::{boxed::Box, collections::BTreeMap, rc::Rc, vec::Vec};

pub mod constants;
pub mod errors;
pub mod events;
pub mod math;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use math::*;
pub use traits::*;
pub use types::*;
