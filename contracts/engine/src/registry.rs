//! Collateral Registry
//!
//! The fixed set of accepted collateral kinds with their price feeds and
//! asset ledgers. Built once at engine construction from parallel lists
//! and never mutated afterwards; iteration follows insertion order so that
//! valuation sums are deterministic.

use synthusd_common::{
    errors::{SusdError, SusdResult},
    traits::{CollateralAsset, PriceFeed},
    types::CollateralKind,
    BTreeMap, Box, Vec,
};

/// Immutable ordered map of collateral kind to its collaborators
pub struct CollateralRegistry {
    kinds: Vec<CollateralKind>,
    feeds: BTreeMap<CollateralKind, Box<dyn PriceFeed>>,
    assets: BTreeMap<CollateralKind, Box<dyn CollateralAsset>>,
}

impl CollateralRegistry {
    /// Build the registry from parallel lists.
    ///
    /// The lists must have equal length and carry no duplicate kinds;
    /// anything else is a construction-time configuration error.
    pub fn new(
        kinds: Vec<CollateralKind>,
        feeds: Vec<Box<dyn PriceFeed>>,
        assets: Vec<Box<dyn CollateralAsset>>,
    ) -> SusdResult<Self> {
        if kinds.len() != feeds.len() {
            return Err(SusdError::ConfigurationMismatch {
                kinds: kinds.len(),
                feeds: feeds.len(),
            });
        }
        if kinds.len() != assets.len() {
            return Err(SusdError::ConfigurationMismatch {
                kinds: kinds.len(),
                feeds: assets.len(),
            });
        }

        let mut feed_map = BTreeMap::new();
        let mut asset_map = BTreeMap::new();
        for ((kind, feed), asset) in kinds.iter().zip(feeds).zip(assets) {
            if feed_map.insert(*kind, feed).is_some() {
                // Duplicate kind: the parallel lists no longer line up
                return Err(SusdError::ConfigurationMismatch {
                    kinds: kinds.len(),
                    feeds: feed_map.len(),
                });
            }
            asset_map.insert(*kind, asset);
        }

        Ok(Self {
            kinds,
            feeds: feed_map,
            assets: asset_map,
        })
    }

    /// Registered kinds in insertion order
    pub fn kinds(&self) -> &[CollateralKind] {
        &self.kinds
    }

    /// True when the kind was registered at construction
    pub fn contains(&self, kind: &CollateralKind) -> bool {
        self.feeds.contains_key(kind)
    }

    /// Current price for a kind through its feed.
    ///
    /// Unregistered kinds fail with `UnsupportedCollateral`; a feed with no
    /// usable data (absent or zero price) fails with `OracleUnavailable`.
    pub fn price(&self, kind: &CollateralKind) -> SusdResult<u64> {
        let feed = self
            .feeds
            .get(kind)
            .ok_or(SusdError::UnsupportedCollateral { kind: kind.0 })?;

        match feed.latest_price() {
            Some(price) if price > 0 => Ok(price),
            _ => Err(SusdError::OracleUnavailable { kind: kind.0 }),
        }
    }

    /// Mutable handle on a kind's asset ledger
    pub fn asset_mut(&mut self, kind: &CollateralKind) -> Option<&mut (dyn CollateralAsset + '_)> {
        match self.assets.get_mut(kind) {
            Some(asset) => Some(asset.as_mut()),
            None => None,
        }
    }
}
