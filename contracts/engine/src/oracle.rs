//! Price Feed Adapters
//!
//! Concrete `PriceFeed` implementations for wiring the engine to price
//! sources. `StaticPriceFeed` serves a fixed price; `SharedPriceFeed`
//! exposes a handle so the price can move while the engine holds the feed,
//! which is how tests model market moves and outages.

use synthusd_common::{traits::PriceFeed, Rc};

use core::cell::Cell;

/// Feed that always reports the same price
#[derive(Debug, Clone, Copy)]
pub struct StaticPriceFeed {
    price: u64,
}

impl StaticPriceFeed {
    /// Price is in 8-decimal USD units (1 USD = 100_000_000)
    pub fn new(price: u64) -> Self {
        Self { price }
    }
}

impl PriceFeed for StaticPriceFeed {
    fn latest_price(&self) -> Option<u64> {
        if self.price > 0 {
            Some(self.price)
        } else {
            None
        }
    }
}

/// Feed whose price can be updated through any clone of the handle.
///
/// `None` models a feed outage; the engine reports `OracleUnavailable` for
/// every operation that needs the price until it comes back.
#[derive(Debug, Clone)]
pub struct SharedPriceFeed {
    price: Rc<Cell<Option<u64>>>,
}

impl SharedPriceFeed {
    pub fn new(price: u64) -> Self {
        Self {
            price: Rc::new(Cell::new(Some(price))),
        }
    }

    pub fn set_price(&self, price: u64) {
        self.price.set(Some(price));
    }

    /// Simulate the feed going dark
    pub fn set_unavailable(&self) {
        self.price.set(None);
    }
}

impl PriceFeed for SharedPriceFeed {
    fn latest_price(&self) -> Option<u64> {
        self.price.get()
    }
}
