//! Protocol Events for synthUSD
//!
//! Events are recorded during engine execution and can be drained by the
//! caller for indexing, analytics, or notification delivery. The engine
//! finishes emitting before any external transfer runs, so a drained log
//! never reflects a rolled-back operation.

use crate::types::{Address, CollateralKind};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    CollateralDeposited = 0x01,
    CollateralRedeemed = 0x02,
    SusdMinted = 0x03,
    SusdBurned = 0x04,
    Liquidation = 0x05,
}

/// Main event enum containing all protocol events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum SusdEvent {
    /// Collateral pulled into engine custody
    CollateralDeposited {
        account: Address,
        kind: CollateralKind,
        amount: u128,
    },

    /// Collateral released from engine custody. `from` and `to` differ on
    /// liquidation seizure.
    CollateralRedeemed {
        from: Address,
        to: Address,
        kind: CollateralKind,
        amount: u128,
    },

    /// Debt minted and currency credited
    SusdMinted {
        account: Address,
        amount: u128,
        new_debt: u128,
    },

    /// Debt repaid and currency retired. `payer` differs from `account`
    /// when a liquidator pays down the target's debt.
    SusdBurned {
        account: Address,
        payer: Address,
        amount: u128,
        new_debt: u128,
    },

    /// Forced close-out of an insolvent position
    Liquidation {
        target: Address,
        liquidator: Address,
        kind: CollateralKind,
        debt_covered: u128,
        collateral_seized: u128,
    },
}

impl SusdEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::CollateralDeposited { .. } => EventType::CollateralDeposited,
            Self::CollateralRedeemed { .. } => EventType::CollateralRedeemed,
            Self::SusdMinted { .. } => EventType::SusdMinted,
            Self::SusdBurned { .. } => EventType::SusdBurned,
            Self::Liquidation { .. } => EventType::Liquidation,
        }
    }

    /// Serialize event to bytes for storage/transmission
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log for collecting events during execution
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SusdEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: SusdEvent) {
        self.events.push(event);
    }

    /// Discard the most recent event (operation rollback)
    pub fn pop(&mut self) -> Option<SusdEvent> {
        self.events.pop()
    }

    /// Get all events
    pub fn events(&self) -> &[SusdEvent] {
        &self.events
    }

    /// Take ownership of all events, leaving the log empty
    pub fn drain(&mut self) -> Vec<SusdEvent> {
        core::mem::take(&mut self.events)
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&SusdEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::token::ONE;

    #[test]
    fn test_event_type() {
        let event = SusdEvent::SusdMinted {
            account: [1u8; 32],
            amount: 100 * ONE,
            new_debt: 100 * ONE,
        };
        assert_eq!(event.event_type(), EventType::SusdMinted);
    }

    #[test]
    fn test_event_serialization() {
        let event = SusdEvent::Liquidation {
            target: [1u8; 32],
            liquidator: [2u8; 32],
            kind: CollateralKind::from_symbol("WETH"),
            debt_covered: 9_000 * ONE,
            collateral_seized: 99 * ONE / 10,
        };

        let bytes = event.to_bytes();
        let restored = SusdEvent::from_bytes(&bytes).unwrap();
        assert_eq!(event, restored);
    }

    #[test]
    fn test_event_log_emit_pop_drain() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.emit(SusdEvent::CollateralDeposited {
            account: [1u8; 32],
            kind: CollateralKind::from_symbol("WETH"),
            amount: ONE,
        });
        log.emit(SusdEvent::SusdMinted {
            account: [1u8; 32],
            amount: ONE,
            new_debt: ONE,
        });
        assert_eq!(log.len(), 2);

        let deposits = log.filter_by_type(EventType::CollateralDeposited);
        assert_eq!(deposits.len(), 1);

        log.pop();
        assert_eq!(log.len(), 1);

        let drained = log.drain();
        assert_eq!(drained.len(), 1);
        assert!(log.is_empty());
    }
}
