//! Event model for first-occurrence queries.
//!
//! An event is the pair of the contract address that triggered it and the
//! digest of its signature. Both fields are opaque to the filter layer, which
//! only ever inserts and tests byte strings; the pair shape matters to the
//! membership conventions in [`crate::query`] and to exact confirmation
//! against per-block event sets.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Size of a contract address (in bytes).
pub const ADDRESS_LENGTH: usize = 20;

/// Size of a log topic (in bytes).
///
/// A topic is either a signature digest or the value of an indexed parameter.
pub const TOPIC_LENGTH: usize = 32;

/// An event occurrence, identified by the triggering contract address and the
/// digest of the event signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Address of the contract triggering the event.
    pub address: Address,
    /// Cryptographic digest of the event signature.
    pub signature: B256,
}

impl Event {
    /// Creates a new event from its address and signature digest.
    pub const fn new(address: Address, signature: B256) -> Self {
        Self { address, signature }
    }

    /// Returns the concatenation of the address and signature bytes.
    ///
    /// This is the element inserted into extended filters and tested by
    /// [`crate::query::MembershipTest::Extended`].
    pub fn combined(&self) -> [u8; ADDRESS_LENGTH + TOPIC_LENGTH] {
        let mut out = [0u8; ADDRESS_LENGTH + TOPIC_LENGTH];
        out[..ADDRESS_LENGTH].copy_from_slice(self.address.as_slice());
        out[ADDRESS_LENGTH..].copy_from_slice(self.signature.as_slice());
        out
    }
}

/// The exact set of events included in a block.
///
/// Membership testing is the only operation queries need; no ordering is
/// maintained.
pub type EventSet = HashSet<Event>;
