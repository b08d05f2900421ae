//! Launchpad Event Registry
//!
//! This module enumerates every event kind the SDK understands and maps each
//! one to the keccak-256 hash of its canonical signature, which is what nodes
//! index in `topic0`. The bonding-curve kinds come in two generations: the
//! first token manager emits four-field trade events, the second adds price,
//! fee and reserve fields. The two pool swap kinds cover the PancakeSwap
//! pools that graduated tokens trade in.

use alloy::primitives::{keccak256, B256};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Enumerates the event kinds emitted by the launchpad and its pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    TokenCreateV1,
    TokenCreateV2,

    TokenPurchaseV1,
    TokenPurchaseV2,

    TokenSaleV1,
    TokenSaleV2,

    PoolSwapV2,
    PoolSwapV3,
}

/// Topic hash for each kind, computed once on first use
static TOPIC_HASHES: Lazy<HashMap<EventKind, B256>> = Lazy::new(|| {
    EventKind::ALL
        .iter()
        .map(|kind| (*kind, keccak256(kind.signature().as_bytes())))
        .collect()
});

/// Reverse mapping from topic0 back to the event kind
static KIND_BY_TOPIC: Lazy<HashMap<B256, EventKind>> =
    Lazy::new(|| TOPIC_HASHES.iter().map(|(kind, hash)| (*hash, *kind)).collect());

impl EventKind {
    /// Every supported event kind
    pub const ALL: [EventKind; 8] = [
        EventKind::TokenCreateV1,
        EventKind::TokenCreateV2,
        EventKind::TokenPurchaseV1,
        EventKind::TokenPurchaseV2,
        EventKind::TokenSaleV1,
        EventKind::TokenSaleV2,
        EventKind::PoolSwapV2,
        EventKind::PoolSwapV3,
    ];

    /// The six bonding-curve kinds emitted by the token manager contracts
    pub const CURVE: [EventKind; 6] = [
        EventKind::TokenCreateV1,
        EventKind::TokenCreateV2,
        EventKind::TokenPurchaseV1,
        EventKind::TokenPurchaseV2,
        EventKind::TokenSaleV1,
        EventKind::TokenSaleV2,
    ];

    /// Canonical Solidity signature string for this event
    pub const fn signature(&self) -> &'static str {
        match self {
            EventKind::TokenCreateV1 => {
                "TokenCreate(address,address,uint256,string,string,uint256,uint256)"
            }
            EventKind::TokenCreateV2 => {
                "TokenCreate(address,address,uint256,string,string,uint256,uint256,uint256)"
            }
            EventKind::TokenPurchaseV1 => "TokenPurchase(address,address,uint256,uint256)",
            EventKind::TokenPurchaseV2 => {
                "TokenPurchase(address,address,uint256,uint256,uint256,uint256,uint256,uint256)"
            }
            EventKind::TokenSaleV1 => "TokenSale(address,address,uint256,uint256)",
            EventKind::TokenSaleV2 => {
                "TokenSale(address,address,uint256,uint256,uint256,uint256,uint256,uint256)"
            }
            EventKind::PoolSwapV2 => "Swap(address,uint256,uint256,uint256,uint256,address)",
            EventKind::PoolSwapV3 => {
                "Swap(address,address,int256,int256,uint160,uint128,int24,uint128,uint128)"
            }
        }
    }

    /// keccak-256 hash of the canonical signature, as indexed in topic0
    pub fn topic_hash(&self) -> B256 {
        TOPIC_HASHES[self]
    }

    /// Looks up the kind a log's topic0 belongs to, `None` for foreign events
    pub fn from_topic(topic: &B256) -> Option<EventKind> {
        KIND_BY_TOPIC.get(topic).copied()
    }

    pub fn is_create(&self) -> bool {
        self == &EventKind::TokenCreateV1 || self == &EventKind::TokenCreateV2
    }

    pub fn is_purchase(&self) -> bool {
        self == &EventKind::TokenPurchaseV1 || self == &EventKind::TokenPurchaseV2
    }

    pub fn is_sale(&self) -> bool {
        self == &EventKind::TokenSaleV1 || self == &EventKind::TokenSaleV2
    }

    /// Curve kinds are emitted by the token managers rather than a pool
    pub fn is_curve(&self) -> bool {
        !self.is_pool_swap()
    }

    pub fn is_pool_swap(&self) -> bool {
        self == &EventKind::PoolSwapV2 || self == &EventKind::PoolSwapV3
    }
}

// Display implementation for EventKind, used in logging and error messages
impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::b256;
    use std::collections::HashSet;

    #[test]
    fn topic_hashes_match_known_values() {
        // Spot check against hashes computed independently of this crate
        assert_eq!(
            EventKind::TokenCreateV1.topic_hash(),
            b256!("c60523754e4c8d044ae75f841c3a7f27fefeed24c086155510c2ae0edf538fa0")
        );
        assert_eq!(
            EventKind::TokenCreateV2.topic_hash(),
            b256!("396d5e902b675b032348d3d2e9517ee8f0c4a926603fbc075d3d282ff00cad20")
        );
        assert_eq!(
            EventKind::TokenPurchaseV1.topic_hash(),
            b256!("623b3804fa71d67900d064613da8f94b9617215ee90799290593e1745087ad18")
        );
        assert_eq!(
            EventKind::TokenPurchaseV2.topic_hash(),
            b256!("7db52723a3b2cdd6164364b3b766e65e540d7be48ffa89582956d8eaebe62942")
        );
        assert_eq!(
            EventKind::TokenSaleV1.topic_hash(),
            b256!("3aa3f154f6bf5e3490d1a7205aa8d1412e76d26f9d186830de86fb9309224040")
        );
        assert_eq!(
            EventKind::TokenSaleV2.topic_hash(),
            b256!("0a5575b3648bae2210cee56bf33254cc1ddfbc7bf637c0af2ac18b14fb1bae19")
        );
        // The pool swap topics are well known PancakeSwap values
        assert_eq!(
            EventKind::PoolSwapV2.topic_hash(),
            b256!("d78ad95fa46c994b6551d0da85fc275fe613ce37657fb8d5e3d130840159d822")
        );
        assert_eq!(
            EventKind::PoolSwapV3.topic_hash(),
            b256!("19b47279256b2a23a1665c810c8d55a1758940ee09377d4f8d26497a3577dc83")
        );
    }

    #[test]
    fn topic_hashes_are_distinct() {
        let hashes: HashSet<B256> = EventKind::ALL.iter().map(|k| k.topic_hash()).collect();
        assert_eq!(hashes.len(), EventKind::ALL.len());
    }

    #[test]
    fn from_topic_round_trips() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_topic(&kind.topic_hash()), Some(kind));
        }
    }

    #[test]
    fn from_topic_rejects_foreign_events() {
        // ERC-20 Transfer, the most common topic on any chain
        let transfer = b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");
        assert_eq!(EventKind::from_topic(&transfer), None);
        assert_eq!(EventKind::from_topic(&B256::ZERO), None);
    }

    #[test]
    fn kind_sets_are_consistent() {
        for kind in EventKind::CURVE {
            assert!(kind.is_curve());
            assert!(!kind.is_pool_swap());
        }
        assert!(EventKind::PoolSwapV2.is_pool_swap());
        assert!(EventKind::PoolSwapV3.is_pool_swap());
        assert!(EventKind::TokenPurchaseV1.is_purchase());
        assert!(EventKind::TokenSaleV2.is_sale());
        assert!(EventKind::TokenCreateV1.is_create());
    }
}
