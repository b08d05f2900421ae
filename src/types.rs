//! Decoded Event Model and Shared SDK Types
//!
//! This module defines the typed views produced by the log decoder along with
//! the small value types shared across the scanner, stream and trade layers.
//! Decoded events are plain data: once constructed they are never mutated.

use alloy::primitives::{Address, B256, I256, U256};
use serde::{Deserialize, Serialize};

use crate::errors::FourError;
use crate::events::EventKind;

/// Direction of a bonding-curve trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A token launch on the bonding curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEvent {
    pub kind: EventKind,
    pub block_number: u64,
    pub transaction_hash: B256,
    pub creator: Address,
    pub token: Address,
    pub request_id: U256,
    pub name: String,
    pub symbol: String,
    pub total_supply: U256,
    pub launch_time: u64,
    /// Only present on second-generation create events
    pub launch_fee: Option<U256>,
}

/// A buy or sell executed against the bonding curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub kind: EventKind,
    pub block_number: u64,
    pub transaction_hash: B256,
    pub side: TradeSide,
    pub token: Address,
    pub trader: Address,
    /// Token amount bought or sold
    pub amount: U256,
    /// BNB paid (buys) or received (sells)
    pub cost: U256,
    /// Curve price after the trade, second-generation events only
    pub price: Option<U256>,
    /// Trading fee charged, second-generation events only
    pub fee: Option<U256>,
    /// Tokens remaining on the curve, second-generation events only
    pub offers: Option<U256>,
    /// BNB accumulated by the curve, second-generation events only
    pub funds: Option<U256>,
}

/// A swap in a graduated token's PancakeSwap V2 pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapV2Event {
    pub kind: EventKind,
    pub block_number: u64,
    pub transaction_hash: B256,
    /// The pair contract that emitted the swap
    pub pool: Address,
    pub sender: Address,
    pub to: Address,
    pub amount0_in: U256,
    pub amount1_in: U256,
    pub amount0_out: U256,
    pub amount1_out: U256,
    /// Execution price implied by the filled legs, `None` when the
    /// amounts do not determine one
    pub price: Option<f64>,
}

/// A swap in a PancakeSwap V3 pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapV3Event {
    pub kind: EventKind,
    pub block_number: u64,
    pub transaction_hash: B256,
    /// The pool contract that emitted the swap
    pub pool: Address,
    pub sender: Address,
    pub recipient: Address,
    /// Signed deltas from the pool's perspective
    pub amount0: I256,
    pub amount1: I256,
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    pub tick: i32,
    pub protocol_fees_token0: u128,
    pub protocol_fees_token1: u128,
}

/// A fully decoded launchpad or pool event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodedEvent {
    Create(CreateEvent),
    Trade(TradeEvent),
    SwapV2(SwapV2Event),
    SwapV3(SwapV3Event),
}

impl DecodedEvent {
    /// The registry kind this event decoded from
    pub fn kind(&self) -> EventKind {
        match self {
            DecodedEvent::Create(e) => e.kind,
            DecodedEvent::Trade(e) => e.kind,
            DecodedEvent::SwapV2(e) => e.kind,
            DecodedEvent::SwapV3(e) => e.kind,
        }
    }

    /// Block the event was emitted in
    pub fn block_number(&self) -> u64 {
        match self {
            DecodedEvent::Create(e) => e.block_number,
            DecodedEvent::Trade(e) => e.block_number,
            DecodedEvent::SwapV2(e) => e.block_number,
            DecodedEvent::SwapV3(e) => e.block_number,
        }
    }

    /// Transaction the event was emitted by
    pub fn transaction_hash(&self) -> B256 {
        match self {
            DecodedEvent::Create(e) => e.transaction_hash,
            DecodedEvent::Trade(e) => e.transaction_hash,
            DecodedEvent::SwapV2(e) => e.transaction_hash,
            DecodedEvent::SwapV3(e) => e.transaction_hash,
        }
    }

    /// The launchpad token an event concerns, where one is identified
    pub fn token(&self) -> Option<Address> {
        match self {
            DecodedEvent::Create(e) => Some(e.token),
            DecodedEvent::Trade(e) => Some(e.token),
            // Pool swaps identify the pair, not the token side of it
            DecodedEvent::SwapV2(_) | DecodedEvent::SwapV3(_) => None,
        }
    }
}

/// An inclusive block range to scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRange {
    pub from: u64,
    pub to: u64,
}

impl BlockRange {
    /// Constructs a range, rejecting one whose start exceeds its end
    pub fn new(from: u64, to: u64) -> Result<Self, FourError> {
        if from > to {
            return Err(FourError::InvalidRange { from, to });
        }
        Ok(Self { from, to })
    }

    /// Number of blocks covered, both ends inclusive
    pub fn len(&self) -> u64 {
        self.to - self.from + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Parameters for submitting a buy or sell
#[derive(Debug, Clone)]
pub struct TradeParams {
    pub token: Address,
    /// BNB in wei for buys, token amount for sells
    pub amount_in: U256,
    /// Minimum acceptable output after slippage
    pub amount_out_min: U256,
    /// Recipient for router swaps, the signer when unset
    pub to: Option<Address>,
    /// Router deadline as a unix timestamp, now plus the default when unset
    pub deadline: Option<u64>,
    /// Overrides for the provider's recommended fillers
    pub nonce: Option<u64>,
    pub gas_limit: Option<u64>,
    pub gas_price: Option<u128>,
}

impl TradeParams {
    pub fn new(token: Address, amount_in: U256, amount_out_min: U256) -> Self {
        Self {
            token,
            amount_in,
            amount_out_min,
            to: None,
            deadline: None,
            nonce: None,
            gas_limit: None,
            gas_price: None,
        }
    }
}

/// A trade estimate and the router that executes at that price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Token manager before migration, PancakeSwap router after
    pub router: Address,
    /// Estimated tokens out for buys, BNB out for sells
    pub amount: U256,
}

/// Bonding curve state reported by the token manager helper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveData {
    pub version: U256,
    /// The manager contract holding this token's curve
    pub token_manager: Address,
    /// Quote asset, WBNB for every current launch
    pub quote: Address,
    pub last_price: U256,
    pub trading_fee_rate: U256,
    pub min_trading_fee: U256,
    pub launch_time: U256,
    /// Tokens still offered by the curve
    pub offers: U256,
    pub max_offers: U256,
    /// BNB collected by the curve so far
    pub funds: U256,
    /// BNB target at which liquidity migrates to PancakeSwap
    pub max_funds: U256,
    pub liquidity_added: bool,
}

impl CurveData {
    /// Whether the token has graduated to its PancakeSwap pool
    pub fn migrated(&self) -> bool {
        self.liquidity_added
    }
}

/// ERC-20 metadata for a launchpad token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}
