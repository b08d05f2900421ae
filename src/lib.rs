//! SDK for the four.meme launchpad on BNB Smart Chain: decode bonding curve
//! and PancakeSwap events, scan history, stream live activity, quote and
//! execute trades.

pub use decoder::{decode, decode_log};
pub use discovery::{discover_pools, PairSource};
pub use errors::{DecodeError, FourError};
pub use events::EventKind;
pub use indexer::{CurveIndexer, LogSource};
pub use stream::{
    CurveStream, CurveStreamBuilder, DexStream, DexStreamBuilder, EventStream, StreamState,
};
pub use token::TokenClient;
pub use trade::Trade;
pub use types::{
    BlockRange, CreateEvent, CurveData, DecodedEvent, QuoteResult, SwapV2Event, SwapV3Event,
    TokenMetadata, TradeEvent, TradeParams, TradeSide,
};
pub use util::{calculate_slippage, parse_bnb};

pub mod constants;
mod decoder;
mod discovery;
mod errors;
mod events;
mod gen;
mod indexer;
mod stream;
mod token;
mod trade;
mod types;
mod util;
