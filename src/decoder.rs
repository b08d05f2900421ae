//! Raw Log Decoding
//!
//! Turns raw `eth_getLogs` / subscription logs into typed [`DecodedEvent`]s.
//! Decoding works directly on the 32-byte words of the log payload rather
//! than through generated ABI bindings: the launchpad emits every trade field
//! unindexed, so a simple word cursor covers all eight event kinds. Failures
//! are soft by design, a caller drops the log and keeps going.

use alloy::primitives::{Address, B256, I256, U256};
use alloy::rpc::types::Log;

use crate::errors::DecodeError;
use crate::events::EventKind;
use crate::types::{
    CreateEvent, DecodedEvent, SwapV2Event, SwapV3Event, TradeEvent, TradeSide,
};

/// Decodes a log by matching its topic0 against the event registry
pub fn decode_log(log: &Log) -> Result<DecodedEvent, DecodeError> {
    let topic0 = log.topic0().ok_or(DecodeError::NoTopics)?;
    let kind = EventKind::from_topic(topic0).ok_or(DecodeError::UnrecognizedTopic(*topic0))?;
    decode(log, kind)
}

/// Decodes a log under a known event kind
pub fn decode(log: &Log, kind: EventKind) -> Result<DecodedEvent, DecodeError> {
    match kind {
        EventKind::TokenCreateV1 | EventKind::TokenCreateV2 => {
            decode_create(log, kind).map(DecodedEvent::Create)
        }
        EventKind::TokenPurchaseV1
        | EventKind::TokenPurchaseV2
        | EventKind::TokenSaleV1
        | EventKind::TokenSaleV2 => decode_trade(log, kind).map(DecodedEvent::Trade),
        EventKind::PoolSwapV2 => decode_swap_v2(log).map(DecodedEvent::SwapV2),
        EventKind::PoolSwapV3 => decode_swap_v3(log).map(DecodedEvent::SwapV3),
    }
}

/// Cursor over the 32-byte words of a log payload
struct WordReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> WordReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Next raw word, advancing the cursor
    fn word(&mut self) -> Result<[u8; 32], DecodeError> {
        let end = self.offset + 32;
        if end > self.data.len() {
            return Err(DecodeError::ShortPayload {
                needed: end,
                have: self.data.len(),
            });
        }
        let mut word = [0u8; 32];
        word.copy_from_slice(&self.data[self.offset..end]);
        self.offset = end;
        Ok(word)
    }

    /// Address packed into the low 20 bytes of a word
    fn address(&mut self) -> Result<Address, DecodeError> {
        let word = self.word()?;
        Ok(Address::from_slice(&word[12..]))
    }

    fn uint(&mut self) -> Result<U256, DecodeError> {
        Ok(U256::from_be_bytes(self.word()?))
    }

    fn int(&mut self) -> Result<I256, DecodeError> {
        Ok(I256::from_raw(U256::from_be_bytes(self.word()?)))
    }

    fn uint64(&mut self, field: &'static str) -> Result<u64, DecodeError> {
        u64::try_from(self.uint()?).map_err(|_| DecodeError::ValueOverflow(field))
    }

    fn uint128(&mut self, field: &'static str) -> Result<u128, DecodeError> {
        u128::try_from(self.uint()?).map_err(|_| DecodeError::ValueOverflow(field))
    }

    /// Sign-extended small int, rejected unless it fits in an i32
    fn int24(&mut self, field: &'static str) -> Result<i32, DecodeError> {
        let word = self.word()?;
        let value = i32::from_be_bytes([word[28], word[29], word[30], word[31]]);
        let fill = if value < 0 { 0xff } else { 0x00 };
        if word[..28].iter().any(|b| *b != fill) {
            return Err(DecodeError::ValueOverflow(field));
        }
        Ok(value)
    }

    /// UTF-8 string field. The standard dynamic layout (offset, length,
    /// bytes) is resolved first; a word whose value cannot be an in-bounds
    /// offset is read as inline character data with the zero padding
    /// stripped, which is how the token managers pack short names.
    fn string(&mut self, field: &'static str) -> Result<String, DecodeError> {
        let head = self.word()?;
        let bytes = match self.dynamic_bytes(&head) {
            Some(slice) => slice.to_vec(),
            None => {
                let end = head.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
                head[..end].to_vec()
            }
        };
        String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8(field))
    }

    /// Resolves a dynamic head word to its tail bytes, `None` when the word
    /// is not a plausible offset into the payload
    fn dynamic_bytes(&self, head: &[u8; 32]) -> Option<&'a [u8]> {
        // Inline character data is left aligned, so any set high byte rules
        // the word out as an offset
        if head[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let offset = u64::from_be_bytes([
            head[24], head[25], head[26], head[27], head[28], head[29], head[30], head[31],
        ]) as usize;
        let length_end = offset.checked_add(32)?;
        if length_end > self.data.len() {
            return None;
        }
        let length = usize::try_from(U256::from_be_slice(&self.data[offset..length_end])).ok()?;
        let data_end = length_end.checked_add(length)?;
        if data_end > self.data.len() {
            return None;
        }
        Some(&self.data[length_end..data_end])
    }
}

/// Block number and transaction hash, required on every decoded event.
/// Pending logs carry neither and are rejected.
fn metadata(log: &Log) -> Result<(u64, B256), DecodeError> {
    match (log.block_number, log.transaction_hash) {
        (Some(block), Some(tx)) => Ok((block, tx)),
        _ => Err(DecodeError::MissingMetadata),
    }
}

/// Address stored in an indexed topic slot
fn indexed_address(log: &Log, position: usize) -> Result<Address, DecodeError> {
    let topic = log
        .inner
        .topics()
        .get(position)
        .ok_or(DecodeError::MissingTopic(position))?;
    Ok(Address::from_word(*topic))
}

fn decode_create(log: &Log, kind: EventKind) -> Result<CreateEvent, DecodeError> {
    let (block_number, transaction_hash) = metadata(log)?;
    let mut reader = WordReader::new(log.inner.data.data.as_ref());

    let creator = reader.address()?;
    let token = reader.address()?;
    let request_id = reader.uint()?;
    let name = reader.string("name")?;
    let symbol = reader.string("symbol")?;
    let total_supply = reader.uint()?;
    let launch_time = reader.uint64("launch_time")?;
    let launch_fee = if kind == EventKind::TokenCreateV2 {
        Some(reader.uint()?)
    } else {
        None
    };

    Ok(CreateEvent {
        kind,
        block_number,
        transaction_hash,
        creator,
        token,
        request_id,
        name,
        symbol,
        total_supply,
        launch_time,
        launch_fee,
    })
}

fn decode_trade(log: &Log, kind: EventKind) -> Result<TradeEvent, DecodeError> {
    let (block_number, transaction_hash) = metadata(log)?;
    let mut reader = WordReader::new(log.inner.data.data.as_ref());

    let token = reader.address()?;
    let trader = reader.address()?;

    // First generation trade events carry amount and cost only, the second
    // generation inserts the post trade price ahead of them and appends the
    // fee and curve reserves
    let (price, amount, cost, fee, offers, funds) = match kind {
        EventKind::TokenPurchaseV1 | EventKind::TokenSaleV1 => {
            let amount = reader.uint()?;
            let cost = reader.uint()?;
            (None, amount, cost, None, None, None)
        }
        _ => {
            let price = reader.uint()?;
            let amount = reader.uint()?;
            let cost = reader.uint()?;
            let fee = reader.uint()?;
            let offers = reader.uint()?;
            let funds = reader.uint()?;
            (Some(price), amount, cost, Some(fee), Some(offers), Some(funds))
        }
    };

    let side = if kind.is_purchase() {
        TradeSide::Buy
    } else {
        TradeSide::Sell
    };

    Ok(TradeEvent {
        kind,
        block_number,
        transaction_hash,
        side,
        token,
        trader,
        amount,
        cost,
        price,
        fee,
        offers,
        funds,
    })
}

fn decode_swap_v2(log: &Log) -> Result<SwapV2Event, DecodeError> {
    let (block_number, transaction_hash) = metadata(log)?;
    let sender = indexed_address(log, 1)?;
    let to = indexed_address(log, 2)?;

    let mut reader = WordReader::new(log.inner.data.data.as_ref());
    let amount0_in = reader.uint()?;
    let amount1_in = reader.uint()?;
    let amount0_out = reader.uint()?;
    let amount1_out = reader.uint()?;

    Ok(SwapV2Event {
        kind: EventKind::PoolSwapV2,
        block_number,
        transaction_hash,
        pool: log.address(),
        sender,
        to,
        amount0_in,
        amount1_in,
        amount0_out,
        amount1_out,
        price: v2_price(amount0_in, amount1_in, amount0_out, amount1_out),
    })
}

fn decode_swap_v3(log: &Log) -> Result<SwapV3Event, DecodeError> {
    let (block_number, transaction_hash) = metadata(log)?;
    let sender = indexed_address(log, 1)?;
    let recipient = indexed_address(log, 2)?;

    let mut reader = WordReader::new(log.inner.data.data.as_ref());
    let amount0 = reader.int()?;
    let amount1 = reader.int()?;
    let sqrt_price_x96 = reader.uint()?;
    let liquidity = reader.uint128("liquidity")?;
    let tick = reader.int24("tick")?;
    let protocol_fees_token0 = reader.uint128("protocol_fees_token0")?;
    let protocol_fees_token1 = reader.uint128("protocol_fees_token1")?;

    Ok(SwapV3Event {
        kind: EventKind::PoolSwapV3,
        block_number,
        transaction_hash,
        pool: log.address(),
        sender,
        recipient,
        amount0,
        amount1,
        sqrt_price_x96,
        liquidity,
        tick,
        protocol_fees_token0,
        protocol_fees_token1,
    })
}

/// Token1 per token0 implied by the filled legs of a V2 swap. `None` when
/// neither input leg is filled or the matching output leg is zero.
fn v2_price(
    amount0_in: U256,
    amount1_in: U256,
    amount0_out: U256,
    amount1_out: U256,
) -> Option<f64> {
    let (quote, base) = if !amount1_in.is_zero() {
        (amount1_in, amount0_out)
    } else if !amount0_in.is_zero() {
        (amount1_out, amount0_in)
    } else {
        return None;
    };
    if base.is_zero() {
        return None;
    }
    Some(to_f64(quote) / to_f64(base))
}

// Lossy by nature, only used for the derived display price
fn to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 2f64.powi(64) + *limb as f64)
}
