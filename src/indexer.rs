//! Historical Curve Event Indexing
//!
//! This module provides [`CurveIndexer`], which walks a block range in
//! chunks of `eth_getLogs` requests against the token manager contracts and
//! decodes everything it finds. Providers cap how many blocks one request
//! may span, and the caps differ per endpoint, so the chunk size adapts:
//! start at 1000 blocks, halve on failure and retry the same starting block,
//! give up once the size bottoms out. Results always come back ordered by
//! block, in node emission order within a block.

use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{Filter, Log};
use alloy::transports::TransportResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::constants::{TOKEN_MANAGER_V1, TOKEN_MANAGER_V2};
use crate::decoder;
use crate::errors::FourError;
use crate::events::EventKind;
use crate::types::{BlockRange, DecodedEvent};

/// Blocks per `get_logs` request at the start of a scan
const DEFAULT_CHUNK_SIZE: u64 = 1000;

/// Once the chunk size is at or below this, a failed request ends the scan
const MIN_CHUNK_SIZE: u64 = 100;

/// Source of raw logs for the chunk walker
#[async_trait]
pub trait LogSource: Send + Sync {
    async fn get_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>>;
}

#[async_trait]
impl LogSource for RootProvider {
    async fn get_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
        Provider::get_logs(self, filter).await
    }
}

/// Indexes historical bonding curve events over HTTP
pub struct CurveIndexer {
    provider: Arc<RootProvider>,
}

impl CurveIndexer {
    /// Constructs an indexer against an HTTP RPC endpoint
    pub fn new(rpc_url: &str) -> Result<Self, FourError> {
        let provider = Arc::new(
            ProviderBuilder::default()
                .connect_http(rpc_url.parse().map_err(|_e| FourError::ParseEndpoint)?),
        );
        Ok(Self { provider })
    }

    /// Fetches and decodes curve events in the given range.
    ///
    /// `kinds` defaults to every registered kind; `token_filter` narrows the
    /// scan to a single launchpad token. Logs that fail to decode are
    /// dropped, the scan continues.
    pub async fn fetch_events(
        &self,
        range: BlockRange,
        kinds: Option<&[EventKind]>,
        token_filter: Option<Address>,
    ) -> Result<Vec<DecodedEvent>, FourError> {
        let filter = curve_filter(kinds, token_filter);
        scan_range(self.provider.as_ref(), &filter, range).await
    }

    /// Current chain head
    pub async fn block_number(&self) -> Result<u64, FourError> {
        Ok(self.provider.get_block_number().await?)
    }
}

/// Builds the node-side filter for curve events: both token manager
/// addresses, the requested topic0 set, and optionally the token in topic2
/// (the second indexed parameter slot, trader in topic1 left open).
pub(crate) fn curve_filter(kinds: Option<&[EventKind]>, token_filter: Option<Address>) -> Filter {
    let kinds = match kinds {
        Some(kinds) if !kinds.is_empty() => kinds,
        _ => &EventKind::ALL,
    };
    let topics: Vec<B256> = kinds.iter().map(|kind| kind.topic_hash()).collect();

    let mut filter = Filter::new()
        .address(vec![TOKEN_MANAGER_V1, TOKEN_MANAGER_V2])
        .event_signature(topics);
    if let Some(token) = token_filter {
        filter = filter.topic2(token.into_word());
    }
    filter
}

/// Walks the range in adaptive chunks, decoding as it goes. The chunk size
/// only ever shrinks: a failure halves it and retries the same starting
/// block, a failure at the minimum size is fatal.
async fn scan_range<S: LogSource + ?Sized>(
    source: &S,
    filter: &Filter,
    range: BlockRange,
) -> Result<Vec<DecodedEvent>, FourError> {
    let mut chunk_size = DEFAULT_CHUNK_SIZE;
    let mut current = range.from;
    let mut events = Vec::new();

    while current <= range.to {
        let chunk_end = (current + chunk_size - 1).min(range.to);
        let chunk_filter = filter.clone().from_block(current).to_block(chunk_end);

        match source.get_logs(&chunk_filter).await {
            Ok(logs) => {
                debug!(
                    "Fetched {} logs from block {} to {}",
                    logs.len(),
                    current,
                    chunk_end
                );
                for log in logs {
                    match decoder::decode_log(&log) {
                        Ok(event) => events.push(event),
                        Err(e) => trace!("Dropping undecodable log: {}", e),
                    }
                }
                current = chunk_end + 1;
            }
            Err(e) => {
                if chunk_size > MIN_CHUNK_SIZE {
                    chunk_size /= 2;
                    debug!(
                        "get_logs failed at block {}, retrying with chunk size {}",
                        current, chunk_size
                    );
                } else {
                    return Err(FourError::ScanFailed {
                        block: current,
                        source: e,
                    });
                }
            }
        }
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Bytes, U256};
    use alloy::transports::TransportErrorKind;
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted log source: pops one canned response per request and
    /// records the block bounds each request asked for
    struct MockSource {
        responses: Mutex<VecDeque<TransportResult<Vec<Log>>>>,
        requests: Mutex<Vec<(u64, u64)>>,
    }

    impl MockSource {
        fn new(responses: Vec<TransportResult<Vec<Log>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<(u64, u64)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LogSource for MockSource {
        async fn get_logs(&self, filter: &Filter) -> TransportResult<Vec<Log>> {
            let encoded = serde_json::to_value(filter).unwrap();
            self.requests
                .lock()
                .unwrap()
                .push((block_field(&encoded, "fromBlock"), block_field(&encoded, "toBlock")));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("more requests than scripted responses")
        }
    }

    fn block_field(filter: &Value, field: &str) -> u64 {
        let hex = filter[field].as_str().expect("block bound must be set");
        u64::from_str_radix(hex.trim_start_matches("0x"), 16).unwrap()
    }

    fn rpc_err() -> alloy::transports::TransportError {
        TransportErrorKind::custom_str("block range too wide")
    }

    fn trade_log(block: u64, token: Address) -> Log {
        let mut data = Vec::new();
        data.extend_from_slice(&token.into_word().0);
        data.extend_from_slice(&Address::repeat_byte(0x42).into_word().0);
        data.extend_from_slice(&U256::from(1_000u64).to_be_bytes::<32>());
        data.extend_from_slice(&U256::from(25u64).to_be_bytes::<32>());
        Log {
            inner: alloy::primitives::Log::new_unchecked(
                TOKEN_MANAGER_V1,
                vec![EventKind::TokenPurchaseV1.topic_hash()],
                Bytes::from(data),
            ),
            block_number: Some(block),
            transaction_hash: Some(B256::repeat_byte(0x99)),
            ..Default::default()
        }
    }

    fn junk_log(block: u64) -> Log {
        Log {
            inner: alloy::primitives::Log::new_unchecked(
                TOKEN_MANAGER_V1,
                vec![B256::repeat_byte(0xee)],
                Bytes::new(),
            ),
            block_number: Some(block),
            transaction_hash: Some(B256::repeat_byte(0x99)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn walks_range_in_thousand_block_chunks() {
        let source = MockSource::new(vec![Ok(vec![]), Ok(vec![]), Ok(vec![])]);
        let range = BlockRange::new(1_000_000, 1_002_499).unwrap();

        let events = scan_range(&source, &curve_filter(None, None), range)
            .await
            .unwrap();

        assert!(events.is_empty());
        assert_eq!(
            source.requests(),
            vec![
                (1_000_000, 1_000_999),
                (1_001_000, 1_001_999),
                (1_002_000, 1_002_499),
            ]
        );
    }

    #[tokio::test]
    async fn halves_chunk_and_retries_same_start() {
        let source = MockSource::new(vec![
            Err(rpc_err()),
            Err(rpc_err()),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![]),
            Ok(vec![]),
        ]);
        let range = BlockRange::new(0, 1_249).unwrap();

        scan_range(&source, &curve_filter(None, None), range)
            .await
            .unwrap();

        // Two failures shrink 1000 to 250 without advancing, then the
        // reduced size carries through the rest of the range
        assert_eq!(
            source.requests(),
            vec![
                (0, 999),
                (0, 499),
                (0, 249),
                (250, 499),
                (500, 749),
                (750, 999),
                (1_000, 1_249),
            ]
        );
    }

    #[tokio::test]
    async fn gives_up_once_chunk_size_bottoms_out() {
        let source = MockSource::new(vec![
            Err(rpc_err()),
            Err(rpc_err()),
            Err(rpc_err()),
            Err(rpc_err()),
            Err(rpc_err()),
        ]);
        let range = BlockRange::new(7_000, 12_000).unwrap();

        let result = scan_range(&source, &curve_filter(None, None), range).await;

        match result {
            Err(FourError::ScanFailed { block, .. }) => assert_eq!(block, 7_000),
            other => panic!("expected scan failure, got {other:?}"),
        }
        // 1000 -> 500 -> 250 -> 125 -> 62, every attempt from the same block
        assert_eq!(
            source.requests(),
            vec![
                (7_000, 7_999),
                (7_000, 7_499),
                (7_000, 7_249),
                (7_000, 7_124),
                (7_000, 7_061),
            ]
        );
    }

    #[tokio::test]
    async fn decodes_in_block_order_and_drops_junk() {
        let token = Address::repeat_byte(0x07);
        let source = MockSource::new(vec![
            Ok(vec![trade_log(10, token), junk_log(10), trade_log(11, token)]),
            Ok(vec![trade_log(1_005, token)]),
        ]);
        let range = BlockRange::new(0, 1_999).unwrap();

        let events = scan_range(&source, &curve_filter(None, None), range)
            .await
            .unwrap();

        let blocks: Vec<u64> = events.iter().map(|e| e.block_number()).collect();
        assert_eq!(blocks, vec![10, 11, 1_005]);
        assert!(events.iter().all(|e| e.token() == Some(token)));
    }

    #[test]
    fn filter_targets_both_managers_and_requested_topics() {
        let filter = curve_filter(Some(&[EventKind::TokenPurchaseV2]), None);
        let encoded = serde_json::to_value(&filter).unwrap();

        let addresses: Vec<String> = encoded["address"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a.as_str().unwrap().to_lowercase())
            .collect();
        assert!(addresses.contains(&TOKEN_MANAGER_V1.to_string().to_lowercase()));
        assert!(addresses.contains(&TOKEN_MANAGER_V2.to_string().to_lowercase()));

        let topic0 = &encoded["topics"][0];
        assert_eq!(
            topic0.as_str().unwrap(),
            format!("{:?}", EventKind::TokenPurchaseV2.topic_hash())
        );
    }

    #[test]
    fn filter_defaults_to_all_kinds() {
        for filter in [curve_filter(None, None), curve_filter(Some(&[]), None)] {
            let encoded = serde_json::to_value(&filter).unwrap();
            let topic0 = encoded["topics"][0].as_array().unwrap();
            assert_eq!(topic0.len(), EventKind::ALL.len());
        }
    }

    #[test]
    fn filter_pads_token_into_topic2() {
        let token = TOKEN_MANAGER_V1;
        let filter = curve_filter(None, Some(token));
        let encoded = serde_json::to_value(&filter).unwrap();

        let topics = encoded["topics"].as_array().unwrap();
        assert_eq!(topics.len(), 3);
        // Trader slot stays open
        assert!(topics[1].is_null());
        let expected = format!(
            "0x000000000000000000000000{}",
            token.to_string().trim_start_matches("0x").to_lowercase()
        );
        assert_eq!(topics[2].as_str().unwrap().to_lowercase(), expected);
    }
}
