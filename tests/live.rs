//! Live tests against real BSC endpoints.
//!
//! Opt-in: run `cargo test -- --ignored` with `FOUR_RPC_URL` set to an HTTP
//! endpoint, and `FOUR_WS_URL` to a WebSocket endpoint for the stream tests.

use alloy::primitives::{address, Address};
use alloy::providers::ProviderBuilder;
use four_sdk::{
    discover_pools, BlockRange, CurveIndexer, CurveStream, DexStream, StreamState, TokenClient,
};
use futures::StreamExt;
use std::time::Duration;

fn rpc_url() -> String {
    std::env::var("FOUR_RPC_URL").unwrap()
}

fn ws_url() -> String {
    std::env::var("FOUR_WS_URL").unwrap()
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn scans_recent_history_in_order() {
    let indexer = CurveIndexer::new(&rpc_url()).unwrap();
    let head = indexer.block_number().await.unwrap();
    let range = BlockRange::new(head - 2_499, head).unwrap();

    let events = indexer.fetch_events(range, None, None).await.unwrap();

    let blocks: Vec<u64> = events.iter().map(|e| e.block_number()).collect();
    let mut sorted = blocks.clone();
    sorted.sort();
    assert_eq!(blocks, sorted, "events must come back ordered by block");
    for event in &events {
        assert!(event.block_number() >= range.from && event.block_number() <= range.to);
        assert!(event.kind().is_curve(), "manager addresses only emit curve events");
    }
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn reads_wbnb_metadata() {
    let client = TokenClient::new(&rpc_url()).unwrap();

    let meta = client.metadata(four_sdk::constants::WBNB).await.unwrap();

    assert_eq!(meta.symbol, "WBNB");
    assert_eq!(meta.decimals, 18);
    assert!(meta.total_supply > alloy::primitives::U256::ZERO);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn discovers_the_cake_pool() {
    let provider = ProviderBuilder::default().connect_http(rpc_url().parse().unwrap());
    let cake = address!("0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82");

    let pools = discover_pools(&provider, &[cake]).await;

    assert_eq!(pools.len(), 1);
    assert_ne!(pools[0], Address::ZERO);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn curve_stream_delivers_live_events() {
    let mut stream = CurveStream::builder().ws_url(ws_url()).build().unwrap();
    let mut events = stream.events().await.unwrap();
    assert_eq!(stream.state(), StreamState::Streaming);

    // Curve activity on mainnet is steady enough that something should
    // arrive well inside two minutes
    let event = tokio::time::timeout(Duration::from_secs(120), events.next())
        .await
        .expect("no curve event within two minutes")
        .expect("stream ended early");
    assert!(event.kind().is_curve());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn dex_stream_without_pools_closes_cleanly() {
    let mut stream = DexStream::builder().ws_url(ws_url()).build().unwrap();

    let mut events = stream.events().await.unwrap();

    assert_eq!(stream.state(), StreamState::Closed);
    assert!(events.next().await.is_none());
}
