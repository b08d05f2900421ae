//! Four.meme Activity Demo
//!
//! Scans recent history for bonding curve events, optionally quotes a buy
//! for one token, then follows live curve activity over WebSocket. Reads
//! `FOUR_RPC_URL` and `FOUR_WS_URL` from the environment or a `.env` file;
//! set `PRIVATE_KEY` and `FOUR_TOKEN` as well to see the quote path.
use alloy::primitives::Address;
use anyhow::Result;
use four_sdk::{
    calculate_slippage, parse_bnb, BlockRange, CurveIndexer, CurveStream, DecodedEvent, Trade,
    TradeSide,
};
use futures::StreamExt;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::builder()
        .parse("info,four_sdk=debug,alloy_transport_http=off,alloy_rpc_client=off,alloy_transport_ws=off,hyper_util=off,reqwest=off")
        .expect("filter should be valid");

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let rpc_url = std::env::var("FOUR_RPC_URL")?;

    // Look back over the most recent blocks for curve activity
    let indexer = CurveIndexer::new(&rpc_url)?;
    let head = indexer.block_number().await?;
    let range = BlockRange::new(head.saturating_sub(999), head)?;
    let events = indexer.fetch_events(range, None, None).await?;
    println!(
        "{} curve events in blocks {}..={}",
        events.len(),
        range.from,
        range.to
    );

    for event in events.iter().take(10) {
        match event {
            DecodedEvent::Create(create) => println!(
                "block {}: {} ({}) launched by {}",
                create.block_number, create.name, create.symbol, create.creator
            ),
            DecodedEvent::Trade(trade) => println!(
                "block {}: {:?} of {} for {} wei",
                trade.block_number, trade.side, trade.token, trade.cost
            ),
            DecodedEvent::SwapV2(swap) => {
                println!("block {}: V2 swap on pool {}", swap.block_number, swap.pool)
            }
            DecodedEvent::SwapV3(swap) => {
                println!("block {}: V3 swap on pool {}", swap.block_number, swap.pool)
            }
        }
    }

    // With a key and a token configured, show the quote path (read-only)
    if let (Ok(key), Ok(token)) = (std::env::var("PRIVATE_KEY"), std::env::var("FOUR_TOKEN")) {
        let token: Address = token.parse()?;
        let trade = Trade::new(&rpc_url, &key)?;

        let curve = trade.curve_data(token).await?;
        println!(
            "{} raised {} of {} wei, migrated: {}",
            token,
            curve.funds,
            curve.max_funds,
            curve.migrated()
        );

        let spend = parse_bnb("0.01")?;
        let quote = trade.quote(token, spend, TradeSide::Buy).await?;
        let min_out = calculate_slippage(quote.amount, 5)?;
        println!(
            "0.01 BNB buys about {} (minimum {} at 5% slippage) via {}",
            quote.amount, min_out, quote.router
        );
    }

    // Follow live curve activity until interrupted
    let ws_url = std::env::var("FOUR_WS_URL")?;
    let mut stream = CurveStream::builder().ws_url(ws_url).build()?;
    let mut events = stream.events().await?;
    println!("Streaming live curve events, ctrl-c to stop");
    while let Some(event) = events.next().await {
        println!("{}", serde_json::to_string(&event)?);
    }

    Ok(())
}
