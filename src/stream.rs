//! Live Event Streaming
//!
//! WebSocket subscriptions over the two venues a four.meme token trades on:
//! [`CurveStream`] follows bonding curve events straight from the token
//! manager contracts, [`DexStream`] follows PancakeSwap swaps for tokens
//! that have migrated, resolving each token to its pool before subscribing.
//! Both hand out an [`EventStream`] of decoded events and report where they
//! are in their lifecycle through [`StreamState`]. There is no automatic
//! reconnect, a dropped connection ends the stream and the caller decides
//! whether to start a new one.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use alloy::primitives::{Address, B256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider, WsConnect};
use alloy::pubsub::Subscription;
use alloy::rpc::types::{Filter, Log};
use futures::{Stream, StreamExt};
use tracing::{debug, trace, warn};

use crate::decoder;
use crate::discovery::discover_pools;
use crate::errors::FourError;
use crate::events::EventKind;
use crate::indexer::curve_filter;
use crate::types::DecodedEvent;

/// Where a stream is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Configured, nothing started yet
    Idle,

    /// WebSocket handshake in progress
    Connecting,

    /// Resolving tokens to PancakeSwap pools
    Discovering,

    /// Subscription accepted by the node
    Subscribed,

    /// Events flowing
    Streaming,

    /// Done, the stream yields nothing further
    Closed,

    /// Setup failed, see the returned error
    Error,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Streams PancakeSwap swap events for a set of launchpad tokens.
///
/// Tokens are resolved to their V2 pools at subscription time, one log
/// subscription covers every pool found.
pub struct DexStream {
    ws_url: String,
    tokens: Vec<Address>,
    kinds: Vec<EventKind>,
    state: StreamState,
}

/// Configures a [`DexStream`]
#[derive(Debug, Default)]
pub struct DexStreamBuilder {
    ws_url: Option<String>,
    tokens: Vec<Address>,
    kinds: Vec<EventKind>,
}

impl DexStreamBuilder {
    /// WebSocket endpoint, required
    pub fn ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = Some(ws_url.into());
        self
    }

    /// Adds one token to monitor
    pub fn token(mut self, token: Address) -> Self {
        self.tokens.push(token);
        self
    }

    /// Adds several tokens to monitor
    pub fn tokens(mut self, tokens: impl IntoIterator<Item = Address>) -> Self {
        self.tokens.extend(tokens);
        self
    }

    /// Adds an event kind to subscribe to, defaults to V2 swaps only
    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn build(self) -> Result<DexStream, FourError> {
        let ws_url = self.ws_url.ok_or(FourError::WsEndpointNotSet)?;
        let kinds = if self.kinds.is_empty() {
            vec![EventKind::PoolSwapV2]
        } else {
            self.kinds
        };
        Ok(DexStream {
            ws_url,
            tokens: self.tokens,
            kinds,
            state: StreamState::Idle,
        })
    }
}

impl DexStream {
    pub fn builder() -> DexStreamBuilder {
        DexStreamBuilder::default()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Connects, discovers pools, subscribes, and hands back the stream.
    ///
    /// When none of the configured tokens has a pool there is nothing to
    /// subscribe to and an already closed stream comes back instead of an
    /// error.
    pub async fn events(&mut self) -> Result<EventStream, FourError> {
        match self.try_events().await {
            Ok(stream) => Ok(stream),
            Err(e) => {
                self.state = StreamState::Error;
                Err(e)
            }
        }
    }

    async fn try_events(&mut self) -> Result<EventStream, FourError> {
        self.state = StreamState::Connecting;
        let provider = ProviderBuilder::default()
            .connect_ws(WsConnect::new(self.ws_url.clone()))
            .await?;

        self.state = StreamState::Discovering;
        let pools = discover_pools(&provider, &self.tokens).await;
        if pools.is_empty() {
            warn!("No PancakeSwap pools resolved for the configured tokens");
            self.state = StreamState::Closed;
            return Ok(EventStream::closed());
        }
        debug!("Streaming swap events from {} pools", pools.len());

        let filter = swap_filter(pools, &self.kinds);
        let subscription = provider.subscribe_logs(&filter).await?;
        self.state = StreamState::Subscribed;

        let stream = EventStream::live(decode_stream(subscription), provider);
        self.state = StreamState::Streaming;
        Ok(stream)
    }
}

/// Streams bonding curve events from the token manager contracts.
///
/// No discovery phase, the manager addresses are fixed. An optional token
/// narrows the subscription to one launchpad token node-side.
pub struct CurveStream {
    ws_url: String,
    token: Option<Address>,
    kinds: Vec<EventKind>,
    state: StreamState,
}

/// Configures a [`CurveStream`]
#[derive(Debug, Default)]
pub struct CurveStreamBuilder {
    ws_url: Option<String>,
    token: Option<Address>,
    kinds: Vec<EventKind>,
}

impl CurveStreamBuilder {
    /// WebSocket endpoint, required
    pub fn ws_url(mut self, ws_url: impl Into<String>) -> Self {
        self.ws_url = Some(ws_url.into());
        self
    }

    /// Restricts the stream to a single launchpad token
    pub fn token(mut self, token: Address) -> Self {
        self.token = Some(token);
        self
    }

    /// Adds an event kind to subscribe to, defaults to every curve kind
    pub fn kind(mut self, kind: EventKind) -> Self {
        self.kinds.push(kind);
        self
    }

    pub fn build(self) -> Result<CurveStream, FourError> {
        let ws_url = self.ws_url.ok_or(FourError::WsEndpointNotSet)?;
        let kinds = if self.kinds.is_empty() {
            EventKind::CURVE.to_vec()
        } else {
            self.kinds
        };
        Ok(CurveStream {
            ws_url,
            token: self.token,
            kinds,
            state: StreamState::Idle,
        })
    }
}

impl CurveStream {
    pub fn builder() -> CurveStreamBuilder {
        CurveStreamBuilder::default()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Connects, subscribes to the token managers, and hands back the stream
    pub async fn events(&mut self) -> Result<EventStream, FourError> {
        match self.try_events().await {
            Ok(stream) => Ok(stream),
            Err(e) => {
                self.state = StreamState::Error;
                Err(e)
            }
        }
    }

    async fn try_events(&mut self) -> Result<EventStream, FourError> {
        self.state = StreamState::Connecting;
        let provider = ProviderBuilder::default()
            .connect_ws(WsConnect::new(self.ws_url.clone()))
            .await?;

        let filter = curve_filter(Some(&self.kinds), self.token);
        let subscription = provider.subscribe_logs(&filter).await?;
        self.state = StreamState::Subscribed;

        let stream = EventStream::live(decode_stream(subscription), provider);
        self.state = StreamState::Streaming;
        Ok(stream)
    }
}

/// Filter for swap logs over an explicit pool set
pub(crate) fn swap_filter(pools: Vec<Address>, kinds: &[EventKind]) -> Filter {
    let topics: Vec<B256> = kinds.iter().map(|kind| kind.topic_hash()).collect();
    Filter::new().address(pools).event_signature(topics)
}

fn decode_stream(
    subscription: Subscription<Log>,
) -> Pin<Box<dyn Stream<Item = DecodedEvent> + Send>> {
    Box::pin(subscription.into_stream().filter_map(|log| async move {
        match decoder::decode_log(&log) {
            Ok(event) => Some(event),
            Err(e) => {
                trace!("Dropping undecodable log: {}", e);
                None
            }
        }
    }))
}

/// Decoded events as they arrive over the subscription.
///
/// Yields `None` forever once the subscription ends or [`close`] is called.
/// Dropping the stream drops the connection with it.
///
/// [`close`]: EventStream::close
pub struct EventStream {
    state: StreamState,
    inner: Option<Pin<Box<dyn Stream<Item = DecodedEvent> + Send>>>,
    // Keeps the websocket connection alive for as long as events flow
    _provider: Option<RootProvider>,
}

impl EventStream {
    fn live(
        inner: Pin<Box<dyn Stream<Item = DecodedEvent> + Send>>,
        provider: RootProvider,
    ) -> Self {
        Self {
            state: StreamState::Streaming,
            inner: Some(inner),
            _provider: Some(provider),
        }
    }

    fn closed() -> Self {
        Self {
            state: StreamState::Closed,
            inner: None,
            _provider: None,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Ends the stream and tears down the subscription
    pub fn close(&mut self) {
        self.state = StreamState::Closed;
        self.inner = None;
        self._provider = None;
    }
}

impl Stream for EventStream {
    type Item = DecodedEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };
        match inner.as_mut().poll_next(cx) {
            Poll::Ready(None) => {
                this.close();
                Poll::Ready(None)
            }
            other => other,
        }
    }
}
