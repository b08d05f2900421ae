//! PancakeSwap Pool Discovery
//!
//! Tokens that graduate from the bonding curve trade on PancakeSwap V2
//! against WBNB. Given a set of launchpad tokens this resolves each one to
//! its factory pair so a stream can subscribe to swap logs. Lookups that
//! fail or come back empty drop the token and move on, a partial pool set
//! is still worth streaming.

use alloy::primitives::Address;
use alloy::providers::Provider;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::constants::{PANCAKE_V2_FACTORY, WBNB};
use crate::errors::FourError;
use crate::gen::PancakeV2Factory;

/// Resolves a token pair to its pool address
#[async_trait]
pub trait PairSource: Send + Sync {
    async fn get_pair(&self, token0: Address, token1: Address) -> Result<Address, FourError>;
}

struct FactorySource<P> {
    provider: P,
}

#[async_trait]
impl<P: Provider + Send + Sync> PairSource for FactorySource<P> {
    async fn get_pair(&self, token0: Address, token1: Address) -> Result<Address, FourError> {
        let factory = PancakeV2Factory::new(PANCAKE_V2_FACTORY, &self.provider);
        Ok(factory.getPair(token0, token1).call().await?)
    }
}

/// Resolves each token to its PancakeSwap V2 pool against WBNB.
///
/// WBNB itself is skipped, tokens without a pair or whose lookup fails are
/// dropped. Pool order follows token order.
pub async fn discover_pools<P: Provider>(provider: &P, tokens: &[Address]) -> Vec<Address> {
    discover_from(&FactorySource { provider }, tokens).await
}

async fn discover_from<S: PairSource + ?Sized>(source: &S, tokens: &[Address]) -> Vec<Address> {
    let mut pools = Vec::new();
    for &token in tokens {
        if token == WBNB {
            debug!("Skipping WBNB, it has no pool against itself");
            continue;
        }
        // Factory convention orders pair members ascending
        let (token0, token1) = if token < WBNB {
            (token, WBNB)
        } else {
            (WBNB, token)
        };
        match source.get_pair(token0, token1).await {
            Ok(pool) if pool == Address::ZERO => {
                debug!("No PancakeSwap pair for token {token}");
            }
            Ok(pool) => pools.push(pool),
            Err(e) => warn!("Pair lookup failed for token {token}: {e}"),
        }
    }
    pools
}
