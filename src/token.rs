//! Launchpad Token Metadata
//!
//! Read-only ERC-20 access for tokens launched through four.meme. Tokens on
//! the curve and migrated tokens are both plain ERC-20s, so one client
//! covers either stage.

use alloy::primitives::{Address, U256};
use alloy::providers::{ProviderBuilder, RootProvider};

use crate::errors::FourError;
use crate::gen::ERC20;
use crate::types::TokenMetadata;

/// Read-only ERC-20 client over HTTP
pub struct TokenClient {
    provider: RootProvider,
}

impl TokenClient {
    pub fn new(rpc_url: &str) -> Result<Self, FourError> {
        let provider = ProviderBuilder::default()
            .connect_http(rpc_url.parse().map_err(|_e| FourError::ParseEndpoint)?);
        Ok(Self { provider })
    }

    /// Fetches name, symbol, decimals, and total supply for a token
    pub async fn metadata(&self, token: Address) -> Result<TokenMetadata, FourError> {
        let erc20 = ERC20::new(token, &self.provider);
        let name = erc20.name().call().await?;
        let symbol = erc20.symbol().call().await?;
        let decimals = erc20.decimals().call().await?;
        let total_supply = erc20.totalSupply().call().await?;
        Ok(TokenMetadata {
            address: token,
            name,
            symbol,
            decimals,
            total_supply,
        })
    }

    pub async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, FourError> {
        let erc20 = ERC20::new(token, &self.provider);
        Ok(erc20.balanceOf(owner).call().await?)
    }

    pub async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, FourError> {
        let erc20 = ERC20::new(token, &self.provider);
        Ok(erc20.allowance(owner, spender).call().await?)
    }
}
