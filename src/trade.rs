//! Trading four.meme Tokens
//!
//! Quotes and executes buys and sells wherever a token currently trades.
//! Before migration the bonding curve is the venue: estimates come from the
//! token manager helper and orders go to the token manager itself. After
//! migration everything routes through the PancakeSwap V2 router over the
//! WBNB pair. [`Trade::quote`] picks the venue and returns the router to
//! execute against, [`Trade::buy`] and [`Trade::sell`] build the calldata
//! for that router and sign with the configured key.

use std::str::FromStr;
use std::time::{Duration, Instant};

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use chrono::Utc;
use tracing::info;

use crate::constants::{
    BSC_CHAIN_ID, DEFAULT_DEADLINE_SECS, PANCAKE_V2_ROUTER, TOKEN_MANAGER_HELPER, WBNB,
};
use crate::errors::FourError;
use crate::gen::{PancakeV2Router, TokenManager, TokenManagerHelper, ERC20};
use crate::types::{CurveData, QuoteResult, TradeParams, TradeSide};

const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Signing client for buying and selling launchpad tokens
pub struct Trade {
    provider: DynProvider,
    address: Address,
}

impl Trade {
    /// Builds a trading client from an HTTP endpoint and a hex private key
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self, FourError> {
        let signer = PrivateKeySigner::from_str(private_key)?;
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url.parse().map_err(|_e| FourError::ParseEndpoint)?)
            .erased();
        Ok(Self { provider, address })
    }

    /// The signing address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Reads the full bonding curve state for a token
    pub async fn curve_data(&self, token: Address) -> Result<CurveData, FourError> {
        let helper = TokenManagerHelper::new(TOKEN_MANAGER_HELPER, &self.provider);
        let info = helper.getTokenInfo(token).call().await?;
        Ok(CurveData {
            version: info.version,
            token_manager: info.tokenManager,
            quote: info.quote,
            last_price: info.lastPrice,
            trading_fee_rate: info.tradingFeeRate,
            min_trading_fee: info.minTradingFee,
            launch_time: info.launchTime,
            offers: info.offers,
            max_offers: info.maxOffers,
            funds: info.funds,
            max_funds: info.maxFunds,
            liquidity_added: info.liquidityAdded,
        })
    }

    /// Estimates a trade and reports which router executes it.
    ///
    /// `amount_in` is BNB for buys and tokens for sells. Pre-migration the
    /// estimate comes from the token manager helper and the returned router
    /// is the token manager, post-migration from `getAmountsOut` on the
    /// PancakeSwap router.
    pub async fn quote(
        &self,
        token: Address,
        amount_in: U256,
        side: TradeSide,
    ) -> Result<QuoteResult, FourError> {
        let curve = self.curve_data(token).await?;
        if !curve.migrated() {
            let helper = TokenManagerHelper::new(TOKEN_MANAGER_HELPER, &self.provider);
            return match side {
                TradeSide::Buy => {
                    let est = helper.tryBuy(token, U256::ZERO, amount_in).call().await?;
                    Ok(QuoteResult {
                        router: est.tokenManager,
                        amount: est.estimatedAmount,
                    })
                }
                TradeSide::Sell => {
                    let est = helper.trySell(token, amount_in).call().await?;
                    Ok(QuoteResult {
                        router: est.tokenManager,
                        amount: est.funds,
                    })
                }
            };
        }

        let path = match side {
            TradeSide::Buy => vec![WBNB, token],
            TradeSide::Sell => vec![token, WBNB],
        };
        let router = PancakeV2Router::new(PANCAKE_V2_ROUTER, &self.provider);
        let amounts = router.getAmountsOut(amount_in, path).call().await?;
        Ok(QuoteResult {
            router: PANCAKE_V2_ROUTER,
            amount: amounts.last().copied().unwrap_or_default(),
        })
    }

    /// Buys `params.token` with `params.amount_in` BNB through `router`,
    /// which should come from [`Trade::quote`]
    pub async fn buy(&self, params: &TradeParams, router: Address) -> Result<TxHash, FourError> {
        let (target, calldata, value) = build_buy(params, router, self.address);
        let hash = self.send(params, target, calldata, value).await?;
        info!("Submitted buy of {}: {}", params.token, hash);
        Ok(hash)
    }

    /// Sells `params.amount_in` tokens through `router`. Router sells move
    /// tokens with `transferFrom`, so the router needs allowance first, see
    /// [`Trade::approve`]. The same goes for the token manager.
    pub async fn sell(&self, params: &TradeParams, router: Address) -> Result<TxHash, FourError> {
        let (target, calldata, value) = build_sell(params, router, self.address);
        let hash = self.send(params, target, calldata, value).await?;
        info!("Submitted sell of {}: {}", params.token, hash);
        Ok(hash)
    }

    /// Grants `spender` an ERC-20 allowance over `token`
    pub async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, FourError> {
        let erc20 = ERC20::new(token, &self.provider);
        let pending = erc20.approve(spender, amount).send().await?;
        Ok(*pending.tx_hash())
    }

    /// Polls for the receipt of a submitted transaction
    pub async fn wait_for_transaction(
        &self,
        hash: TxHash,
        timeout: Duration,
    ) -> Result<TransactionReceipt, FourError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(receipt) = self.provider.get_transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            if Instant::now() >= deadline {
                return Err(FourError::ReceiptTimeout(hash));
            }
            tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }

    async fn send(
        &self,
        params: &TradeParams,
        target: Address,
        calldata: Vec<u8>,
        value: U256,
    ) -> Result<TxHash, FourError> {
        let mut request = TransactionRequest::default()
            .with_to(target)
            .with_input(calldata)
            .with_value(value)
            .with_chain_id(BSC_CHAIN_ID);
        if let Some(nonce) = params.nonce {
            request = request.with_nonce(nonce);
        }
        if let Some(gas_limit) = params.gas_limit {
            request = request.with_gas_limit(gas_limit);
        }
        if let Some(gas_price) = params.gas_price {
            request = request.with_gas_price(gas_price);
        }
        let pending = self.provider.send_transaction(request).await?;
        Ok(*pending.tx_hash())
    }
}

/// Target, calldata, and attached value for a buy through `router`
fn build_buy(
    params: &TradeParams,
    router: Address,
    default_to: Address,
) -> (Address, Vec<u8>, U256) {
    if router == PANCAKE_V2_ROUTER {
        let call = PancakeV2Router::swapExactETHForTokensCall {
            amountOutMin: params.amount_out_min,
            path: vec![WBNB, params.token],
            to: params.to.unwrap_or(default_to),
            deadline: U256::from(deadline_or_default(params.deadline)),
        };
        (PANCAKE_V2_ROUTER, call.abi_encode(), params.amount_in)
    } else {
        // buyTokenAMAP spends an exact BNB amount for as many tokens as the
        // curve gives at that spend
        let call = TokenManager::buyTokenAMAPCall {
            token: params.token,
            funds: params.amount_in,
            minAmount: params.amount_out_min,
        };
        (router, call.abi_encode(), params.amount_in)
    }
}

/// Target, calldata, and attached value for a sell through `router`
fn build_sell(
    params: &TradeParams,
    router: Address,
    default_to: Address,
) -> (Address, Vec<u8>, U256) {
    if router == PANCAKE_V2_ROUTER {
        let call = PancakeV2Router::swapExactTokensForETHCall {
            amountIn: params.amount_in,
            amountOutMin: params.amount_out_min,
            path: vec![params.token, WBNB],
            to: params.to.unwrap_or(default_to),
            deadline: U256::from(deadline_or_default(params.deadline)),
        };
        (PANCAKE_V2_ROUTER, call.abi_encode(), U256::ZERO)
    } else {
        let call = TokenManager::sellTokenCall {
            token: params.token,
            amount: params.amount_in,
        };
        (router, call.abi_encode(), U256::ZERO)
    }
}

fn deadline_or_default(deadline: Option<u64>) -> u64 {
    deadline.unwrap_or_else(|| Utc::now().timestamp() as u64 + DEFAULT_DEADLINE_SECS)
}
