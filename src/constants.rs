//! Protocol Addresses and Chain Parameters
//!
//! Deployment addresses for the Four.meme token managers and the PancakeSwap
//! contracts they migrate liquidity into. All addresses are BNB Smart Chain
//! mainnet deployments.

use alloy::primitives::{address, Address};

/// BNB Smart Chain mainnet chain id
pub const BSC_CHAIN_ID: u64 = 56;

/// Wrapped BNB, the quote asset for every launchpad curve and pool
pub const WBNB: Address = address!("bb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c");

/// First-generation token manager (emits the four-field trade events)
pub const TOKEN_MANAGER_V1: Address = address!("EC4549caDcE5DA21Df6E6422d448034B5233bFbC");

/// Second-generation token manager (emits the eight-field trade events)
pub const TOKEN_MANAGER_V2: Address = address!("5c952063c7fc8610FFDB798152D69F0B9550762b");

/// Read-only helper contract exposing curve state and trade estimation
pub const TOKEN_MANAGER_HELPER: Address = address!("F251F83e40a78868FcfA3FA4599Dad6494E46034");

/// PancakeSwap V2 factory, where graduated tokens get their WBNB pair
pub const PANCAKE_V2_FACTORY: Address = address!("cA143Ce32Fe78f1f7019d7d551a6402fC5350c73");

/// PancakeSwap V3 factory
pub const PANCAKE_V3_FACTORY: Address = address!("0BFbCF9fa4f9C56B0F40a671Ad40E0805A091865");

/// PancakeSwap V2 router, used for post-migration trades
pub const PANCAKE_V2_ROUTER: Address = address!("10ED43C718714eb63d5aA57B78B54704E256024E");

/// Fee tier of the V3 pools the launchpad migrates into (0.25%)
pub const FOUR_V3_FEE_TIER: u32 = 2500;

/// Default router transaction deadline, seconds from now
pub const DEFAULT_DEADLINE_SECS: u64 = 300;
