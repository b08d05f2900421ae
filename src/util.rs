//! Amount Helpers

use alloy::primitives::utils::parse_ether;
use alloy::primitives::U256;

use crate::errors::FourError;

/// Applies a slippage tolerance to a quoted amount, giving the minimum
/// acceptable output: `amount * (100 - percent) / 100`, rounded down
pub fn calculate_slippage(amount: U256, slippage_percent: u8) -> Result<U256, FourError> {
    if slippage_percent > 100 {
        return Err(FourError::InvalidSlippage(slippage_percent));
    }
    let keep = U256::from(100 - slippage_percent);
    Ok(amount * keep / U256::from(100u8))
}

/// Parses a decimal BNB amount into wei
pub fn parse_bnb(amount: &str) -> Result<U256, FourError> {
    Ok(parse_ether(amount)?)
}
