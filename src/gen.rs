//! Onchain Contract Bindings
//!
//! `sol!` generated bindings for the contracts the SDK talks to: the token
//! managers and their read-only helper, the PancakeSwap V2 factory and
//! router, and plain ERC-20.

use alloy::sol;

// Token manager entrypoints for bonding curve trades. Both manager
// generations expose the same trade functions.
sol!(
    #[derive(Debug)]
    #[sol(rpc)]
    contract TokenManager {
        function buyTokenAMAP(address token, uint256 funds, uint256 minAmount) external payable;
        function sellToken(address token, uint256 amount) external;
    }
);

// Read-only helper exposing curve state and trade estimation across both
// manager generations
sol!(
    #[derive(Debug)]
    #[sol(rpc)]
    contract TokenManagerHelper {
        function getTokenInfo(address token) external view returns (
            uint256 version,
            address tokenManager,
            address quote,
            uint256 lastPrice,
            uint256 tradingFeeRate,
            uint256 minTradingFee,
            uint256 launchTime,
            uint256 offers,
            uint256 maxOffers,
            uint256 funds,
            uint256 maxFunds,
            bool liquidityAdded
        );

        function tryBuy(address token, uint256 amount, uint256 funds) external view returns (
            address tokenManager,
            address quote,
            uint256 estimatedAmount,
            uint256 estimatedCost,
            uint256 estimatedFee,
            uint256 amountMsgValue,
            uint256 amountApproval,
            uint256 amountFunds
        );

        function trySell(address token, uint256 amount) external view returns (
            address tokenManager,
            address quote,
            uint256 funds,
            uint256 fee
        );
    }
);

sol!(
    #[derive(Debug)]
    #[sol(rpc)]
    contract PancakeV2Factory {
        function getPair(address tokenA, address tokenB) external view returns (address pair);
    }
);

sol!(
    #[derive(Debug)]
    #[sol(rpc)]
    contract PancakeV2Router {
        function getAmountsOut(uint256 amountIn, address[] memory path)
            external view returns (uint256[] memory amounts);

        function swapExactETHForTokens(
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external payable returns (uint256[] memory amounts);

        function swapExactTokensForETH(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);
    }
);

sol!(
    #[derive(Debug)]
    #[sol(rpc)]
    contract ERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, U256};
    use alloy::sol_types::SolCall;

    #[test]
    fn trade_selectors_match_deployed_contracts() {
        assert_eq!(
            TokenManager::buyTokenAMAPCall::SELECTOR,
            [0x87, 0xf2, 0x76, 0x55]
        );
        assert_eq!(
            TokenManager::sellTokenCall::SELECTOR,
            [0xf4, 0x64, 0xe7, 0xdb]
        );
        assert_eq!(
            TokenManagerHelper::getTokenInfoCall::SELECTOR,
            [0x1f, 0x69, 0x56, 0x5f]
        );
        assert_eq!(
            TokenManagerHelper::tryBuyCall::SELECTOR,
            [0xe2, 0x1b, 0x10, 0x3a]
        );
        assert_eq!(
            TokenManagerHelper::trySellCall::SELECTOR,
            [0xc6, 0xf4, 0x3e, 0x8c]
        );
        assert_eq!(
            PancakeV2Router::swapExactETHForTokensCall::SELECTOR,
            [0x7f, 0xf3, 0x6a, 0xb5]
        );
        assert_eq!(
            PancakeV2Router::swapExactTokensForETHCall::SELECTOR,
            [0x18, 0xcb, 0xaf, 0xe5]
        );
        assert_eq!(
            PancakeV2Router::getAmountsOutCall::SELECTOR,
            [0xd0, 0x6c, 0xa6, 0x1f]
        );
        assert_eq!(
            PancakeV2Factory::getPairCall::SELECTOR,
            [0xe6, 0xa4, 0x39, 0x05]
        );
        assert_eq!(ERC20::approveCall::SELECTOR, [0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(ERC20::balanceOfCall::SELECTOR, [0x70, 0xa0, 0x82, 0x31]);
    }

    #[test]
    fn buy_calldata_encodes_token_and_amounts() {
        let token = address!("5c952063c7fc8610FFDB798152D69F0B9550762b");
        let call = TokenManager::buyTokenAMAPCall {
            token,
            funds: U256::from(1_000_000_000_000_000_000u128),
            minAmount: U256::from(42u64),
        };
        let encoded = call.abi_encode();
        assert_eq!(&encoded[..4], &[0x87, 0xf2, 0x76, 0x55]);
        // Three static words follow the selector
        assert_eq!(encoded.len(), 4 + 3 * 32);
        assert_eq!(&encoded[16..36], token.as_slice());
    }
}
