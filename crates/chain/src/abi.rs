use alloy::sol;

sol! {
    interface ITradeMarket {
        event Bought(
            uint256 tdate,
            address indexed user,
            address indexed token,
            uint256 usdtIn,
            uint256 tokenOut,
            uint256 price
        );

        event Sold(
            uint256 tdate,
            address indexed user,
            address indexed token,
            uint256 tokenIn,
            uint256 usdtOut,
            uint256 price
        );

        function getTokenFullData(address token)
            external
            view
            returns (
                address tokenAddress,
                string memory name,
                string memory symbol,
                uint256 price,
                int256 lastPrice,
                uint256 tokenLiquidity,
                uint256 usdtLiquidity,
                uint256 minted,
                uint256 sold,
                uint256 uniqueTraders,
                uint256 totalRegUsers,
                bool isTActive
            );

        function getBurnToken(address token)
            external
            view
            returns (uint256 burntokens, uint256 buyuserPer, uint256 selluserPer, uint256 refAmt);
    }
}
