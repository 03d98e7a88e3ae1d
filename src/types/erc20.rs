use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 amount);

        function name() external view returns (string);
        function decimals() external view returns (uint8);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    /// ERC-2612 extension.
    ///
    /// See: https://eips.ethereum.org/EIPS/eip-2612
    #[sol(rpc)]
    #[derive(Debug)]
    interface IERC20Permit {
        function nonces(address owner) external view returns (uint256);
        function permit(
            address owner,
            address spender,
            uint256 value,
            uint256 deadline,
            uint8 v,
            bytes32 r,
            bytes32 s
        ) external;
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface IERC721 {
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
    }
}
