//! Permit2 bindings.
//!
//! The single and batch `permitTransferFrom` overloads live in separate interfaces so that each
//! gets a plain call type. On-chain permit structs omit the spender, which Permit2 takes from
//! `msg.sender`; the signed EIP-712 structs are in [`super::permit`].
use alloy::sol;

sol! {
    #[sol(rpc)]
    #[derive(Debug)]
    interface IPermit2 {
        /// Returns the bitmap of used unordered nonces for `owner` in word `wordPos`.
        function nonceBitmap(address owner, uint256 wordPos) external view returns (uint256);
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface ISignatureTransfer {
        struct TokenPermissions {
            address token;
            uint256 amount;
        }

        struct PermitTransferFrom {
            TokenPermissions permitted;
            uint256 nonce;
            uint256 deadline;
        }

        struct SignatureTransferDetails {
            address to;
            uint256 requestedAmount;
        }

        function permitTransferFrom(
            PermitTransferFrom memory permit,
            SignatureTransferDetails calldata transferDetails,
            address owner,
            bytes calldata signature
        ) external;
    }

    #[sol(rpc)]
    #[derive(Debug)]
    interface IBatchSignatureTransfer {
        struct TokenPermissions {
            address token;
            uint256 amount;
        }

        struct PermitBatchTransferFrom {
            TokenPermissions[] permitted;
            uint256 nonce;
            uint256 deadline;
        }

        struct SignatureTransferDetails {
            address to;
            uint256 requestedAmount;
        }

        function permitTransferFrom(
            PermitBatchTransferFrom memory permit,
            SignatureTransferDetails[] calldata transferDetails,
            address owner,
            bytes calldata signature
        ) external;
    }
}
