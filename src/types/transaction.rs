use super::{
    AssetKind, IERC20, IERC721, MigrationOutcome, Permit2Batch, Permit2Single, TokenAmount,
};
use alloy::{
    network::TransactionBuilder,
    primitives::{Address, U256},
    rpc::types::TransactionRequest,
    sol_types::SolCall,
};

/// A plain native value transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTransfer {
    /// Sender.
    pub from: Address,
    /// Receiver.
    pub to: Address,
    /// Native token address as reported by the balance API.
    pub token: Address,
    /// Amount in wei.
    pub amount: U256,
}

/// A direct ERC-20 `transfer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Erc20Transfer {
    /// Sender.
    pub from: Address,
    /// Receiver.
    pub to: Address,
    /// Token address.
    pub token: Address,
    /// Raw amount.
    pub amount: U256,
    /// Stablecoin or cryptocurrency.
    pub kind: AssetKind,
}

/// A single ERC-721 `safeTransferFrom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftTransfer {
    /// Sender.
    pub from: Address,
    /// Receiver.
    pub to: Address,
    /// Collection address.
    pub token: Address,
    /// Token id.
    pub token_id: U256,
}

/// A transfer the source account submits on-chain itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedTransaction {
    /// Native value transfer.
    Native(NativeTransfer),
    /// Direct ERC-20 transfer.
    Erc20Direct(Erc20Transfer),
    /// ERC-721 transfer of one token id.
    Nft(NftTransfer),
    /// Permit2 single signature transfer executed by the owner.
    Permit2Single(Permit2Single),
    /// Permit2 batch signature transfer executed by the owner.
    Permit2Batch(Permit2Batch),
}

/// How the gas cost of a [`PlannedTransaction`] is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasEstimate {
    /// A fixed number of gas units.
    Fixed(u64),
    /// Simulated against current chain state.
    Simulated,
}

impl PlannedTransaction {
    /// Returns the account submitting the transaction.
    pub fn sender(&self) -> Address {
        match self {
            Self::Native(tx) => tx.from,
            Self::Erc20Direct(tx) => tx.from,
            Self::Nft(tx) => tx.from,
            Self::Permit2Single(tx) => tx.owner,
            Self::Permit2Batch(tx) => tx.owner,
        }
    }

    /// Returns the transferred tokens and amounts. NFTs count as one unit.
    pub fn transfers(&self) -> Vec<TokenAmount> {
        match self {
            Self::Native(tx) => vec![TokenAmount::new(tx.token, tx.amount)],
            Self::Erc20Direct(tx) => vec![TokenAmount::new(tx.token, tx.amount)],
            Self::Nft(tx) => vec![TokenAmount::new(tx.token, U256::ONE)],
            Self::Permit2Single(tx) => vec![tx.permitted],
            Self::Permit2Batch(tx) => tx.permitted.clone(),
        }
    }

    /// Returns the token id for NFT transfers.
    pub fn token_id(&self) -> Option<U256> {
        match self {
            Self::Nft(tx) => Some(tx.token_id),
            _ => None,
        }
    }

    /// Returns how the gas cost of this transaction is estimated given the fixed unit costs
    /// `native`, `erc20` and `nft`.
    pub fn gas_estimate(&self, native: u64, erc20: u64, nft: u64) -> GasEstimate {
        match self {
            Self::Native(_) => GasEstimate::Fixed(native),
            Self::Erc20Direct(_) => GasEstimate::Fixed(erc20),
            Self::Nft(_) => GasEstimate::Fixed(nft),
            Self::Permit2Single(_) | Self::Permit2Batch(_) => GasEstimate::Simulated,
        }
    }

    /// Builds the [`TransactionRequest`] for this transfer. Permit2 transfers are sent to
    /// `permit2`.
    pub fn build(&self, permit2: Address) -> TransactionRequest {
        let request = TransactionRequest::default().with_from(self.sender());
        match self {
            Self::Native(tx) => request.with_to(tx.to).with_value(tx.amount),
            Self::Erc20Direct(tx) => request
                .with_to(tx.token)
                .with_input(IERC20::transferCall { to: tx.to, amount: tx.amount }.abi_encode()),
            Self::Nft(tx) => request.with_to(tx.token).with_input(
                IERC721::safeTransferFromCall { from: tx.from, to: tx.to, tokenId: tx.token_id }
                    .abi_encode(),
            ),
            Self::Permit2Single(tx) => request.with_to(permit2).with_input(tx.call().abi_encode()),
            Self::Permit2Batch(tx) => request.with_to(permit2).with_input(tx.call().abi_encode()),
        }
    }

    /// Returns one outcome per transferred unit, all carrying `message`.
    pub fn outcomes(&self, message: &str) -> Vec<MigrationOutcome> {
        let token_id = self.token_id();
        self.transfers()
            .into_iter()
            .map(|transfer| {
                MigrationOutcome::new(transfer.token, message)
                    .with_amount(transfer.amount)
                    .with_token_id(token_id)
            })
            .collect()
    }

    /// Returns the success and failure messages for this kind of transfer.
    pub fn messages(&self) -> (&'static str, &'static str) {
        match self {
            Self::Native(_) => (MigrationOutcome::NATIVE_SENT, MigrationOutcome::NATIVE_FAILED),
            Self::Nft(_) => (MigrationOutcome::NFT_SENT, MigrationOutcome::NFT_FAILED),
            Self::Erc20Direct(_) | Self::Permit2Single(_) | Self::Permit2Batch(_) => {
                (MigrationOutcome::TOKEN_SENT, MigrationOutcome::TOKEN_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransferDetail;
    use alloy::primitives::Bytes;

    #[test]
    fn built_transactions_come_from_the_sender() {
        let sender = Address::with_last_byte(1);
        let receiver = Address::with_last_byte(2);
        let token = Address::with_last_byte(3);
        let permit2 = Address::with_last_byte(4);

        let single = PlannedTransaction::Permit2Single(Permit2Single {
            owner: sender,
            spender: sender,
            permitted: TokenAmount::new(token, U256::from(7)),
            nonce: U256::ZERO,
            deadline: U256::ZERO,
            transfer_details: TransferDetail { to: receiver, requested_amount: U256::from(7) },
            signature: Bytes::new(),
        });
        assert_eq!(single.sender(), sender);

        let tx = single.build(permit2);
        assert_eq!(tx.from, Some(sender));
        assert_eq!(tx.to.and_then(|to| to.to().copied()), Some(permit2));

        let native = PlannedTransaction::Native(NativeTransfer {
            from: sender,
            to: receiver,
            token,
            amount: U256::from(9),
        });
        let tx = native.build(permit2);
        assert_eq!(tx.from, Some(sender));
        assert_eq!(tx.value, Some(U256::from(9)));
        assert_eq!(native.messages().0, MigrationOutcome::NATIVE_SENT);
    }
}
