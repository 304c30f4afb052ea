mod erc721;

pub use erc721::Erc721ChainReader;

use crate::types::{BlockInfo, TokenId};
use alloy::primitives::Address;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    /// `ownerOf` reverted: the token was never minted or has been burned.
    #[error("token is not minted")]
    NotMinted,
    #[error("chain request '{method}' timed out after {timeout:?}")]
    Timeout {
        method: &'static str,
        timeout: Duration,
    },
    #[error("chain request '{method}' failed: {source}")]
    Rpc {
        method: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

/// Outcome of the gating ownership read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerLookup {
    Owned(Address),
    NotMinted,
}

impl OwnerLookup {
    pub fn from_read(result: Result<Address, ChainError>) -> Result<Self, ChainError> {
        match result {
            Ok(owner) => Ok(Self::Owned(owner)),
            Err(ChainError::NotMinted) => Ok(Self::NotMinted),
            Err(err) => Err(err),
        }
    }
}

/// Read-only view of the token contract and the chain head.
#[automock]
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Fails with [`ChainError::NotMinted`] if the token does not exist.
    async fn read_owner(&self, token_id: TokenId) -> Result<Address, ChainError>;

    async fn read_balance(&self, owner: Address) -> Result<u64, ChainError>;

    /// Missing or malformed pointers are reported as `None`.
    async fn read_token_pointer(&self, token_id: TokenId) -> Option<String>;

    async fn read_latest_block(&self) -> Result<BlockInfo, ChainError>;
}
