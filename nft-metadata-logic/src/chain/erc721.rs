use super::{ChainError, ChainReader};
use crate::{
    settings::ChainSettings,
    types::{BlockInfo, TokenId},
};
use alloy::{
    contract::Error as ContractError,
    eips::BlockNumberOrTag,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    sol,
    transports::RpcError,
};
use async_trait::async_trait;
use std::{future::IntoFuture, time::Duration};

sol! {
    #[sol(rpc)]
    interface IERC721Metadata {
        function ownerOf(uint256 tokenId) external view returns (address owner);

        function balanceOf(address owner) external view returns (uint256 balance);

        function tokenURI(uint256 tokenId) external view returns (string memory);
    }
}

/// JSON-RPC error code geth uses for reverted calls.
const EXECUTION_REVERTED_CODE: i64 = 3;

/// [`ChainReader`] backed by an ERC-721 contract behind a JSON-RPC node.
pub struct Erc721ChainReader {
    provider: DynProvider,
    contract_address: Address,
    request_timeout: Duration,
}

impl Erc721ChainReader {
    pub fn new(settings: &ChainSettings) -> Self {
        let provider = ProviderBuilder::new()
            .connect_http(settings.rpc_url.clone())
            .erased();
        Self::with_provider(provider, settings.contract_address, settings.request_timeout)
    }

    pub fn with_provider(
        provider: DynProvider,
        contract_address: Address,
        request_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            contract_address,
            request_timeout,
        }
    }

    fn contract(&self) -> IERC721Metadata::IERC721MetadataInstance<DynProvider> {
        IERC721Metadata::new(self.contract_address, self.provider.clone())
    }

    async fn bounded<T, E, F>(&self, method: &'static str, call: F) -> Result<T, ChainError>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Into<anyhow::Error>,
    {
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result.map_err(|err| ChainError::Rpc {
                method,
                source: err.into(),
            }),
            Err(_) => Err(ChainError::Timeout {
                method,
                timeout: self.request_timeout,
            }),
        }
    }
}

fn is_revert(err: &ContractError) -> bool {
    match err {
        ContractError::TransportError(RpcError::ErrorResp(payload)) => {
            payload.code == EXECUTION_REVERTED_CODE
                || payload.message.to_lowercase().contains("revert")
        }
        _ => false,
    }
}

#[async_trait]
impl ChainReader for Erc721ChainReader {
    async fn read_owner(&self, token_id: TokenId) -> Result<Address, ChainError> {
        let contract = self.contract();
        let call = contract.ownerOf(token_id.into_inner());
        let result = match tokio::time::timeout(self.request_timeout, call.call()).await {
            Ok(result) => result,
            Err(_) => {
                return Err(ChainError::Timeout {
                    method: "ownerOf",
                    timeout: self.request_timeout,
                })
            }
        };
        match result {
            Ok(owner) if owner == Address::ZERO => Err(ChainError::NotMinted),
            Ok(owner) => Ok(owner),
            Err(err) if is_revert(&err) => {
                tracing::debug!(token_id = %token_id, error = %err, "ownerOf reverted");
                Err(ChainError::NotMinted)
            }
            Err(err) => Err(ChainError::Rpc {
                method: "ownerOf",
                source: err.into(),
            }),
        }
    }

    async fn read_balance(&self, owner: Address) -> Result<u64, ChainError> {
        let contract = self.contract();
        let call = contract.balanceOf(owner);
        let balance: U256 = self.bounded("balanceOf", call.call()).await?;
        Ok(u64::try_from(balance).unwrap_or(u64::MAX))
    }

    async fn read_token_pointer(&self, token_id: TokenId) -> Option<String> {
        let contract = self.contract();
        let call = contract.tokenURI(token_id.into_inner());
        match self.bounded("tokenURI", call.call()).await {
            Ok(pointer) if pointer.trim().is_empty() => None,
            Ok(pointer) => Some(pointer),
            Err(err) => {
                tracing::warn!(token_id = %token_id, error = %err, "failed to read token pointer");
                None
            }
        }
    }

    async fn read_latest_block(&self) -> Result<BlockInfo, ChainError> {
        let block = self
            .bounded(
                "eth_getBlockByNumber",
                self.provider.get_block_by_number(BlockNumberOrTag::Latest),
            )
            .await?
            .ok_or_else(|| ChainError::Rpc {
                method: "eth_getBlockByNumber",
                source: anyhow::anyhow!("node returned no latest block"),
            })?;
        Ok(BlockInfo {
            timestamp: block.header.timestamp,
        })
    }
}
