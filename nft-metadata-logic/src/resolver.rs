use crate::{
    chain::{ChainError, ChainReader, OwnerLookup},
    fetcher::{DocumentDefaults, FetchedDocument, MetadataFetcher},
    reputation,
    settings::MetadataSettings,
    types::{Attribute, BlockInfo, ResolvedMetadata, TokenId},
};
use alloy::primitives::Address;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

pub const NOT_MINTED_STATUS: &str = "Not minted";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error("block timestamp {0} is out of range")]
    InvalidTimestamp(u64),
}

/// Builds the point-in-time metadata document of a token.
///
/// The owner read gates everything else. Once the token is known to be
/// owned, the pointer, balance and block reads are issued concurrently.
/// Only the pointer branch degrades to defaults; a failed balance or
/// block read fails the whole resolution.
pub struct MetadataResolver {
    chain: Arc<dyn ChainReader>,
    fetcher: Arc<MetadataFetcher>,
    settings: MetadataSettings,
}

impl MetadataResolver {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        fetcher: Arc<MetadataFetcher>,
        settings: MetadataSettings,
    ) -> Self {
        Self {
            chain,
            fetcher,
            settings,
        }
    }

    #[instrument(skip_all, fields(token_id = %token_id), level = "debug")]
    pub async fn resolve(&self, token_id: TokenId) -> Result<ResolvedMetadata, ResolveError> {
        let defaults = self.defaults(token_id);

        let owner = match OwnerLookup::from_read(self.chain.read_owner(token_id).await)? {
            OwnerLookup::NotMinted => {
                tracing::debug!("token is not minted");
                return Ok(not_minted(defaults));
            }
            OwnerLookup::Owned(owner) => owner,
        };

        let (document, balance, block) = tokio::join!(
            self.resolve_document(token_id, defaults),
            self.chain.read_balance(owner),
            self.chain.read_latest_block(),
        );

        assemble(&self.settings, token_id, owner, document, balance?, block?)
    }

    async fn resolve_document(
        &self,
        token_id: TokenId,
        defaults: DocumentDefaults,
    ) -> FetchedDocument {
        let pointer = self.chain.read_token_pointer(token_id).await;
        self.fetcher.resolve(pointer.as_deref(), defaults).await
    }

    fn defaults(&self, token_id: TokenId) -> DocumentDefaults {
        DocumentDefaults {
            name: format!("{} #{}", self.settings.default_name_prefix, token_id),
            description: self.settings.default_description.clone(),
        }
    }
}

fn not_minted(defaults: DocumentDefaults) -> ResolvedMetadata {
    ResolvedMetadata {
        name: defaults.name,
        description: defaults.description,
        image: None,
        attributes: vec![Attribute::new("Status", NOT_MINTED_STATUS)],
    }
}

fn assemble(
    settings: &MetadataSettings,
    token_id: TokenId,
    owner: Address,
    document: FetchedDocument,
    balance: u64,
    block: BlockInfo,
) -> Result<ResolvedMetadata, ResolveError> {
    let last_updated = i64::try_from(block.timestamp)
        .ok()
        .and_then(|timestamp| DateTime::<Utc>::from_timestamp(timestamp, 0))
        .ok_or(ResolveError::InvalidTimestamp(block.timestamp))?
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    let reputation = reputation::calculate(balance);

    let mut attributes = vec![
        Attribute::new("Platform", settings.platform.as_str()),
        Attribute::new("Token ID", token_id.to_string()),
        Attribute::new("Owner", owner.to_string()),
        Attribute::new("Owned NFTs", balance.to_string()),
        Attribute::new("Last Updated", last_updated),
    ];
    if reputation.verified {
        attributes.push(Attribute::new("Verified Creator", "Yes"));
    }
    attributes.push(Attribute::new("Reputation", reputation.tier.to_string()));
    attributes.push(Attribute::number("Reputation Score", reputation.score));

    Ok(ResolvedMetadata {
        name: document.name,
        description: document.description,
        image: document.image,
        attributes,
    })
}
