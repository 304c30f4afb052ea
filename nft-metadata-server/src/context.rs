use crate::Settings;
use nft_metadata_logic::{
    ChainReader, Erc721ChainReader, MetadataFetcher, MetadataResolver, MetadataSettings,
    PinningClient,
};
use std::sync::Arc;

/// Long-lived clients shared by every request handler.
pub struct ServiceContext {
    pub resolver: Arc<MetadataResolver>,
    pub fetcher: Arc<MetadataFetcher>,
    pub pinning: Option<Arc<PinningClient>>,
    pub metadata: MetadataSettings,
}

impl ServiceContext {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let chain = Arc::new(Erc721ChainReader::new(&settings.chain));
        let fetcher = Arc::new(MetadataFetcher::new(&settings.gateway)?);
        let pinning = settings
            .pinning
            .enabled
            .then(|| PinningClient::new(&settings.pinning))
            .transpose()?
            .map(Arc::new);
        Ok(Self::from_parts(
            chain,
            fetcher,
            pinning,
            settings.metadata.clone(),
        ))
    }

    pub fn from_parts(
        chain: Arc<dyn ChainReader>,
        fetcher: Arc<MetadataFetcher>,
        pinning: Option<Arc<PinningClient>>,
        metadata: MetadataSettings,
    ) -> Self {
        let resolver = Arc::new(MetadataResolver::new(
            chain,
            fetcher.clone(),
            metadata.clone(),
        ));
        Self {
            resolver,
            fetcher,
            pinning,
            metadata,
        }
    }
}
