pub mod chain;
pub mod fetcher;
pub mod pinning;
pub mod reputation;
pub mod resolver;
pub mod settings;
pub mod types;

pub use alloy::primitives::Address;
pub use chain::{ChainError, ChainReader, Erc721ChainReader, MockChainReader, OwnerLookup};
pub use fetcher::{DocumentDefaults, FetchError, FetchedDocument, MetadataFetcher};
pub use pinning::{ContentId, PinningClient, PinningError};
pub use resolver::{MetadataResolver, ResolveError};
pub use settings::{ChainSettings, GatewaySettings, MetadataSettings, PinningSettings};
pub use types::{
    Attribute, AttributeValue, BlockInfo, DisplayType, ExternalDocument, ResolvedMetadata,
    TokenId, TokenIdParseError,
};
