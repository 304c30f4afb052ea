use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::time::Duration;
use url::Url;

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainSettings {
    pub rpc_url: Url,
    pub contract_address: Address,
    #[serde(default = "default_chain_request_timeout")]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub request_timeout: Duration,
}

impl ChainSettings {
    pub fn new(rpc_url: Url, contract_address: Address) -> Self {
        Self {
            rpc_url,
            contract_address,
            request_timeout: default_chain_request_timeout(),
        }
    }
}

fn default_chain_request_timeout() -> Duration {
    Duration::from_secs(10)
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewaySettings {
    pub base_url: Url,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub request_timeout: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://gateway.pinata.cloud/ipfs/").expect("valid url"),
            request_timeout: Duration::from_secs(10),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinningSettings {
    pub enabled: bool,
    pub api_url: Url,
    pub jwt: String,
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub request_timeout: Duration,
}

impl Default for PinningSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: Url::parse("https://api.pinata.cloud/").expect("valid url"),
            jwt: String::new(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataSettings {
    /// Value of the `Platform` attribute.
    pub platform: String,
    /// Default name is `"{default_name_prefix} #{token_id}"`.
    pub default_name_prefix: String,
    pub default_description: String,
    /// `max-age` of the `Cache-Control` header, in seconds.
    pub cache_max_age: u32,
}

impl Default for MetadataSettings {
    fn default() -> Self {
        Self {
            platform: "Realife".to_string(),
            default_name_prefix: "Realife NFT".to_string(),
            default_description: "Dynamic NFT metadata powered by Realife".to_string(),
            cache_max_age: 30,
        }
    }
}
