use crate::{settings::GatewaySettings, types::ExternalDocument};
use thiserror::Error;
use tracing::instrument;
use url::Url;

pub const IPFS_SCHEME: &str = "ipfs://";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("pointer is absent")]
    Absent,
    #[error("unsupported pointer scheme: '{0}'")]
    UnsupportedScheme(String),
    #[error("malformed pointer: '{0}'")]
    MalformedPointer(String),
    #[error("gateway request timed out")]
    Timeout,
    #[error("gateway request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("gateway responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("document is not valid json: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Values used for every field the off-chain document fails to provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDefaults {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

impl FetchedDocument {
    pub fn fallback(defaults: DocumentDefaults) -> Self {
        Self {
            name: defaults.name,
            description: defaults.description,
            image: None,
        }
    }
}

/// Resolves `ipfs://` pointers through an HTTP gateway.
pub struct MetadataFetcher {
    client: reqwest::Client,
    gateway: Url,
}

impl MetadataFetcher {
    pub fn new(settings: &GatewaySettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self::with_client(client, settings.base_url.clone()))
    }

    pub fn with_client(client: reqwest::Client, mut gateway: Url) -> Self {
        // `Url::join` replaces the last segment unless the base ends with a slash
        if !gateway.path().ends_with('/') {
            let path = format!("{}/", gateway.path());
            gateway.set_path(&path);
        }
        Self { client, gateway }
    }

    /// Translates `ipfs://<cid>[/path]` (or `ipfs://ipfs/<cid>[/path]`)
    /// into a URL under the gateway base.
    pub fn gateway_url(&self, pointer: &str) -> Result<Url, FetchError> {
        let content_path = pointer
            .strip_prefix(IPFS_SCHEME)
            .ok_or_else(|| FetchError::UnsupportedScheme(pointer.to_string()))?;
        let content_path = content_path.strip_prefix("ipfs/").unwrap_or(content_path);
        let cid = content_path.split(['/', '?', '#']).next().unwrap_or_default();
        if cid.is_empty() {
            return Err(FetchError::MalformedPointer(pointer.to_string()));
        }

        let url = self
            .gateway
            .join(content_path)
            .map_err(|_| FetchError::MalformedPointer(pointer.to_string()))?;
        if !url.as_str().starts_with(self.gateway.as_str()) {
            return Err(FetchError::MalformedPointer(pointer.to_string()));
        }
        Ok(url)
    }

    pub async fn fetch_json(&self, pointer: &str) -> Result<serde_json::Value, FetchError> {
        let url = self.gateway_url(pointer)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn fetch(&self, pointer: &str) -> Result<ExternalDocument, FetchError> {
        let value = self.fetch_json(pointer).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Never fails: every failure degrades to `defaults`, field by field.
    #[instrument(skip(self, defaults), level = "debug")]
    pub async fn resolve(
        &self,
        pointer: Option<&str>,
        defaults: DocumentDefaults,
    ) -> FetchedDocument {
        let document = match pointer {
            Some(pointer) => self.fetch(pointer).await,
            None => Err(FetchError::Absent),
        };
        match document {
            Ok(document) => self.merge(document, defaults),
            Err(FetchError::Absent) => {
                tracing::debug!("token has no metadata pointer, using defaults");
                FetchedDocument::fallback(defaults)
            }
            Err(err) => {
                tracing::warn!(
                    pointer = ?pointer,
                    error = %err,
                    "failed to fetch metadata document, using defaults"
                );
                FetchedDocument::fallback(defaults)
            }
        }
    }

    fn merge(&self, document: ExternalDocument, defaults: DocumentDefaults) -> FetchedDocument {
        let image = non_empty(document.image).map(|image| {
            if image.starts_with(IPFS_SCHEME) {
                self.gateway_url(&image).map(String::from).unwrap_or(image)
            } else {
                image
            }
        });
        FetchedDocument {
            name: non_empty(document.name).unwrap_or(defaults.name),
            description: non_empty(document.description).unwrap_or(defaults.description),
            image,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn defaults() -> DocumentDefaults {
        DocumentDefaults {
            name: "Realife NFT #42".into(),
            description: "Dynamic NFT metadata powered by Realife".into(),
        }
    }

    fn fetcher(base: &str) -> MetadataFetcher {
        MetadataFetcher::new(&GatewaySettings {
            base_url: base.parse().unwrap(),
            request_timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    async fn gateway_serving(route: &str, response: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(&server)
            .await;
        server
    }

    #[test]
    fn translate_pointers() {
        let fetcher = fetcher("https://gateway.pinata.cloud/ipfs");
        let cases = [
            ("ipfs://QmHash", "https://gateway.pinata.cloud/ipfs/QmHash"),
            (
                "ipfs://QmHash/42.json",
                "https://gateway.pinata.cloud/ipfs/QmHash/42.json",
            ),
            (
                "ipfs://ipfs/QmHash/42.json",
                "https://gateway.pinata.cloud/ipfs/QmHash/42.json",
            ),
        ];
        for (pointer, expected) in cases {
            assert_eq!(fetcher.gateway_url(pointer).unwrap().as_str(), expected);
        }
    }

    #[test]
    fn reject_foreign_pointers() {
        let fetcher = fetcher("https://gateway.pinata.cloud/ipfs/");
        for pointer in ["https://example.com/42.json", "ar://abc", "QmHash", ""] {
            assert!(
                matches!(
                    fetcher.gateway_url(pointer),
                    Err(FetchError::UnsupportedScheme(_))
                ),
                "{pointer} should be unsupported"
            );
        }
        for pointer in ["ipfs://", "ipfs:///42.json", "ipfs://ipfs/", "ipfs://../../etc"] {
            assert!(
                matches!(
                    fetcher.gateway_url(pointer),
                    Err(FetchError::MalformedPointer(_))
                ),
                "{pointer} should be malformed"
            );
        }
    }

    #[tokio::test]
    async fn resolve_full_document() {
        let server = gateway_serving(
            "/ipfs/QmHash/42.json",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Sunset",
                "description": "A sunset over the sea",
                "image": "ipfs://QmImage/sunset.png",
                "attributes": [{"trait_type": "Color", "value": "Orange"}]
            })),
        )
        .await;
        let fetcher = fetcher(&format!("{}/ipfs/", server.uri()));

        let document = fetcher
            .resolve(Some("ipfs://QmHash/42.json"), defaults())
            .await;
        assert_eq!(
            document,
            FetchedDocument {
                name: "Sunset".into(),
                description: "A sunset over the sea".into(),
                image: Some(format!("{}/ipfs/QmImage/sunset.png", server.uri())),
            }
        );
    }

    #[tokio::test]
    async fn resolve_partial_document() {
        let server = gateway_serving(
            "/ipfs/QmHash",
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "",
                "image": "https://cdn.example.com/1.png"
            })),
        )
        .await;
        let fetcher = fetcher(&format!("{}/ipfs/", server.uri()));

        let document = fetcher.resolve(Some("ipfs://QmHash"), defaults()).await;
        assert_eq!(
            document,
            FetchedDocument {
                name: defaults().name,
                description: defaults().description,
                image: Some("https://cdn.example.com/1.png".into()),
            }
        );
    }

    #[tokio::test]
    async fn degraded_fetch_falls_back_to_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ipfs/QmMissing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ipfs/QmBroken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ipfs/QmSlow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"name": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
        let fetcher = fetcher(&format!("{}/ipfs/", server.uri()));

        let pointers = [
            None,
            Some("ipfs://QmMissing"),
            Some("ipfs://QmBroken"),
            Some("ipfs://QmSlow"),
            Some("https://example.com/42.json"),
        ];
        for pointer in pointers {
            let document = fetcher.resolve(pointer, defaults()).await;
            assert_eq!(
                document,
                FetchedDocument::fallback(defaults()),
                "pointer {pointer:?}"
            );
        }
    }

    #[tokio::test]
    async fn fetch_reports_error_kind() {
        let server = gateway_serving("/ipfs/QmMissing", ResponseTemplate::new(404)).await;
        let fetcher = fetcher(&format!("{}/ipfs/", server.uri()));

        let err = fetcher.fetch("ipfs://QmMissing").await.unwrap_err();
        assert!(
            matches!(err, FetchError::Status(status) if status == reqwest::StatusCode::NOT_FOUND)
        );
    }
}
