use crate::{fetcher::IPFS_SCHEME, settings::PinningSettings};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Content identifier assigned by the pinning service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ipfs://<cid>` pointer suitable for `tokenURI`.
    pub fn to_pointer(&self) -> String {
        format!("{IPFS_SCHEME}{}", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum PinningError {
    #[error("content is empty")]
    EmptyContent,
    #[error("invalid pinning api url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("pinning request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("pinning service responded with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("pinning service response has no content id")]
    MissingContentId,
}

/// Client of a Pinata-compatible pinning API.
pub struct PinningClient {
    client: reqwest::Client,
    pin_file_url: Url,
    pin_json_url: Url,
    jwt: String,
}

impl PinningClient {
    pub fn new(settings: &PinningSettings) -> Result<Self, PinningError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        let mut api_url = settings.api_url.clone();
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(Self {
            client,
            pin_file_url: api_url.join("pinning/pinFileToIPFS")?,
            pin_json_url: api_url.join("pinning/pinJSONToIPFS")?,
            jwt: settings.jwt.clone(),
        })
    }

    pub async fn store_file(
        &self,
        content: Vec<u8>,
        filename: &str,
    ) -> Result<ContentId, PinningError> {
        if content.is_empty() {
            return Err(PinningError::EmptyContent);
        }
        let form = Form::new().part("file", Part::bytes(content).file_name(filename.to_string()));
        let request = self.client.post(self.pin_file_url.clone()).multipart(form);
        self.send(request).await
    }

    pub async fn store_json(
        &self,
        content: &serde_json::Value,
        name: Option<&str>,
    ) -> Result<ContentId, PinningError> {
        let body = json::PinJsonRequest {
            pinata_content: content,
            pinata_metadata: name.map(|name| json::PinMetadata { name }),
        };
        let request = self.client.post(self.pin_json_url.clone()).json(&body);
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ContentId, PinningError> {
        let response = request.bearer_auth(&self.jwt).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PinningError::Status { status, body });
        }
        let response: json::PinResponse = response.json().await?;
        response
            .ipfs_hash
            .filter(|hash| !hash.is_empty())
            .map(ContentId)
            .ok_or(PinningError::MissingContentId)
    }
}

mod json {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PinJsonRequest<'a> {
        pub pinata_content: &'a serde_json::Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub pinata_metadata: Option<PinMetadata<'a>>,
    }

    #[derive(Debug, Serialize)]
    pub struct PinMetadata<'a> {
        pub name: &'a str,
    }

    #[derive(Debug, Deserialize)]
    pub struct PinResponse {
        #[serde(rename = "IpfsHash")]
        pub ipfs_hash: Option<String>,
    }
}
