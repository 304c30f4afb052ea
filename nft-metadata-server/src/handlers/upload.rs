use crate::ApiError;
use actix_multipart::Multipart;
use actix_web::web;
use futures::TryStreamExt;
use nft_metadata_logic::{ContentId, MetadataFetcher, PinningClient};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const FILE_FIELD: &str = "file";
const DEFAULT_FILENAME: &str = "upload";

pub struct PinningState {
    pub client: Arc<PinningClient>,
    pub fetcher: Arc<MetadataFetcher>,
    pub max_upload_size: usize,
}

#[derive(Debug, Serialize)]
pub struct PinResponse {
    pub cid: ContentId,
    pub uri: String,
    pub gateway_url: Option<String>,
}

impl PinningState {
    fn response(&self, cid: ContentId) -> PinResponse {
        let uri = cid.to_pointer();
        let gateway_url = self.fetcher.gateway_url(&uri).ok().map(String::from);
        PinResponse {
            cid,
            uri,
            gateway_url,
        }
    }
}

struct Upload {
    filename: String,
    content: Vec<u8>,
}

async fn read_upload(payload: &mut Multipart, limit: usize) -> Result<Upload, ApiError> {
    let malformed = |err: actix_multipart::MultipartError| ApiError::BadRequest(err.to_string());

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let filename = field
            .content_disposition()
            .get_filename()
            .map(str::to_string);
        if field.name() != FILE_FIELD && filename.is_none() {
            continue;
        }

        let mut content = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if content.len() + chunk.len() > limit {
                return Err(ApiError::PayloadTooLarge { limit });
            }
            content.extend_from_slice(&chunk);
        }
        return Ok(Upload {
            filename: filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            content,
        });
    }

    Err(ApiError::BadRequest("no file in multipart form".to_string()))
}

pub async fn upload_file(
    state: web::Data<PinningState>,
    mut payload: Multipart,
) -> Result<web::Json<PinResponse>, ApiError> {
    let upload = read_upload(&mut payload, state.max_upload_size).await?;
    let size = upload.content.len();
    let cid = state
        .client
        .store_file(upload.content, &upload.filename)
        .await
        .map_err(|err| {
            tracing::error!(filename = %upload.filename, error = ?err, "failed to pin file");
            ApiError::from(err)
        })?;
    tracing::info!(%cid, size, "pinned file");
    Ok(web::Json(state.response(cid)))
}

#[derive(Debug, Deserialize)]
pub struct UploadJsonQuery {
    pub name: Option<String>,
}

pub async fn upload_json(
    state: web::Data<PinningState>,
    query: web::Query<UploadJsonQuery>,
    body: web::Json<serde_json::Value>,
) -> Result<web::Json<PinResponse>, ApiError> {
    let content = body.into_inner();
    if !content.is_object() {
        return Err(ApiError::BadRequest(
            "json document must be an object".to_string(),
        ));
    }
    let cid = state
        .client
        .store_json(&content, query.name.as_deref())
        .await
        .map_err(|err| {
            tracing::error!(error = ?err, "failed to pin json document");
            ApiError::from(err)
        })?;
    tracing::info!(%cid, "pinned json document");
    Ok(web::Json(state.response(cid)))
}
