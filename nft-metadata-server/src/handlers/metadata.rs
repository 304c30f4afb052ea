use crate::ApiError;
use actix_web::{
    http::header::{CacheControl, CacheDirective},
    web, HttpResponse,
};
use nft_metadata_logic::{MetadataResolver, TokenId};
use tracing::instrument;

#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub max_age: u32,
}

#[instrument(skip_all, fields(token_id = %token_id), level = "debug")]
pub async fn metadata(
    resolver: web::Data<MetadataResolver>,
    cache: web::Data<CachePolicy>,
    token_id: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let token_id: TokenId = token_id.parse()?;
    let metadata = resolver.resolve(token_id).await.map_err(|err| {
        tracing::error!(%token_id, error = ?err, "failed to resolve token metadata");
        ApiError::from(err)
    })?;

    Ok(HttpResponse::Ok()
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(cache.max_age),
        ]))
        .json(metadata))
}
