use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use nft_metadata_logic::{PinningError, ResolveError, TokenIdParseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
    #[error("pinning service is unavailable")]
    Pinning(#[source] PinningError),
    #[error("internal server error")]
    Internal(#[source] anyhow::Error),
}

impl From<TokenIdParseError> for ApiError {
    fn from(err: TokenIdParseError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self::Internal(err.into())
    }
}

impl From<PinningError> for ApiError {
    fn from(err: PinningError) -> Self {
        match err {
            PinningError::EmptyContent => Self::BadRequest(err.to_string()),
            err => Self::Pinning(err),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Pinning(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // only the top-level message is exposed, sources stay in the logs
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}
