use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use prodstock_api::{message::Message, product::ProductId};
use thiserror::Error;

/// Store-client failures, mapped to the status codes the API has always
/// answered with: read failures are 500, rejected writes are 400, absent
/// update/delete targets are 404.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid product payload: {0}")]
    InvalidPayload(::anyhow::Error),

    #[error("Product not found: {prod_id}")]
    NotFound { prod_id: ProductId },

    #[error("Error retrieving products: {0}")]
    Unavailable(::anyhow::Error),

    #[error("Error saving product: {0}")]
    Write(::anyhow::Error),
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) | Self::Write(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(Message::new(self.to_string()))
    }
}
