use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use log::error;
use thiserror::Error;

use crate::db::store::StoreError;
use crate::services::renderer::RenderError;
use crate::services::validator::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    /// A form field failed validation; the message is shown next to the input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Request body fields failed the derive-based checks.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("unsupported QR code type: {0}")]
    UnsupportedType(String),

    #[error("{0}")]
    MalformedPayload(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("access denied: you can only access your own QR codes")]
    Forbidden,

    #[error("QR code not found")]
    NotFound,

    #[error("static QR codes cannot be edited, create a new QR code instead")]
    StaticImmutable,

    #[error("could not allocate a unique short code, please try again")]
    ShortCodeExhausted,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("storage error")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Message safe to hand back to the client.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Store(_) => "Something went wrong while saving, please try again".to_string(),
            AppError::Render(RenderError::Image(_)) => "Failed to render QR code".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidRequest(_)
            | AppError::UnsupportedType(_)
            | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::StaticImmutable | AppError::ShortCodeExhausted => StatusCode::CONFLICT,
            AppError::Render(RenderError::UnsupportedSize(_) | RenderError::Encode(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Render(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("Request failed: {:?}", self);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.user_message()
        }))
    }
}
