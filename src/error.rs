use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::persons::store::StoreError;
use crate::persons::types::{ErrorBody, MissingField, PersonId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{} missing", .0.as_str())]
    MissingField(MissingField),

    #[error("Person '{0}' already exists")]
    DuplicateName(String),

    #[error("malformatted id")]
    MalformattedId,

    #[error("malformed payload")]
    MalformedPayload,

    #[error("{0}")]
    Validation(String),

    #[error("not found")]
    NotFound,

    #[error("person '{0}' not found")]
    PersonMissing(PersonId),

    #[error("unknown endpoint")]
    UnknownEndpoint,

    #[error("Internal error: {0}")]
    Internal(#[source] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_)
            | AppError::DuplicateName(_)
            | AppError::MalformattedId
            | AppError::MalformedPayload
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::PersonMissing(_) | AppError::UnknownEndpoint => {
                StatusCode::NOT_FOUND
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MissingField> for AppError {
    fn from(field: MissingField) -> Self {
        AppError::MissingField(field)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(_) => AppError::Validation(err.to_string()),
            StoreError::NotFound(id) => AppError::PersonMissing(id),
            other => AppError::Internal(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::NotFound => return status.into_response(),
            AppError::Internal(e) => {
                tracing::error!("Unhandled store error: {}", e);
                return (
                    status,
                    Json(ErrorBody {
                        error: "internal server error".to_string(),
                    }),
                )
                    .into_response();
            }
            _ => tracing::warn!("Request rejected ({}): {}", status.as_u16(), self),
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
