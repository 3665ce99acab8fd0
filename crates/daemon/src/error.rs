// SPDX-License-Identifier: MIT

//! HTTP-facing error taxonomy. Mirrors `dropjob_engine::RuntimeError` in
//! shape: a concrete enum mapped to a status code, never a bare string.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dropjob_engine::RuntimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<RuntimeError> for HttpError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::UnknownJob(_) | RuntimeError::UnknownRun { .. } | RuntimeError::UnknownTask { .. } => {
                HttpError::NotFound
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self {
            HttpError::Unauthorized => StatusCode::UNAUTHORIZED,
            HttpError::NotFound => StatusCode::NOT_FOUND,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}
