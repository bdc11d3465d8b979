use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::guard::AccessError;
use crate::store::StoreError;

/// Everything a route can answer with besides success. Each variant is
/// final for the request: nothing is retried.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("data not found")]
    NotFound,
    #[error("invalid data")]
    BadRequest,
    #[error("not found")]
    NoRoute,
    #[error("method not allowed")]
    WrongMethod,
    #[error("internal server error")]
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Access(AccessError::Forbidden) => StatusCode::FORBIDDEN,
            ApiError::Access(AccessError::KeyRequired) => StatusCode::BAD_REQUEST,
            ApiError::Access(AccessError::KeyInvalid) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound | ApiError::NoRoute => StatusCode::NOT_FOUND,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::WrongMethod => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_and_codes() {
        let cases = [
            (ApiError::from(AccessError::Forbidden), 403, "forbidden"),
            (ApiError::from(AccessError::KeyRequired), 400, "api key required"),
            (ApiError::from(AccessError::KeyInvalid), 401, "invalid api key"),
            (ApiError::from(StoreError::NotFound("x".into())), 404, "data not found"),
            (ApiError::BadRequest, 400, "invalid data"),
            (ApiError::WrongMethod, 405, "method not allowed"),
            (ApiError::Internal, 500, "internal server error"),
        ];
        for (err, code, message) in cases {
            assert_eq!(err.status().as_u16(), code);
            assert_eq!(err.to_string(), message);
        }
    }
}
