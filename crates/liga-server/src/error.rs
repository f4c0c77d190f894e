use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use liga_core::ValidationErrors;
use liga_live::SubscribeError;
use liga_store::StoreError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with, mapped onto HTTP in `into_response`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Live(#[from] SubscribeError),

    #[error("invalid payload")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("unauthorized: set 'Authorization: Bearer <admin token>'")]
    Unauthorized,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Store(e) => match e {
                StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                StoreError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                StoreError::NoTournament => (StatusCode::BAD_REQUEST, "NO_TOURNAMENT"),
                StoreError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            },
            ApiError::Live(e) => (StatusCode::SERVICE_UNAVAILABLE, e.code()),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let (message, errors) = match self {
            ApiError::Store(StoreError::Database(e)) => {
                error!("database error: {e}");
                ("internal database error".to_string(), None)
            }
            ApiError::Validation(v) => ("invalid payload".to_string(), Some(v.errors)),
            other => (other.to_string(), None),
        };
        let body = ErrorBody {
            error: message,
            code,
            errors,
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::from(StoreError::not_found("team", 3)), StatusCode::NOT_FOUND),
            (ApiError::from(StoreError::Conflict("dup".into())), StatusCode::CONFLICT),
            (ApiError::from(StoreError::NoTournament), StatusCode::BAD_REQUEST),
            (
                ApiError::from(SubscribeError::AtCapacity { limit: 100 }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (ApiError::from(SubscribeError::Closed), StatusCode::SERVICE_UNAVAILABLE),
            (ApiError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn capacity_code_is_stable() {
        let err = ApiError::from(SubscribeError::AtCapacity { limit: 1 });
        assert_eq!(err.status_and_code().1, "CAPACITY");
    }
}
