use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AnimeError, SheetError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ExternalApiError { service: String, message: String },

    ValidationError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::ExternalApiError { service, message } => {
                write!(f, "{service} error: {message}")
            }
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::ExternalApiError { service, message } => {
                tracing::warn!("{} error: {}", service, message);
                // The raw upstream text is what the dashboard shows.
                (StatusCode::BAD_GATEWAY, message.clone())
            }
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<AnimeError> for ApiError {
    fn from(err: AnimeError) -> Self {
        if let AnimeError::Detail { id, source } = &err
            && source.status() == Some(404)
        {
            return Self::not_found("Anime", id);
        }
        Self::tracker_error(err.to_string())
    }
}

impl From<SheetError> for ApiError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::InvalidRow { .. } => Self::invalid_parameter(),
            SheetError::RowNotFound { .. } => Self::NotFound(err.to_string()),
            SheetError::Fetch { .. } | SheetError::Empty(_) => Self::ExternalApiError {
                service: "Google Sheets".to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    pub fn tracker_error(msg: impl Into<String>) -> Self {
        Self::ExternalApiError {
            service: "Shikimori".to_string(),
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Answer to a missing or malformed navigation parameter.
    #[must_use]
    pub fn invalid_parameter() -> Self {
        Self::ValidationError("Invalid parameter".to_string())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::FetchError;
    use crate::models::SheetKind;

    #[test]
    fn test_error_statuses() {
        let err: ApiError = SheetError::InvalidRow {
            kind: SheetKind::Manga,
            row: 0,
            first: 1,
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err: ApiError = SheetError::RowNotFound {
            kind: SheetKind::Movies,
            row: 99,
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err: ApiError = AnimeError::List(FetchError::Status {
            status: 500,
            body: String::new(),
        })
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);

        let err: ApiError = AnimeError::Detail {
            id: 1,
            source: FetchError::Status {
                status: 404,
                body: String::new(),
            },
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
