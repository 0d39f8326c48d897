use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use foodlens_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Too many requests, slow down")]
    TooManyRequests,

    #[error("Model returned malformed JSON")]
    ModelParse { raw: String },

    #[error("Model returned JSON with an unexpected shape")]
    ModelSchema,

    #[error("Upstream did not answer within {0} ms")]
    UpstreamTimeout(u64),

    #[error("{0}")]
    BadGateway(String),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub status: i64,
    /// Leading part of the model output, only set for `E_MODEL_PARSE`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::ModelParse { .. } | ApiError::ModelSchema | ApiError::BadGateway(_) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "E_BAD_REQUEST",
            ApiError::Unauthorized(_) => "E_UNAUTHORIZED",
            ApiError::PayloadTooLarge(_) => "E_PAYLOAD_TOO_LARGE",
            ApiError::TooManyRequests => "E_TOO_MANY_REQUESTS",
            ApiError::ModelParse { .. } => "E_MODEL_PARSE",
            ApiError::ModelSchema => "E_MODEL_SCHEMA",
            ApiError::UpstreamTimeout(_) => "E_UPSTREAM_TIMEOUT",
            ApiError::BadGateway(_) => "E_UPSTREAM",
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidImage => ApiError::BadRequest(error.to_string()),
            CoreError::ModelParse { snippet } => ApiError::ModelParse { raw: snippet },
            CoreError::ModelSchema => ApiError::ModelSchema,
            CoreError::UpstreamTimeout(ms) => ApiError::UpstreamTimeout(ms),
            CoreError::UpstreamFailure(_) => {
                ApiError::BadGateway("Upstream vision service failed".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let raw = match &self {
            ApiError::ModelParse { raw } => Some(raw.clone()),
            _ => None,
        };

        let error_response = ApiErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            status: status.as_u16() as i64,
            raw,
        };

        let body = serde_json::to_string(&error_response).unwrap_or_else(|_| {
            r#"{"code":"E_INTERNAL_SERVER_ERROR","message":"Failed to serialize error response"}"#
                .to_string()
        });

        axum::response::Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(body.clone().into())
            .unwrap_or_else(|_| axum::response::Response::new(body.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_distinct_statuses() {
        let cases = [
            (CoreError::InvalidImage, StatusCode::BAD_REQUEST, "E_BAD_REQUEST"),
            (
                CoreError::ModelParse {
                    snippet: "oops".to_string(),
                },
                StatusCode::BAD_GATEWAY,
                "E_MODEL_PARSE",
            ),
            (CoreError::ModelSchema, StatusCode::BAD_GATEWAY, "E_MODEL_SCHEMA"),
            (
                CoreError::UpstreamTimeout(20_000),
                StatusCode::GATEWAY_TIMEOUT,
                "E_UPSTREAM_TIMEOUT",
            ),
            (
                CoreError::UpstreamFailure("401".to_string()),
                StatusCode::BAD_GATEWAY,
                "E_UPSTREAM",
            ),
        ];

        for (core, status, code) in cases {
            let api = ApiError::from(core);
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
            assert_ne!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_upstream_failure_detail_is_not_exposed() {
        let api = ApiError::from(CoreError::UpstreamFailure("key=secret".to_string()));
        assert!(!api.to_string().contains("secret"));
    }
}
