//! HTTP Error Handling
//!
//! 业务错误统一以 HTTP 200 + errno 返回

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::GenerationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let errno = self.errno();
        let response = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno, error = %msg, "Bad request");
                ErrorResponse::new(errno, msg)
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno, error = %msg, "Service unavailable");
                ErrorResponse::new(errno, msg)
            }
        };

        (StatusCode::OK, Json(response)).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        if e.is_content_error() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::ServiceUnavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AssemblyError;
    use crate::domain::ParseError;

    #[test]
    fn test_generation_error_mapping() {
        let err = ApiError::from(GenerationError::invalid_exercise("question is empty"));
        assert_eq!(err.errno(), errno::BAD_REQUEST);

        let err = ApiError::from(GenerationError::from(ParseError::EmptyInput));
        assert_eq!(err.errno(), errno::BAD_REQUEST);

        let err = ApiError::from(GenerationError::NoSegments { failed: 3 });
        assert_eq!(err.errno(), errno::SERVICE_UNAVAILABLE);

        let err = ApiError::from(GenerationError::from(AssemblyError::NoSegments));
        assert_eq!(err.errno(), errno::SERVICE_UNAVAILABLE);
    }
}
