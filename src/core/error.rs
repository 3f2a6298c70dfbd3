//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

use crate::app::product::error::ProductError;

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    BadRequest(String),
    NotFound(String),
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl CoreError {
    pub fn product_not_found(id: &str) -> Self {
        CoreError::NotFound(format!("Product '{}' not found.", id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<ProductError> for CoreError {
    fn from(err: ProductError) -> Self {
        // 领域错误统一映射为 400
        CoreError::BadRequest(err.to_string())
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            CoreError::BadRequest(msg) | CoreError::NotFound(msg) => msg,
        };
        debug!("请求失败: {} - {}", status, message);

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::error::ValidationError;

    #[test]
    fn test_domain_errors_map_to_bad_request() {
        let errors = [
            ProductError::Validation(ValidationError::EmptyName),
            ProductError::InsufficientStock {
                current: 1,
                requested: -2,
            },
            ProductError::TypeConversion {
                field: "price",
                reason: "must be a number".to_string(),
            },
        ];
        for err in errors {
            assert_eq!(CoreError::from(err).status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = CoreError::product_not_found("abc");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        match err {
            CoreError::NotFound(msg) => assert_eq!(msg, "Product 'abc' not found."),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
