//! 核心中间件模块

use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;
use tracing::{info, warn};

use super::error::ErrorResponse;
use crate::app::PRODUCTS_PREFIX;

/// 从请求路径中取出商品 id（`/api/products/{id}` 及其子路径）
fn product_id_from_path(path: &str) -> Option<&str> {
    path.strip_prefix(PRODUCTS_PREFIX)?
        .strip_prefix('/')?
        .split('/')
        .next()
        .filter(|id| !id.is_empty())
}

/// 请求日志中间件，商品相关请求附带商品 id
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let product_id = product_id_from_path(uri.path()).map(str::to_string);
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(req).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();

    match (&product_id, status.is_client_error() || status.is_server_error()) {
        (Some(id), true) => warn!(
            "{} {} - {} - {}ms - product={} - User-Agent: {:?}",
            method, uri, status, elapsed_ms, id, user_agent
        ),
        (Some(id), false) => info!(
            "{} {} - {} - {}ms - product={}",
            method, uri, status, elapsed_ms, id
        ),
        (None, true) => warn!(
            "{} {} - {} - {}ms - User-Agent: {:?}",
            method, uri, status, elapsed_ms, user_agent
        ),
        (None, false) => info!("{} {} - {} - {}ms", method, uri, status, elapsed_ms),
    }

    response
}

/// 为没有响应体的错误响应补上 `{"error": ...}`
///
/// 覆盖路由层的 405、超时层的 408 等框架生成的响应；
/// 已带 `Content-Type` 的响应原样返回。
pub async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_error = status.is_client_error() || status.is_server_error();
    if !is_error || response.headers().contains_key(header::CONTENT_TYPE) {
        return response;
    }

    let message = format!("{}.", status.canonical_reason().unwrap_or("Request failed"));
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    let body = Json(ErrorResponse { error: message })
        .into_response()
        .into_body();

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::to_bytes, body::Body, http::StatusCode};
    use serde_json::Value;

    #[test]
    fn test_product_id_from_path() {
        assert_eq!(product_id_from_path("/api/products/abc"), Some("abc"));
        assert_eq!(product_id_from_path("/api/products/abc/stock"), Some("abc"));
        assert_eq!(product_id_from_path("/api/products"), None);
        assert_eq!(product_id_from_path("/api/products/"), None);
        assert_eq!(product_id_from_path("/api/productsx/abc"), None);
        assert_eq!(product_id_from_path("/health"), None);
    }

    #[tokio::test]
    async fn test_json_error_body_fills_empty_timeout() {
        let response = Response::builder()
            .status(StatusCode::REQUEST_TIMEOUT)
            .header(header::CONTENT_LENGTH, "0")
            .body(Body::empty())
            .unwrap();

        let response = json_error_body(response).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert!(response.headers().get(header::CONTENT_LENGTH).is_none());

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Request Timeout."}));
    }

    #[tokio::test]
    async fn test_json_error_body_keeps_other_responses() {
        let ok = Response::builder()
            .status(StatusCode::NO_CONTENT)
            .body(Body::empty())
            .unwrap();
        let ok = json_error_body(ok).await;
        assert_eq!(ok.status(), StatusCode::NO_CONTENT);
        assert!(ok.headers().get(header::CONTENT_TYPE).is_none());

        let already_json = (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Product name must not be empty.".to_string(),
            }),
        )
            .into_response();
        let already_json = json_error_body(already_json).await;
        let bytes = to_bytes(already_json.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Product name must not be empty.");
    }
}
