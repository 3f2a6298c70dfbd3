//! 业务模块与路由组装

pub mod product;

use std::time::Duration;

use axum::{
    middleware,
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::core::middleware::{json_error_body, request_logging_middleware};
use crate::infrastructure::config::HttpConfig;
use product::handler::{self, AppState};

/// 商品接口统一前缀
pub const PRODUCTS_PREFIX: &str = "/api/products";

/// 商品路由；集合路径同时接受带和不带结尾斜杠的形式
fn product_routes() -> Router<AppState> {
    let collection = || get(handler::list_products).post(handler::create_product);

    Router::new()
        .route(PRODUCTS_PREFIX, collection())
        .route(&format!("{}/", PRODUCTS_PREFIX), collection())
        .route(
            &format!("{}/:id", PRODUCTS_PREFIX),
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
        .route(
            &format!("{}/:id/stock", PRODUCTS_PREFIX),
            patch(handler::adjust_stock),
        )
}

/// 不带中间件的路由
pub fn router(state: AppState) -> Router {
    product_routes()
        .route("/health", get(handler::health_check))
        .fallback(handler::not_found)
        .with_state(state)
}

/// 完整应用：路由 + 日志、追踪、错误响应体、超时、CORS 中间件
///
/// `json_error_body` 位于超时层之外，超时产生的 408 也会带上 JSON 错误体。
pub fn build_app(state: AppState, config: &HttpConfig) -> Router {
    router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::map_response(json_error_body))
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeout_seconds)))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
    )
}
