//! 商品 HTTP 处理器

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::model::{Product, ProductPatch, RawFields};
use super::service::ProductService;
use crate::core::error::CoreError;

const INVALID_BODY: &str = "Request body must be valid JSON.";
const QUANTITY_REQUIRED: &str = "'quantity' field is required.";
const QUANTITY_NOT_INTEGER: &str = "'quantity' must be an integer.";

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(product_service: ProductService) -> Self {
        Self { product_service }
    }
}

/// 列表查询参数；`q` 优先于 `category`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// 取出非空 JSON 对象形式的请求体
fn json_object(body: Result<Json<Value>, JsonRejection>) -> Option<RawFields> {
    match body {
        Ok(Json(Value::Object(map))) if !map.is_empty() => Some(map),
        Ok(_) => None,
        Err(rejection) => {
            debug!("请求体解析失败: {}", rejection);
            None
        }
    }
}

fn parse_quantity(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Product>> {
    let products = match query.q.as_deref().filter(|q| !q.is_empty()) {
        Some(q) => state.product_service.search(q),
        None => state.product_service.list(query.category.as_deref()),
    };
    Json(products)
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let raw = json_object(body).ok_or_else(|| CoreError::BadRequest(INVALID_BODY.to_string()))?;
    let product = state.product_service.create(&raw)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    state
        .product_service
        .get_by_id(&id)
        .map(Json)
        .ok_or_else(|| CoreError::product_not_found(&id))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Product>, CoreError> {
    let raw = json_object(body).ok_or_else(|| CoreError::BadRequest(INVALID_BODY.to_string()))?;
    // 未知 id 先于字段类型错误返回 404
    if state.product_service.get_by_id(&id).is_none() {
        return Err(CoreError::product_not_found(&id));
    }
    let patch = ProductPatch::from_raw(&raw)?;

    match state.product_service.update(&id, patch)? {
        Some(product) => Ok(Json(product)),
        None => Err(CoreError::product_not_found(&id)),
    }
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, CoreError> {
    if state.product_service.delete(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::product_not_found(&id))
    }
}

pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Product>, CoreError> {
    let raw = json_object(body).ok_or_else(|| CoreError::BadRequest(QUANTITY_REQUIRED.to_string()))?;
    let quantity = raw
        .get("quantity")
        .ok_or_else(|| CoreError::BadRequest(QUANTITY_REQUIRED.to_string()))?;
    let Some(delta) = parse_quantity(quantity) else {
        warn!("无效的库存调整数量: id={}, quantity={}", id, quantity);
        return Err(CoreError::BadRequest(QUANTITY_NOT_INTEGER.to_string()));
    };

    match state.product_service.adjust_stock(&id, delta)? {
        Some(product) => Ok(Json(product)),
        None => Err(CoreError::product_not_found(&id)),
    }
}

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "products": state.product_service.count(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// 未匹配任何路由
pub async fn not_found() -> CoreError {
    CoreError::NotFound("Resource not found.".to_string())
}
