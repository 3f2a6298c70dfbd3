//! 商品数据模型

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::error::{ProductError, ValidationError};

/// 宽松类型的输入（通常来自 JSON 请求体）
pub type RawFields = Map<String, Value>;

/// 商品目录中的一个条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
    /// 仓储系统使用的外部编号，未提供时序列化为 null
    pub sku: Option<String>,
}

impl Product {
    /// 校验字段不变量，返回遇到的第一个错误（名称 → 价格 → 库存）
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.price < 0.0 {
            return Err(ValidationError::NegativePrice(self.price));
        }
        if self.stock < 0 {
            return Err(ValidationError::NegativeStock(self.stock));
        }
        Ok(())
    }

    /// 从宽松类型的键值表构建商品
    ///
    /// 缺失的文本字段默认为空串，缺失的价格和库存默认为 0，
    /// 缺失的 `id` 会新生成一个 UUID v4。未知字段被忽略。
    /// 此处不做不变量校验，调用方需要自行调用 [`Product::validate`]。
    pub fn from_raw(raw: &RawFields) -> Result<Self, ProductError> {
        let id = match raw.get("id") {
            None | Some(Value::Null) => Uuid::new_v4().to_string(),
            Some(value) => coerce_text("id", value)?,
        };

        Ok(Self {
            id,
            name: text_or_default(raw, "name")?,
            description: text_or_default(raw, "description")?,
            price: raw
                .get("price")
                .map(|v| coerce_price(v))
                .transpose()?
                .unwrap_or(0.0),
            stock: raw
                .get("stock")
                .map(|v| coerce_stock(v))
                .transpose()?
                .unwrap_or(0),
            category: text_or_default(raw, "category")?,
            sku: raw.get("sku").map(|v| coerce_sku(v)).transpose()?.flatten(),
        })
    }

    /// 应用部分更新，只覆盖补丁中出现的字段
    pub fn apply(&mut self, patch: ProductPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(sku) = patch.sku {
            self.sku = sku;
        }
    }
}

/// 部分更新（PATCH 语义）
///
/// 字段是否出现决定是否覆盖；`sku` 为 `Some(None)` 时表示清空。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub category: Option<String>,
    pub sku: Option<Option<String>>,
}

impl ProductPatch {
    pub fn from_raw(raw: &RawFields) -> Result<Self, ProductError> {
        Ok(Self {
            name: raw.get("name").map(|v| coerce_text("name", v)).transpose()?,
            description: raw
                .get("description")
                .map(|v| coerce_text("description", v))
                .transpose()?,
            price: raw.get("price").map(|v| coerce_price(v)).transpose()?,
            stock: raw.get("stock").map(|v| coerce_stock(v)).transpose()?,
            category: raw
                .get("category")
                .map(|v| coerce_text("category", v))
                .transpose()?,
            sku: raw.get("sku").map(|v| coerce_sku(v)).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn text_or_default(raw: &RawFields, field: &'static str) -> Result<String, ProductError> {
    match raw.get(field) {
        None => Ok(String::new()),
        Some(value) => coerce_text(field, value),
    }
}

fn coerce_text(field: &'static str, value: &Value) -> Result<String, ProductError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        _ => Err(ProductError::conversion(field, "must be a string")),
    }
}

fn coerce_price(value: &Value) -> Result<f64, ProductError> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match price {
        Some(p) if p.is_finite() => Ok(p),
        _ => Err(ProductError::conversion("price", "must be a number")),
    }
}

fn coerce_stock(value: &Value) -> Result<i64, ProductError> {
    let stock = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            // 浮点数向零截断
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    stock.ok_or_else(|| ProductError::conversion("stock", "must be an integer"))
}

fn coerce_sku(value: &Value) -> Result<Option<String>, ProductError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(ProductError::conversion("sku", "must be a string or null")),
    }
}
