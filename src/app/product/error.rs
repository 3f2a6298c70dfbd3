//! 商品领域错误

use thiserror::Error;

/// 商品字段不变量校验失败
///
/// 按固定顺序检查：名称 → 价格 → 库存，只报告遇到的第一个错误。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Product name must not be empty.")]
    EmptyName,
    #[error("Product price must be >= 0, got {0}.")]
    NegativePrice(f64),
    #[error("Product stock must be >= 0, got {0}.")]
    NegativeStock(i64),
}

impl ValidationError {
    /// 出错的字段名
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "name",
            ValidationError::NegativePrice(_) => "price",
            ValidationError::NegativeStock(_) => "stock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProductError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("'{field}' {reason}")]
    TypeConversion { field: &'static str, reason: String },
    #[error("Insufficient stock. Current stock: {current}, requested adjustment: {requested}.")]
    InsufficientStock { current: i64, requested: i64 },
    #[error("Stock adjustment overflows. Current stock: {current}, requested adjustment: {requested}.")]
    StockOverflow { current: i64, requested: i64 },
}

impl ProductError {
    pub(crate) fn conversion(field: &'static str, reason: impl Into<String>) -> Self {
        ProductError::TypeConversion {
            field,
            reason: reason.into(),
        }
    }
}
