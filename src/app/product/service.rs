//! 商品业务服务

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::ProductError;
use super::model::{Product, ProductPatch, RawFields};
use super::repository::{InMemoryProductRepository, ProductRepository};

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// 使用进程内存作为存储
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductRepository::new()))
    }

    /// 列出全部商品；给出非空分类时按分类过滤（忽略大小写）
    pub fn list(&self, category: Option<&str>) -> Vec<Product> {
        let products = self.repository.all();
        match category.filter(|c| !c.is_empty()) {
            Some(category) => {
                let category = category.to_lowercase();
                products
                    .into_iter()
                    .filter(|p| p.category.to_lowercase() == category)
                    .collect()
            }
            None => products,
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<Product> {
        self.repository.get(id)
    }

    /// 名称或描述中包含 `query` 的商品（忽略大小写的子串匹配）
    pub fn search(&self, query: &str) -> Vec<Product> {
        let query = query.to_lowercase();
        self.repository
            .all()
            .into_iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// 创建商品
    ///
    /// 总是分配新的 id，请求中携带的 `id` 会被忽略。
    /// 校验失败时不会写入任何数据。
    pub fn create(&self, raw: &RawFields) -> Result<Product, ProductError> {
        let mut product = Product::from_raw(raw)?;
        product.id = Uuid::new_v4().to_string();

        if let Err(err) = product.validate() {
            warn!("商品创建被拒绝: field={}, {}", err.field(), err);
            return Err(err.into());
        }

        self.repository.insert(product.clone());
        info!("商品已创建: id={}, name={}", product.id, product.name);
        Ok(product)
    }

    /// 部分更新
    ///
    /// 在副本上应用补丁并校验，校验通过才写回，失败时存储保持不变。
    /// id 不存在时返回 `Ok(None)`。
    pub fn update(&self, id: &str, patch: ProductPatch) -> Result<Option<Product>, ProductError> {
        if patch.is_empty() {
            debug!("更新补丁不含任何字段: id={}", id);
        }
        let updated = self.repository.modify(id, &mut |current| {
            let mut candidate = current.clone();
            candidate.apply(patch.clone());
            candidate.validate()?;
            Ok(candidate)
        });

        match &updated {
            Ok(Some(product)) => info!("商品已更新: id={}", product.id),
            Ok(None) => debug!("更新的商品不存在: id={}", id),
            Err(ProductError::Validation(err)) => {
                warn!("商品更新被拒绝: id={}, field={}, {}", id, err.field(), err)
            }
            Err(err) => warn!("商品更新被拒绝: id={}, {}", id, err),
        }
        updated
    }

    pub fn delete(&self, id: &str) -> bool {
        let removed = self.repository.remove(id);
        if removed {
            info!("商品已删除: id={}", id);
        }
        removed
    }

    /// 调整库存，`delta` 为正表示补货，为负表示出库
    ///
    /// 调整后库存为负时返回 [`ProductError::InsufficientStock`]，库存不变。
    pub fn adjust_stock(&self, id: &str, delta: i64) -> Result<Option<Product>, ProductError> {
        let adjusted = self.repository.modify(id, &mut |current| {
            let new_stock =
                current
                    .stock
                    .checked_add(delta)
                    .ok_or(ProductError::StockOverflow {
                        current: current.stock,
                        requested: delta,
                    })?;
            if new_stock < 0 {
                return Err(ProductError::InsufficientStock {
                    current: current.stock,
                    requested: delta,
                });
            }
            let mut candidate = current.clone();
            candidate.stock = new_stock;
            Ok(candidate)
        });

        match &adjusted {
            Ok(Some(product)) => info!(
                "库存已调整: id={}, delta={}, stock={}",
                product.id, delta, product.stock
            ),
            Ok(None) => debug!("调整库存的商品不存在: id={}", id),
            Err(err) => warn!("库存调整被拒绝: id={}, {}", id, err),
        }
        adjusted
    }

    pub fn count(&self) -> usize {
        self.repository.len()
    }

    /// 预置演示数据，返回写入的商品数量
    pub fn seed_sample_data(&self) -> Result<usize, ProductError> {
        let samples = [
            json!({
                "name": "Widget Pro",
                "description": "A great widget",
                "price": 9.99,
                "stock": 100,
                "category": "Widgets",
                "sku": "WGT-PRO-001"
            }),
            json!({
                "name": "Mechanical Keyboard",
                "description": "Tactile switches, full size layout",
                "price": 79.0,
                "stock": 25,
                "category": "Electronics"
            }),
            json!({
                "name": "Coffee Mug",
                "description": "Ceramic, 350ml",
                "price": 6.5,
                "stock": 240,
                "category": "Kitchen"
            }),
        ];

        let mut created = 0;
        for sample in samples {
            if let serde_json::Value::Object(raw) = sample {
                self.create(&raw)?;
                created += 1;
            }
        }
        info!("✅ 已初始化 {} 个示例商品", created);
        Ok(created)
    }
}
