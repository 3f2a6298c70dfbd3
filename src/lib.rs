//! # 商品目录微服务
//!
//! 基于 Axum 的电商商品 CRUD 服务，商品保存在进程内存中：
//! - 创建、查询、更新、删除商品
//! - 按分类过滤与关键字搜索
//! - 库存调整

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::product::{Product, ProductError, ProductPatch, ProductService};
pub use app::{build_app, router};
