//! 商品目录：模型、存储、业务服务与 HTTP 处理器

pub mod error;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub use error::{ProductError, ValidationError};
pub use model::{Product, ProductPatch, RawFields};
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
