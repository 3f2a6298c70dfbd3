//! 商品存储

use std::collections::HashMap;

use parking_lot::RwLock;

use super::error::ProductError;
use super::model::Product;

/// 商品存储接口
///
/// 所有方法都是同步的；实现需要自行保证并发安全。
pub trait ProductRepository: Send + Sync {
    /// 按插入顺序返回全部商品
    fn all(&self) -> Vec<Product>;

    fn get(&self, id: &str) -> Option<Product>;

    /// 插入商品，若 id 已存在则覆盖并保留原有位置
    fn insert(&self, product: Product);

    fn remove(&self, id: &str) -> bool;

    /// 原子地读-改-写单个商品
    ///
    /// `change` 基于当前值计算新值，返回 `Ok` 才会写回；
    /// 返回 `Err` 时存储保持不变。id 不存在时返回 `Ok(None)`。
    fn modify(
        &self,
        id: &str,
        change: &mut dyn FnMut(&Product) -> Result<Product, ProductError>,
    ) -> Result<Option<Product>, ProductError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct Entry {
    seq: u64,
    product: Product,
}

#[derive(Default)]
struct Inner {
    next_seq: u64,
    entries: HashMap<String, Entry>,
}

/// 基于内存 HashMap 的存储，读写锁保护
#[derive(Default)]
pub struct InMemoryProductRepository {
    inner: RwLock<Inner>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn all(&self) -> Vec<Product> {
        let inner = self.inner.read();
        let mut entries: Vec<&Entry> = inner.entries.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.product.clone()).collect()
    }

    fn get(&self, id: &str) -> Option<Product> {
        self.inner
            .read()
            .entries
            .get(id)
            .map(|entry| entry.product.clone())
    }

    fn insert(&self, product: Product) {
        let mut inner = self.inner.write();
        if let Some(entry) = inner.entries.get_mut(&product.id) {
            entry.product = product;
            return;
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner
            .entries
            .insert(product.id.clone(), Entry { seq, product });
    }

    fn remove(&self, id: &str) -> bool {
        self.inner.write().entries.remove(id).is_some()
    }

    fn modify(
        &self,
        id: &str,
        change: &mut dyn FnMut(&Product) -> Result<Product, ProductError>,
    ) -> Result<Option<Product>, ProductError> {
        let mut inner = self.inner.write();
        let Some(entry) = inner.entries.get_mut(id) else {
            return Ok(None);
        };
        let updated = change(&entry.product)?;
        entry.product = updated.clone();
        Ok(Some(updated))
    }

    fn len(&self) -> usize {
        self.inner.read().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price: 1.0,
            stock: 0,
            category: String::new(),
            sku: None,
        }
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let repo = InMemoryProductRepository::new();
        for id in ["c", "a", "b"] {
            repo.insert(product(id, id));
        }
        // 覆盖已有条目不改变顺序
        repo.insert(product("c", "renamed"));

        let ids: Vec<String> = repo.all().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(repo.get("c").unwrap().name, "renamed");
    }

    #[test]
    fn test_remove() {
        let repo = InMemoryProductRepository::new();
        repo.insert(product("a", "A"));
        assert!(repo.remove("a"));
        assert!(!repo.remove("a"));
        assert!(repo.is_empty());
    }

    #[test]
    fn test_modify_leaves_value_on_error() {
        let repo = InMemoryProductRepository::new();
        repo.insert(product("a", "A"));

        let result = repo.modify("a", &mut |_| {
            Err(ProductError::InsufficientStock {
                current: 0,
                requested: -1,
            })
        });
        assert!(result.is_err());
        assert_eq!(repo.get("a").unwrap().name, "A");

        let missing = repo.modify("missing", &mut |p| Ok(p.clone())).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_concurrent_modify() {
        let repo = Arc::new(InMemoryProductRepository::new());
        repo.insert(product("a", "A"));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for _ in 0..250 {
                        repo.modify("a", &mut |p| {
                            let mut next = p.clone();
                            next.stock += 1;
                            Ok(next)
                        })
                        .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(repo.get("a").unwrap().stock, 1000);
    }
}
