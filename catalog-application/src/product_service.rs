//! 商品服务（ProductService）
//!
//! 面向接口层的用例入口：DTO 与领域模型互转、契约校验与日志。
//! “未找到”以 `Option`/`bool` 返回，不视为错误。
//!
use crate::catalog::Catalog;
use crate::dto::{ProductResponse, ProductToCreate, ProductToUpdate};
use crate::error::{AppError, AppResult};
use catalog_domain::entity::ItemId;
use catalog_domain::error::DomainError;
use catalog_domain::product::Product;
use std::sync::Arc;

#[derive(Clone)]
pub struct ProductService {
    catalog: Arc<Catalog<Product>>,
}

impl ProductService {
    pub fn new(catalog: Arc<Catalog<Product>>) -> Self {
        Self { catalog }
    }

    pub fn add(&self, req: ProductToCreate) -> AppResult<ProductResponse> {
        tracing::debug!(?req, "requested addition of product");
        let product = Product::from(req);
        let id = self.catalog.add(product.clone()).map_err(into_validation)?;

        let mut response = ProductResponse::from(&product);
        response.id = id;
        tracing::debug!(id, "product added");
        Ok(response)
    }

    pub fn get(&self, id: ItemId) -> Option<ProductResponse> {
        let found = self.catalog.get(id).map(|p| ProductResponse::from(&p));
        if found.is_none() {
            tracing::debug!(id, "requested product was not found");
        }
        found
    }

    pub fn get_all(&self) -> Vec<ProductResponse> {
        self.catalog.items().iter().map(ProductResponse::from).collect()
    }

    pub fn update(&self, id: ItemId, req: ProductToUpdate) -> AppResult<bool> {
        tracing::debug!(id, ?req, "requested product update");
        let updated = self
            .catalog
            .update(id, Product::from(req))
            .map_err(into_validation)?;
        tracing::debug!(id, updated, "product update finished");
        Ok(updated)
    }

    pub fn remove(&self, id: ItemId) -> bool {
        let removed = self.catalog.remove(id);
        tracing::debug!(id, removed, "product removal finished");
        removed
    }
}

// 领域层的取值违约对调用方而言即请求校验失败
fn into_validation(err: AppError) -> AppError {
    match err {
        AppError::Domain(DomainError::InvalidValue { reason }) => AppError::Validation(reason),
        other => other,
    }
}
