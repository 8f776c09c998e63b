//! 商品（Product）
//!
use crate::entity::{CatalogItem, ItemId};
use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// 目录中的商品条目
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ItemId,
    title: String,
    image: Option<String>,
}

impl Product {
    /// 创建尚未入库的商品，标识将在入库时分配
    pub fn new(title: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            image,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl CatalogItem for Product {
    fn id(&self) -> ItemId {
        self.id
    }

    fn set_id(&mut self, id: ItemId) {
        self.id = id;
    }

    fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::invalid_value("product title must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        let err = Product::new("   ", None).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvalidValue { .. }));
        assert!(Product::new("Lamp", Some("lamp.png".into())).validate().is_ok());
    }
}
