use catalog_domain::entity::{CatalogItem, ItemId};
use catalog_domain::product::Product;
use serde::{Deserialize, Serialize};

/// 新建商品请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductToCreate {
    pub title: String,
    pub image: Option<String>,
}

/// 更新商品请求（标识由路径给出，请求体不含标识）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductToUpdate {
    pub title: String,
    pub image: Option<String>,
}

/// 商品查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: ItemId,
    pub title: String,
    pub image: Option<String>,
}

impl From<ProductToCreate> for Product {
    fn from(req: ProductToCreate) -> Self {
        Product::new(req.title, req.image)
    }
}

impl From<ProductToUpdate> for Product {
    fn from(req: ProductToUpdate) -> Self {
        Product::new(req.title, req.image)
    }
}

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id(),
            title: p.title().to_string(),
            image: p.image().map(str::to_string),
        }
    }
}
