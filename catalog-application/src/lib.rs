//! 目录应用层（catalog-application）
//!
//! 在领域构件之上提供：
//! - `Catalog`：存储写入与 `ItemAdded` 事件发布；
//! - `ProductService`：商品用例入口；
//! - `ProductAddedHandler`：商品新增后的带重试通知；
//! - `NotificationConfig` / `NotificationRuntime`：配置加载与后台任务装配。
//!
pub mod catalog;
pub mod config;
pub mod dto;
pub mod error;
pub mod notification;
pub mod product_service;
pub mod runtime;

pub use catalog::Catalog;
pub use config::NotificationConfig;
pub use product_service::ProductService;
pub use runtime::NotificationRuntime;
