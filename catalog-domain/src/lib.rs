//! 目录领域层基础库（catalog-domain）
//!
//! 提供目录应用的核心构件：
//! - 条目抽象（`entity`）与商品模型（`product`）
//! - 并发安全、标识内部分配的键控存储（`store`）
//! - 领域事件（`domain_event`）：不可变事件记录与“条目已加入”事件
//! - 消息投递协议（`delivery`）：消息、收件人与外部投递能力
//! - 事件系统（`eventing`）：总线、处理器、带重试的投递器与定时通知
//!
//! 存储的一致性不依赖投递通道：投递路径上的任何失败都只记录日志，
//! 不会传播回写入调用方。
//!
pub mod delivery;
pub mod domain_event;
pub mod entity;
pub mod error;
#[cfg(feature = "eventing")]
pub mod eventing;
pub mod product;
pub mod store;
