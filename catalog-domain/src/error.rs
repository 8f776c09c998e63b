//! 领域层统一错误定义
//!
//! 聚焦契约校验、事件序列化、事件系统与消息投递等最小必要集合，
//! 便于在应用层统一转换为 `DomainError`。
//!
//! 注意：“未找到”属于正常结果，存储操作以 `Option`/`bool` 表达，
//! 不会通过错误返回。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // --- 契约校验 ---
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },

    // --- 事件系统 ---
    #[error("event bus error: {reason}")]
    EventBus { reason: String },

    // --- 消息投递 ---
    #[error("delivery failed: {reason}")]
    Delivery { reason: String },
    #[error("operation cancelled")]
    Cancelled,
}

impl DomainError {
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        DomainError::InvalidValue {
            reason: reason.into(),
        }
    }

    pub fn event_bus(reason: impl Into<String>) -> Self {
        DomainError::EventBus {
            reason: reason.into(),
        }
    }

    pub fn delivery(reason: impl Into<String>) -> Self {
        DomainError::Delivery {
            reason: reason.into(),
        }
    }

    /// 是否为取消（与投递失败区分，取消不参与重试）
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
