use super::{MailMessage, Recipient};
use crate::error::DomainResult;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// 外部投递能力：向收件人发送一条消息
///
/// - 返回 `Err(DomainError::Delivery)` 表示可重试的瞬时失败；
/// - 实现方应在 `cancel` 触发时尽快返回 `Err(DomainError::Cancelled)`。
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(
        &self,
        message: &MailMessage,
        recipient: &Recipient,
        cancel: &CancellationToken,
    ) -> DomainResult<()>;
}
