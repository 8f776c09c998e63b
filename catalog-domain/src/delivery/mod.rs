//! 消息投递（delivery）
//!
//! 描述投递内容与收件人，并定义外部投递能力的协议。
//! 具体传输（SMTP 或其他）由基础设施实现，不在本 crate 范围内。
//!
mod message;
#[cfg(feature = "eventing")]
mod sender;

pub use message::{MailMessage, Recipient};
#[cfg(feature = "eventing")]
pub use sender::MessageSender;
