use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};

/// 投递内容，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    subject: String,
    body: String,
}

impl MailMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>) -> DomainResult<Self> {
        let subject = subject.into();
        let body = body.into();
        if subject.trim().is_empty() {
            return Err(DomainError::invalid_value("message subject must not be empty"));
        }
        if body.trim().is_empty() {
            return Err(DomainError::invalid_value("message body must not be empty"));
        }
        Ok(Self { subject, body })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// 收件人，创建后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    name: String,
    address: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let address = address.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_value("recipient name must not be empty"));
        }
        if address.trim().is_empty() {
            return Err(DomainError::invalid_value("recipient address must not be empty"));
        }
        Ok(Self { name, address })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}
