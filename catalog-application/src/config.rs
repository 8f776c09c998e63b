//! 通知配置（NotificationConfig）
//!
//! 启动时从环境变量读取一次，之后视为不可变。未设置的变量取参考配置：
//! 最多 3 次尝试、退避单位 1 秒、状态通知间隔 1 小时。
//!
use catalog_domain::delivery::{MailMessage, Recipient};
use catalog_domain::error::DomainError;
use catalog_domain::eventing::RetryPolicy;
use std::str::FromStr;
use std::time::Duration;

pub const RETRY_MAX_ATTEMPTS: &str = "CATALOG_RETRY_MAX_ATTEMPTS";
pub const RETRY_BACKOFF_UNIT_MS: &str = "CATALOG_RETRY_BACKOFF_UNIT_MS";
pub const STATUS_INTERVAL_SECS: &str = "CATALOG_STATUS_INTERVAL_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("invalid notification template: {0}")]
    Template(#[from] DomainError),
}

/// 一条固定通知：收件人与内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplate {
    pub recipient: Recipient,
    pub message: MailMessage,
}

#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// 商品新增通知的重试策略
    pub retry: RetryPolicy,
    /// 服务状态通知的间隔
    pub status_interval: Duration,
    /// 商品新增时发送的通知
    pub product_added: NotificationTemplate,
    /// 定时发送的服务状态通知
    pub server_status: NotificationTemplate,
}

impl NotificationConfig {
    /// 从进程环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置，未提供的键使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_attempts: u32 = parse_or(&lookup, RETRY_MAX_ATTEMPTS, 3)?;
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                var: RETRY_MAX_ATTEMPTS,
                reason: "must be at least 1".into(),
            });
        }
        let backoff_unit_ms: u64 = parse_or(&lookup, RETRY_BACKOFF_UNIT_MS, 1_000)?;
        let status_interval_secs: u64 = parse_or(&lookup, STATUS_INTERVAL_SECS, 60 * 60)?;
        if status_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                var: STATUS_INTERVAL_SECS,
                reason: "must be greater than zero".into(),
            });
        }

        let retry = RetryPolicy::builder()
            .max_attempts(max_attempts)
            .backoff_unit(Duration::from_millis(backoff_unit_ms))
            .build();

        let product_added = template(
            &lookup,
            "CATALOG_PRODUCT_ADDED",
            ("Catalog Admin", "admin@localhost"),
            ("Product added", "A new product was added to the catalog."),
        )?;
        let server_status = template(
            &lookup,
            "CATALOG_STATUS",
            ("Catalog Admin", "admin@localhost"),
            ("Server status", "Server is running"),
        )?;

        Ok(Self {
            retry,
            status_interval: Duration::from_secs(status_interval_secs),
            product_added,
            server_status,
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

fn template<F>(
    lookup: &F,
    prefix: &str,
    (default_name, default_address): (&str, &str),
    (default_subject, default_body): (&str, &str),
) -> Result<NotificationTemplate, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |suffix: &str, default: &str| {
        lookup(&format!("{prefix}_{suffix}")).unwrap_or_else(|| default.to_string())
    };

    Ok(NotificationTemplate {
        recipient: Recipient::new(
            get("RECIPIENT_NAME", default_name),
            get("RECIPIENT_ADDRESS", default_address),
        )?,
        message: MailMessage::new(get("SUBJECT", default_subject), get("BODY", default_body))?,
    })
}
