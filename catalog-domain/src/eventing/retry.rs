//! 重试策略（RetryPolicy）
//!
//! 第 n 次（从 1 开始）失败后等待 `backoff_unit * n²` 再发起下一次尝试，
//! 即 1、4、9… 个时间单位：超线性但有上限，而非倍增式指数退避。
//! 首次尝试总会发生：`max_attempts` 小于 1 时按 1 处理。
//!
use bon::bon;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl RetryPolicy {
    /// - `max_attempts`：最多尝试次数（含首次）
    /// - `backoff_unit`：退避时间单位
    #[builder]
    pub fn new(
        #[builder(default = 3)] max_attempts: u32,
        #[builder(default = Duration::from_secs(1))] backoff_unit: Duration,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff_unit,
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff_unit(&self) -> Duration {
        self.backoff_unit
    }

    /// 第 `attempt` 次尝试失败后的等待时长
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt.saturating_mul(attempt))
    }

    /// 第 `attempt` 次尝试失败后是否还允许重试
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
