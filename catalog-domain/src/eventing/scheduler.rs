//! 定时通知（NotificationScheduler）
//!
//! 与存储写入无关，按固定间隔调用投递能力，向收件人报告服务仍在运行，
//! 并附带本次会话已运行的时长：
//! - 首次触发在启动后一个完整间隔；
//! - 每次触发仅尝试一次，失败记录日志，下一次触发照常进行；
//! - 取消后立即退出，不会发出不完整的消息。
//!
use crate::delivery::{MailMessage, MessageSender, Recipient};
use crate::error::{DomainError, DomainResult};
use bon::Builder;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

#[derive(Builder)]
pub struct NotificationScheduler {
    sender: Arc<dyn MessageSender>,
    message: MailMessage,
    recipient: Recipient,
    #[builder(default = Duration::from_secs(60 * 60))]
    interval: Duration,
    #[builder(skip)]
    sent: AtomicUsize,
    #[builder(skip)]
    failed: AtomicUsize,
}

impl NotificationScheduler {
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 已成功发出的状态通知数量
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn failed_count(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }

    /// 启动后台任务，返回可用于关闭/等待的句柄；间隔为零时拒绝启动
    pub fn start(self: Arc<Self>, token: CancellationToken) -> DomainResult<SchedulerHandle> {
        if self.interval.is_zero() {
            return Err(DomainError::invalid_value(
                "status notification interval must be greater than zero",
            ));
        }
        let task = tokio::spawn(Self::run(self, token.clone()));
        Ok(SchedulerHandle { token, task: Some(task) })
    }

    async fn run(self: Arc<Self>, token: CancellationToken) {
        let started = Instant::now();
        let mut ticker = time::interval_at(started + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(interval_secs = self.interval.as_secs(), "status notifications scheduled");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => self.tick(&token, started).await,
            }
        }

        tracing::info!(session = ?started.elapsed(), "status notifications stopped");
    }

    async fn tick(&self, token: &CancellationToken, started: Instant) {
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => return,
            r = self.sender.send(&self.message, &self.recipient, token) => r,
        };

        match result {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    message = self.message.body(),
                    session = ?started.elapsed(),
                    "status notification sent"
                );
            }
            Err(err) if err.is_cancelled() => {}
            Err(err) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    recipient = self.recipient.address(),
                    error = %err,
                    "status notification failed"
                );
            }
        }
    }
}

/// 定时任务句柄：用于优雅关闭与等待任务结束
pub struct SchedulerHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// 等待任务结束；任务 panic 时返回对应的 `JoinError`
    pub async fn join(mut self) -> Result<(), JoinError> {
        match self.task.take() {
            Some(task) => task.await.inspect_err(|err| {
                tracing::error!(error = %err, "status notification task terminated abnormally");
            }),
            None => Ok(()),
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
