//! 带重试的投递器（RetryingDispatcher）
//!
//! 每次投递的状态流转：
//! - Pending -> 发起尝试；
//! - 成功 -> Delivered（终态）；
//! - 失败且未达上限 -> 按 `RetryPolicy::backoff` 等待后再次尝试；
//! - 失败且已达上限 -> Failed（终态，仅记录一次错误日志）；
//! - 等待或尝试期间收到取消 -> Cancelled（终态，不再尝试）。
//!
//! 投递结果只以返回值与日志体现，永远不会回滚触发它的存储写入。
//!
use super::RetryPolicy;
use crate::delivery::{MailMessage, MessageSender, Recipient};
use crate::error::DomainError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// 一次投递的终态
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { attempts: u32 },
    Failed { attempts: u32, reason: String },
    Cancelled { attempts: u32 },
}

impl DeliveryOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            DeliveryOutcome::Delivered { attempts }
            | DeliveryOutcome::Failed { attempts, .. }
            | DeliveryOutcome::Cancelled { attempts } => *attempts,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

#[derive(Clone)]
pub struct RetryingDispatcher {
    sender: Arc<dyn MessageSender>,
    policy: RetryPolicy,
}

impl RetryingDispatcher {
    pub fn new(sender: Arc<dyn MessageSender>, policy: RetryPolicy) -> Self {
        Self { sender, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// 投递一条消息，直至成功、重试耗尽或被取消
    pub async fn dispatch(
        &self,
        message: &MailMessage,
        recipient: &Recipient,
        cancel: &CancellationToken,
    ) -> DeliveryOutcome {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Self::cancelled(recipient, attempt);
            }

            attempt += 1;
            tracing::debug!(attempt, recipient = recipient.address(), "delivery attempt started");

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(DomainError::Cancelled),
                r = self.sender.send(message, recipient, cancel) => r,
            };

            let err = match result {
                Ok(()) => {
                    tracing::info!(
                        attempt,
                        recipient = recipient.address(),
                        outcome = "delivered",
                        "message delivered"
                    );
                    return DeliveryOutcome::Delivered { attempts: attempt };
                }
                Err(err) if err.is_cancelled() => return Self::cancelled(recipient, attempt),
                Err(err) => err,
            };

            if !self.policy.should_retry(attempt) {
                tracing::error!(
                    attempt,
                    recipient = recipient.address(),
                    error = %err,
                    outcome = "failed",
                    "delivery failed, retries exhausted"
                );
                return DeliveryOutcome::Failed {
                    attempts: attempt,
                    reason: err.to_string(),
                };
            }

            let delay = self.policy.backoff(attempt);
            tracing::warn!(
                attempt,
                recipient = recipient.address(),
                error = %err,
                delay_ms = delay.as_millis() as u64,
                "delivery attempt failed, retrying"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Self::cancelled(recipient, attempt),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn cancelled(recipient: &Recipient, attempts: u32) -> DeliveryOutcome {
        tracing::info!(
            attempts,
            recipient = recipient.address(),
            outcome = "cancelled",
            "delivery cancelled"
        );
        DeliveryOutcome::Cancelled { attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainResult;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    /// 前 `failures` 次失败，之后成功；记录每次尝试的时间点
    struct ScriptedSender {
        failures: usize,
        calls: Mutex<Vec<Instant>>,
    }

    impl ScriptedSender {
        fn failing(failures: usize) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageSender for ScriptedSender {
        async fn send(
            &self,
            _message: &MailMessage,
            _recipient: &Recipient,
            _cancel: &CancellationToken,
        ) -> DomainResult<()> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Instant::now());
            if calls.len() <= self.failures {
                return Err(DomainError::delivery("smtp unavailable"));
            }
            Ok(())
        }
    }

    fn message() -> (MailMessage, Recipient) {
        (
            MailMessage::new("Product added", "A new product was added").unwrap(),
            Recipient::new("admin", "admin@example.com").unwrap(),
        )
    }

    fn gaps(calls: &[Instant]) -> Vec<Duration> {
        calls.windows(2).map(|w| w[1] - w[0]).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn delivers_on_third_attempt_after_quadratic_waits() {
        let sender = ScriptedSender::failing(2);
        let dispatcher = RetryingDispatcher::new(sender.clone(), RetryPolicy::default());
        let (msg, to) = message();

        let outcome = dispatcher.dispatch(&msg, &to, &CancellationToken::new()).await;

        assert_eq!(outcome, DeliveryOutcome::Delivered { attempts: 3 });
        assert_eq!(
            gaps(&sender.calls()),
            vec![Duration::from_secs(1), Duration::from_secs(4)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_attempts() {
        let sender = ScriptedSender::failing(usize::MAX);
        let dispatcher = RetryingDispatcher::new(sender.clone(), RetryPolicy::default());
        let (msg, to) = message();

        let outcome = dispatcher.dispatch(&msg, &to, &CancellationToken::new()).await;

        match outcome {
            DeliveryOutcome::Failed { attempts, reason } => {
                assert_eq!(attempts, 3);
                assert!(reason.contains("smtp unavailable"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
        // 终态之后不再有任何尝试
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(sender.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_backoff_stops_retries() {
        let sender = ScriptedSender::failing(usize::MAX);
        let dispatcher = RetryingDispatcher::new(sender.clone(), RetryPolicy::default());
        let cancel = CancellationToken::new();

        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let (msg, to) = message();
                dispatcher.dispatch(&msg, &to, &cancel).await
            })
        };

        // 首次失败后进入 1s 退避，在退避中途取消
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sender.calls().len(), 1);
        cancel.cancel();

        let outcome = task.await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Cancelled { attempts: 1 });
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(sender.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_attempt_abandons_the_send() {
        /// 每次发送都挂起一小时
        #[derive(Default)]
        struct HangingSender {
            calls: AtomicUsize,
        }
        #[async_trait]
        impl MessageSender for HangingSender {
            async fn send(
                &self,
                _message: &MailMessage,
                _recipient: &Recipient,
                _cancel: &CancellationToken,
            ) -> DomainResult<()> {
                self.calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(60 * 60)).await;
                Ok(())
            }
        }

        let sender = Arc::new(HangingSender::default());
        let dispatcher = RetryingDispatcher::new(sender.clone(), RetryPolicy::default());
        let cancel = CancellationToken::new();

        let task = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let (msg, to) = message();
                dispatcher.dispatch(&msg, &to, &cancel).await
            })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(sender.calls.load(Ordering::SeqCst), 1);
        cancel.cancel();

        let outcome = task.await.unwrap();
        assert_eq!(outcome, DeliveryOutcome::Cancelled { attempts: 1 });
        tokio::time::sleep(Duration::from_secs(3 * 60 * 60)).await;
        assert_eq!(sender.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_makes_no_attempt() {
        let sender = ScriptedSender::failing(0);
        let dispatcher = RetryingDispatcher::new(sender.clone(), RetryPolicy::default());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (msg, to) = message();

        let outcome = dispatcher.dispatch(&msg, &to, &cancel).await;

        assert_eq!(outcome, DeliveryOutcome::Cancelled { attempts: 0 });
        assert!(sender.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sender_reported_cancellation_is_not_retried() {
        struct CancelledSender;
        #[async_trait]
        impl MessageSender for CancelledSender {
            async fn send(
                &self,
                _message: &MailMessage,
                _recipient: &Recipient,
                _cancel: &CancellationToken,
            ) -> DomainResult<()> {
                Err(DomainError::Cancelled)
            }
        }

        let dispatcher = RetryingDispatcher::new(Arc::new(CancelledSender), RetryPolicy::default());
        let (msg, to) = message();

        let outcome = dispatcher.dispatch(&msg, &to, &CancellationToken::new()).await;
        assert_eq!(outcome, DeliveryOutcome::Cancelled { attempts: 1 });
    }
}
