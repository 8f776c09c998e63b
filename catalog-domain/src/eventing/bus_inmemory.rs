//! 内存版事件总线（InMemoryEventBus）
//!
//! 以 `DashMap` 保存“事件类型 -> 处理器列表”，发布时为每个匹配的处理器
//! 在 `TaskTracker` 上派生一个受监管的任务：
//! - `publish`：取当前处理器快照并派发，立即返回，不等待处理完成；
//! - 处理器的错误与 panic 在任务边界被捕获，仅记录日志并计数；
//! - `shutdown`：触发取消并等待所有在途处理器结束。
//!
//! 注意：发布过程中新注册的处理器不保证收到该次发布的事件。
//! 每个实例相互独立，不存在进程级单例。

use super::{EventBus, EventHandler, HandledEventType};
use crate::domain_event::EventRecord;
use crate::error::{DomainError, DomainResult as Result};
use dashmap::DashMap;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Route {
    Kind(String),
    All,
}

#[derive(Default)]
struct HandlerRegistry {
    routes: DashMap<Route, Vec<Arc<dyn EventHandler>>>,
}

impl HandlerRegistry {
    fn register(&self, handler: Arc<dyn EventHandler>) {
        let routes = match handler.handled_event_type() {
            HandledEventType::All => vec![Route::All],
            HandledEventType::One(t) => vec![Route::Kind(t)],
            HandledEventType::Many(ts) => ts.into_iter().map(Route::Kind).collect(),
        };

        for route in routes {
            self.routes.entry(route).or_default().push(handler.clone());
        }
    }

    fn matching(&self, event_type: &str) -> Vec<Arc<dyn EventHandler>> {
        let mut merged: Vec<Arc<dyn EventHandler>> = Vec::new();
        if let Some(list) = self.routes.get(&Route::Kind(event_type.to_string())) {
            merged.extend(list.iter().cloned());
        }
        if let Some(list) = self.routes.get(&Route::All) {
            merged.extend(list.iter().cloned());
        }
        merged
    }
}

/// 进程内事件总线
pub struct InMemoryEventBus {
    registry: HandlerRegistry,
    tracker: TaskTracker,
    token: CancellationToken,
    runtime: Handle,
    failures: Arc<AtomicUsize>,
}

impl InMemoryEventBus {
    /// 在当前 tokio 运行时上创建总线；`token` 取消后总线拒绝新的发布
    pub fn new(token: CancellationToken) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| DomainError::event_bus(e.to_string()))?;
        Ok(Self::with_runtime(runtime, token))
    }

    /// 指定运行时创建总线，发布方可位于运行时之外的线程
    pub fn with_runtime(runtime: Handle, token: CancellationToken) -> Self {
        Self {
            registry: HandlerRegistry::default(),
            tracker: TaskTracker::new(),
            token,
            runtime,
            failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 在途处理器任务数量
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// 累计失败（返回错误或 panic）的处理器调用次数
    pub fn handler_failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// 取消所有在途处理器并等待其结束
    pub async fn shutdown(&self) {
        self.token.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        tracing::debug!("event bus shut down");
    }

    async fn run_handler(
        handler: Arc<dyn EventHandler>,
        event: Arc<EventRecord>,
        cancel: CancellationToken,
        failures: Arc<AtomicUsize>,
    ) {
        let outcome = AssertUnwindSafe(handler.handle(&event, &cancel))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {
                tracing::debug!(
                    handler = handler.handler_name(),
                    event_id = event.event_id(),
                    "event handled"
                );
            }
            Ok(Err(err)) => {
                failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    handler = handler.handler_name(),
                    event_id = event.event_id(),
                    error = %err,
                    "event handler failed"
                );
            }
            Err(_panic) => {
                failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    handler = handler.handler_name(),
                    event_id = event.event_id(),
                    "event handler panicked"
                );
            }
        }
    }
}

impl EventBus for InMemoryEventBus {
    fn register(&self, handler: Arc<dyn EventHandler>) {
        tracing::debug!(handler = handler.handler_name(), "event handler registered");
        self.registry.register(handler);
    }

    fn publish(&self, event: EventRecord) -> Result<usize> {
        // 持有 tracker 令牌直到派发完成：shutdown 的 wait 不会在检查与派发之间返回
        let _in_publish = self.tracker.token();
        if self.token.is_cancelled() || self.tracker.is_closed() {
            return Err(DomainError::event_bus("event bus is shut down"));
        }

        let handlers = self.registry.matching(event.event_type());
        if handlers.is_empty() {
            tracing::debug!(event_type = event.event_type(), "no handlers for event");
            return Ok(0);
        }

        let event = Arc::new(event);
        for handler in &handlers {
            self.tracker.spawn_on(
                Self::run_handler(
                    handler.clone(),
                    event.clone(),
                    self.token.child_token(),
                    self.failures.clone(),
                ),
                &self.runtime,
            );
        }

        tracing::debug!(
            event_type = event.event_type(),
            event_id = event.event_id(),
            handlers = handlers.len(),
            "event published"
        );
        Ok(handlers.len())
    }
}
