//! 事件总线（EventBus）协议
//!
//! 定义处理器注册与事件发布的统一抽象。发布只负责把事件交给处理器任务，
//! 不等待处理完成，因此发布方（通常是一次存储写入）不会被慢处理器拖住。
//!
use super::EventHandler;
use crate::{domain_event::EventRecord, error::DomainResult as Result};
use std::sync::Arc;

/// 事件总线：负责注册处理器与分发事件
pub trait EventBus: Send + Sync {
    /// 注册处理器，订阅类型由 `EventHandler::handled_event_type` 决定
    fn register(&self, handler: Arc<dyn EventHandler>);

    /// 发布事件，返回本次被调度的处理器数量
    fn publish(&self, event: EventRecord) -> Result<usize>;

    fn publish_batch(&self, events: Vec<EventRecord>) -> Result<usize> {
        let mut dispatched = 0;
        for event in events {
            dispatched += self.publish(event)?;
        }
        Ok(dispatched)
    }
}
