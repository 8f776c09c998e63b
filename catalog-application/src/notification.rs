//! 商品新增通知
//!
//! 订阅 `ItemAdded`，通过带重试的投递器发送固定通知。
//! 投递结果已由投递器记录，这里不再向总线返回失败，
//! 重试耗尽也不会影响已完成的写入。
//!
use crate::config::NotificationTemplate;
use async_trait::async_trait;
use catalog_domain::domain_event::{DomainEvent, EventRecord, ItemAdded};
use catalog_domain::eventing::{EventHandler, HandledEventType, RetryingDispatcher};
use tokio_util::sync::CancellationToken;

pub struct ProductAddedHandler {
    dispatcher: RetryingDispatcher,
    template: NotificationTemplate,
}

impl ProductAddedHandler {
    pub const NAME: &'static str = "product_added_notifier";

    pub fn new(dispatcher: RetryingDispatcher, template: NotificationTemplate) -> Self {
        Self {
            dispatcher,
            template,
        }
    }
}

#[async_trait]
impl EventHandler for ProductAddedHandler {
    fn handler_name(&self) -> &str {
        Self::NAME
    }

    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::One(ItemAdded::EVENT_TYPE.to_string())
    }

    async fn handle(&self, event: &EventRecord, cancel: &CancellationToken) -> anyhow::Result<()> {
        let added: ItemAdded = event.to_event()?;
        tracing::debug!(
            item_id = added.item_id,
            event_id = event.event_id(),
            "sending product added notification"
        );

        let outcome = self
            .dispatcher
            .dispatch(&self.template.message, &self.template.recipient, cancel)
            .await;
        tracing::debug!(item_id = added.item_id, ?outcome, "product added notification finished");
        Ok(())
    }
}
