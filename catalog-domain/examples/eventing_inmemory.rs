/// Eventing（内存版）示例
/// 展示 存储写入 -> 发布 ItemAdded -> 处理器 -> 带重试投递 的闭环，以及投递失败不影响存储
use anyhow::Result as AnyResult;
use async_trait::async_trait;
use catalog_domain::delivery::{MailMessage, MessageSender, Recipient};
use catalog_domain::domain_event::{DomainEvent, EventRecord, ItemAdded};
use catalog_domain::entity::CatalogItem;
use catalog_domain::error::{DomainError, DomainResult};
use catalog_domain::eventing::{
    EventBus, EventHandler, HandledEventType, InMemoryEventBus, RetryPolicy, RetryingDispatcher,
};
use catalog_domain::product::Product;
use catalog_domain::store::KeyedStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ============================================================================
// 不可靠的投递通道（MessageSender）
// ============================================================================

#[derive(Default)]
struct PrintSender {
    calls: AtomicUsize,
}

#[async_trait]
impl MessageSender for PrintSender {
    async fn send(
        &self,
        message: &MailMessage,
        recipient: &Recipient,
        _cancel: &CancellationToken,
    ) -> DomainResult<()> {
        // 奇数次调用失败
        if self.calls.fetch_add(1, Ordering::Relaxed) % 2 == 0 {
            println!("  send to {} failed", recipient.address());
            return Err(DomainError::delivery("flaky channel"));
        }
        println!("  sent '{}' to {}", message.subject(), recipient.address());
        Ok(())
    }
}

// ============================================================================
// 示例处理器（EventHandler）
// ============================================================================

struct NotifyHandler {
    dispatcher: RetryingDispatcher,
    message: MailMessage,
    recipient: Recipient,
}

#[async_trait]
impl EventHandler for NotifyHandler {
    fn handler_name(&self) -> &str {
        "notify"
    }

    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::One(ItemAdded::EVENT_TYPE.to_string())
    }

    async fn handle(&self, event: &EventRecord, cancel: &CancellationToken) -> anyhow::Result<()> {
        let added: ItemAdded = event.to_event()?;
        println!("item {} added: {}", added.item_id, added.item);
        let outcome = self
            .dispatcher
            .dispatch(&self.message, &self.recipient, cancel)
            .await;
        println!("item {} -> {:?}", added.item_id, outcome);
        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> AnyResult<()> {
    println!("=== Eventing（内存版）示例 ===\n");

    let token = CancellationToken::new();
    let bus = InMemoryEventBus::new(token.clone())?;
    bus.register(Arc::new(NotifyHandler {
        dispatcher: RetryingDispatcher::new(
            Arc::new(PrintSender::default()),
            RetryPolicy::builder()
                .backoff_unit(Duration::from_millis(100))
                .build(),
        ),
        message: MailMessage::new("Product added", "A new product was added")?,
        recipient: Recipient::new("admin", "admin@example.com")?,
    }));

    let store = KeyedStore::new();
    for title in ["Lamp", "Chair", "Desk"] {
        let mut product = Product::new(title, None);
        let id = store.add(product.clone())?;
        product.set_id(id);
        let event = ItemAdded {
            item_id: id,
            item: serde_json::to_value(&product)?,
        };
        bus.publish(EventRecord::from_event(&event)?)?;
    }

    tokio::time::sleep(Duration::from_secs(1)).await;
    bus.shutdown().await;

    println!("\nstore now holds {} items", store.count());
    Ok(())
}
