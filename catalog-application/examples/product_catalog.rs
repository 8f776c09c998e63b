use async_trait::async_trait;
use catalog_application::dto::{ProductToCreate, ProductToUpdate};
use catalog_application::{NotificationConfig, NotificationRuntime};
use catalog_domain::delivery::{MailMessage, MessageSender, Recipient};
use catalog_domain::error::DomainResult;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct StdoutSender;

#[async_trait]
impl MessageSender for StdoutSender {
    async fn send(
        &self,
        message: &MailMessage,
        recipient: &Recipient,
        _cancel: &CancellationToken,
    ) -> DomainResult<()> {
        println!(
            "-> {} <{}>: {} / {}",
            recipient.name(),
            recipient.address(),
            message.subject(),
            message.body()
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 缩短状态通知间隔，便于在示例中观察
    let config = NotificationConfig::from_lookup(|key| match key {
        "CATALOG_STATUS_INTERVAL_SECS" => Some("1".to_string()),
        _ => None,
    })?;
    let runtime = NotificationRuntime::start(&config, Arc::new(StdoutSender))?;
    let products = runtime.products();

    let desk = products.add(ProductToCreate {
        title: "Desk".into(),
        image: None,
    })?;
    println!("added: {desk:?}");

    let updated = products.update(
        desk.id,
        ProductToUpdate {
            title: "Standing desk".into(),
            image: Some("desk.png".into()),
        },
    )?;
    println!("updated: {updated}, now: {:?}", products.get(desk.id));

    if let Err(err) = products.add(ProductToCreate {
        title: "  ".into(),
        image: None,
    }) {
        println!("rejected: {err}");
    }

    tokio::time::sleep(Duration::from_millis(1500)).await;
    println!("all products: {:?}", products.get_all());
    println!("removed: {}", products.remove(desk.id));

    runtime.shutdown().await;
    Ok(())
}
