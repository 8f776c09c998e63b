use anyhow::Context;
use async_trait::async_trait;
use catalog_application::dto::{ProductToCreate, ProductToUpdate};
use catalog_application::{NotificationConfig, NotificationRuntime};
use catalog_domain::delivery::{MailMessage, MessageSender, Recipient};
use catalog_domain::error::{DomainError, DomainResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 模拟不可靠的外部通道：每三次投递中前两次失败
#[derive(Default)]
struct FlakySender {
    calls: AtomicUsize,
}

#[async_trait]
impl MessageSender for FlakySender {
    async fn send(
        &self,
        message: &MailMessage,
        recipient: &Recipient,
        cancel: &CancellationToken,
    ) -> DomainResult<()> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        tokio::select! {
            _ = cancel.cancelled() => return Err(DomainError::Cancelled),
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }
        if n % 3 != 2 {
            return Err(DomainError::delivery("simulated transport failure"));
        }
        tracing::info!(
            to = recipient.address(),
            subject = message.subject(),
            "simulated message sent"
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = NotificationConfig::from_env().context("loading notification config")?;
    let runtime = NotificationRuntime::start(&config, Arc::new(FlakySender::default()))?;
    let products = runtime.products();

    let lamp = products.add(ProductToCreate {
        title: "Lamp".into(),
        image: Some("lamp.png".into()),
    })?;
    let chair = products.add(ProductToCreate {
        title: "Chair".into(),
        image: None,
    })?;
    products.update(
        chair.id,
        ProductToUpdate {
            title: "Armchair".into(),
            image: None,
        },
    )?;
    products.remove(lamp.id);

    for p in products.get_all() {
        tracing::info!(id = p.id, title = %p.title, "catalog entry");
    }

    tracing::info!("running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    runtime.shutdown().await;
    Ok(())
}
