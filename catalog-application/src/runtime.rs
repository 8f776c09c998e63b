//! 通知运行时（NotificationRuntime）
//!
//! 按配置装配事件总线、商品目录、商品新增通知与服务状态定时通知，
//! 并提供统一的关闭入口：触发取消后等待在途处理器与定时任务结束。
//!
use crate::catalog::Catalog;
use crate::config::NotificationConfig;
use crate::error::AppResult;
use crate::notification::ProductAddedHandler;
use crate::product_service::ProductService;
use catalog_domain::delivery::MessageSender;
use catalog_domain::eventing::{
    EventBus, InMemoryEventBus, NotificationScheduler, RetryingDispatcher, SchedulerHandle,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct NotificationRuntime {
    token: CancellationToken,
    bus: Arc<InMemoryEventBus>,
    products: ProductService,
    scheduler: SchedulerHandle,
}

impl NotificationRuntime {
    /// 在当前 tokio 运行时上启动
    pub fn start(config: &NotificationConfig, sender: Arc<dyn MessageSender>) -> AppResult<Self> {
        let token = CancellationToken::new();

        let bus = Arc::new(InMemoryEventBus::new(token.child_token())?);
        bus.register(Arc::new(ProductAddedHandler::new(
            RetryingDispatcher::new(sender.clone(), config.retry),
            config.product_added.clone(),
        )));

        let catalog = Arc::new(Catalog::new(bus.clone()));
        let products = ProductService::new(catalog);

        let scheduler = Arc::new(
            NotificationScheduler::builder()
                .sender(sender)
                .message(config.server_status.message.clone())
                .recipient(config.server_status.recipient.clone())
                .interval(config.status_interval)
                .build(),
        )
        .start(token.child_token())?;

        tracing::info!(
            max_attempts = config.retry.max_attempts(),
            status_interval_secs = config.status_interval.as_secs(),
            "notification runtime started"
        );

        Ok(Self {
            token,
            bus,
            products,
            scheduler,
        })
    }

    pub fn products(&self) -> &ProductService {
        &self.products
    }

    pub fn bus(&self) -> &InMemoryEventBus {
        &self.bus
    }

    /// 取消所有后台工作并等待结束；存储内容不受影响
    pub async fn shutdown(self) {
        self.token.cancel();
        self.bus.shutdown().await;
        let scheduler_ok = self.scheduler.join().await.is_ok();
        tracing::info!(scheduler_ok, "notification runtime stopped");
    }
}
