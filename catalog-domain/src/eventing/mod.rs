//! 事件子系统（eventing）
//!
//! 提供事件发布/订阅与投递的基础抽象与运行时：
//! - `EventBus`：按事件类型注册处理器并发布事件；
//! - `InMemoryEventBus`：进程内实现，处理器在受监管的任务中并发执行；
//! - `EventHandler`：对事件进行消费处理；
//! - `RetryingDispatcher`：以 n² 退避策略包装一次外部投递；
//! - `NotificationScheduler`：按固定间隔独立触发投递。
//!
//! 投递路径上的失败只记录日志，不会回滚触发事件的存储写入。
//!
pub mod bus;
pub mod bus_inmemory;
pub mod dispatcher;
pub mod handler;
pub mod retry;
pub mod scheduler;

pub use bus::EventBus;
pub use bus_inmemory::InMemoryEventBus;
pub use dispatcher::{DeliveryOutcome, RetryingDispatcher};
pub use handler::{EventHandler, HandledEventType};
pub use retry::RetryPolicy;
pub use scheduler::{NotificationScheduler, SchedulerHandle};
