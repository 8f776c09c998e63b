//! 领域事件（Domain Event）
//!
//! 定义事件载荷需要实现的最小接口（`DomainEvent`），在总线上流转的
//! 不可变事件记录 `EventRecord`，以及目录写入后发布的 `ItemAdded`。

mod domain_event_trait;
mod event_record;
mod item_added;

pub use domain_event_trait::DomainEvent;
pub use event_record::EventRecord;
pub use item_added::ItemAdded;
