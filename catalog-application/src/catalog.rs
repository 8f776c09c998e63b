//! 目录（Catalog）
//!
//! 键控存储 + 事件总线：写入成功后发布 `ItemAdded`，
//! 事件携带条目快照。发布失败只记录日志，不影响写入结果，
//! 目录的一致性不依赖于下游投递是否健康。
//!
use crate::error::AppResult;
use catalog_domain::domain_event::{EventRecord, ItemAdded};
use catalog_domain::entity::{CatalogItem, ItemId};
use catalog_domain::error::DomainResult;
use catalog_domain::eventing::EventBus;
use catalog_domain::store::KeyedStore;
use serde::Serialize;
use std::sync::Arc;

pub struct Catalog<T: CatalogItem> {
    store: KeyedStore<T>,
    bus: Arc<dyn EventBus>,
}

impl<T> Catalog<T>
where
    T: CatalogItem + Serialize,
{
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self {
            store: KeyedStore::new(),
            bus,
        }
    }

    /// 新增条目，总是以新分配的标识插入
    pub fn add(&self, item: T) -> AppResult<ItemId> {
        let mut snapshot = item.clone();
        let id = self.store.add(item)?;
        snapshot.set_id(id);

        if let Err(err) = self.publish_added(&snapshot) {
            tracing::warn!(id, error = %err, "failed to publish item added event");
        }
        Ok(id)
    }

    pub fn get(&self, id: ItemId) -> Option<T> {
        self.store.try_get(id)
    }

    pub fn remove(&self, id: ItemId) -> bool {
        self.store.try_remove(id)
    }

    pub fn update(&self, id: ItemId, item: T) -> AppResult<bool> {
        Ok(self.store.try_update(id, item)?)
    }

    pub fn items(&self) -> Vec<T> {
        self.store.items()
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    fn publish_added(&self, snapshot: &T) -> DomainResult<usize> {
        let event = ItemAdded {
            item_id: snapshot.id(),
            item: serde_json::to_value(snapshot)?,
        };
        self.bus.publish(EventRecord::from_event(&event)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_domain::error::DomainError;
    use catalog_domain::eventing::EventHandler;
    use catalog_domain::product::Product;
    use std::sync::Mutex;

    /// 同步记录发布内容的总线替身
    #[derive(Default)]
    struct RecordingBus {
        published: Mutex<Vec<EventRecord>>,
        fail: bool,
    }

    impl EventBus for RecordingBus {
        fn register(&self, _handler: Arc<dyn EventHandler>) {}

        fn publish(&self, event: EventRecord) -> DomainResult<usize> {
            if self.fail {
                return Err(DomainError::event_bus("bus down"));
            }
            self.published.lock().unwrap().push(event);
            Ok(1)
        }
    }

    #[test]
    fn add_publishes_snapshot_with_assigned_id() {
        let bus = Arc::new(RecordingBus::default());
        let catalog = Catalog::new(bus.clone());

        let id = catalog.add(Product::new("Lamp", Some("lamp.png".into()))).unwrap();
        assert!(catalog.update(id, Product::new("Desk lamp", None)).unwrap());

        let published = bus.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        let event: ItemAdded = published[0].to_event().unwrap();
        assert_eq!(event.item_id, id);
        // 快照不受之后更新的影响
        let snapshot: Product = serde_json::from_value(event.item).unwrap();
        assert_eq!(snapshot.title(), "Lamp");
        assert_eq!(snapshot.id(), id);
    }

    #[test]
    fn publish_failure_does_not_undo_the_add() {
        let bus = Arc::new(RecordingBus {
            fail: true,
            ..Default::default()
        });
        let catalog = Catalog::new(bus);

        let id = catalog.add(Product::new("Chair", None)).unwrap();
        assert_eq!(catalog.get(id).unwrap().title(), "Chair");
        assert_eq!(catalog.count(), 1);
    }

    #[test]
    fn rejected_item_publishes_nothing() {
        let bus = Arc::new(RecordingBus::default());
        let catalog = Catalog::new(bus.clone());

        assert!(catalog.add(Product::new("", None)).is_err());
        assert!(bus.published.lock().unwrap().is_empty());
        assert_eq!(catalog.count(), 0);
    }
}
