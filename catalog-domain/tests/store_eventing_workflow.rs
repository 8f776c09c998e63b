use async_trait::async_trait;
use catalog_domain::domain_event::{DomainEvent, EventRecord, ItemAdded};
use catalog_domain::entity::{CatalogItem, ItemId};
use catalog_domain::eventing::{EventBus, EventHandler, HandledEventType, InMemoryEventBus};
use catalog_domain::product::Product;
use catalog_domain::store::KeyedStore;
use futures_util::future::join_all;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct Collector {
    seen: Mutex<Vec<ItemAdded>>,
}

#[async_trait]
impl EventHandler for Collector {
    fn handler_name(&self) -> &str {
        "collector"
    }
    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::One(ItemAdded::EVENT_TYPE.to_string())
    }
    async fn handle(&self, event: &EventRecord, _cancel: &CancellationToken) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(event.to_event()?);
        Ok(())
    }
}

fn add_and_publish(store: &KeyedStore<Product>, bus: &dyn EventBus, title: String) -> ItemId {
    let mut snapshot = Product::new(title, None);
    let id = store.add(snapshot.clone()).unwrap();
    snapshot.set_id(id);
    let event = ItemAdded {
        item_id: id,
        item: serde_json::to_value(&snapshot).unwrap(),
    };
    bus.publish(EventRecord::from_event(&event).unwrap()).unwrap();
    id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writers_each_produce_one_snapshot_event() {
    let store = Arc::new(KeyedStore::<Product>::new());
    let bus = Arc::new(InMemoryEventBus::new(CancellationToken::new()).unwrap());
    let collector = Arc::new(Collector::default());
    bus.register(collector.clone());

    let writers = (0..16).map(|w| {
        let store = store.clone();
        let bus = bus.clone();
        tokio::spawn(async move {
            (0..50)
                .map(|i| add_and_publish(&store, &*bus, format!("w{w}-{i}")))
                .collect::<Vec<_>>()
        })
    });
    let ids: Vec<ItemId> = join_all(writers)
        .await
        .into_iter()
        .flat_map(|r| r.unwrap())
        .collect();
    bus.shutdown().await;

    let n = 16 * 50;
    let expected: BTreeSet<ItemId> = (0..n).collect();
    assert_eq!(ids.iter().copied().collect::<BTreeSet<_>>(), expected);

    let seen = collector.seen.lock().unwrap();
    assert_eq!(seen.len(), n as usize);
    for event in seen.iter() {
        let snapshot: Product = serde_json::from_value(event.item.clone()).unwrap();
        assert_eq!(snapshot.id(), event.item_id);
        assert_eq!(store.try_get(event.item_id).unwrap(), snapshot);
    }
    assert_eq!(bus.handler_failures(), 0);
}

#[tokio::test]
async fn late_registration_does_not_see_earlier_events() {
    let store = KeyedStore::<Product>::new();
    let bus = InMemoryEventBus::new(CancellationToken::new()).unwrap();

    add_and_publish(&store, &bus, "early".into());
    let collector = Arc::new(Collector::default());
    bus.register(collector.clone());
    let late = add_and_publish(&store, &bus, "late".into());
    bus.shutdown().await;

    let seen = collector.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].item_id, late);
}
