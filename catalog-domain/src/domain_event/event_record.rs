//! 事件记录（EventRecord）
//!
//! 事件在总线上的标准形态：类型 + 序列化载荷 + 元数据，创建后不可变。
//!
use super::DomainEvent;
use crate::error::DomainResult;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct EventRecord {
    /// 事件唯一标识符
    #[builder(default = Uuid::new_v4().to_string())]
    event_id: String,
    /// 事件类型，用于路由到处理器
    event_type: String,
    /// 事件版本
    #[builder(default = 1)]
    event_version: usize,
    /// 事件发生时间
    #[builder(default = Utc::now())]
    occurred_at: DateTime<Utc>,
    /// 事件负载
    payload: Value,
}

impl EventRecord {
    /// 将类型化事件序列化为记录
    pub fn from_event<E: DomainEvent>(event: &E) -> DomainResult<Self> {
        Ok(Self::builder()
            .event_type(E::EVENT_TYPE.to_string())
            .event_version(event.event_version())
            .payload(serde_json::to_value(event)?)
            .build())
    }

    /// 还原为类型化事件
    pub fn to_event<E: DomainEvent>(&self) -> DomainResult<E> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> usize {
        self.event_version
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// 判断记录是否为指定类型的事件
    pub fn is<E: DomainEvent>(&self) -> bool {
        self.event_type == E::EVENT_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_event::ItemAdded;
    use serde_json::json;

    #[test]
    fn typed_event_survives_record_conversion() {
        let event = ItemAdded {
            item_id: 3,
            item: json!({"id": 3, "title": "Lamp", "image": null}),
        };
        let record = EventRecord::from_event(&event).unwrap();

        assert_eq!(record.event_type(), ItemAdded::EVENT_TYPE);
        assert_eq!(record.event_version(), 1);
        assert!(!record.event_id().is_empty());
        assert!(record.is::<ItemAdded>());
        assert_eq!(record.to_event::<ItemAdded>().unwrap(), event);
    }
}
