use super::DomainEvent;
use crate::entity::ItemId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 条目已加入目录
///
/// 携带条目对外可见字段的快照，而非存储内条目的引用：
/// 处理器既看不到条目之后的修改，也无法反向改动存储。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item_id: ItemId,
    pub item: Value,
}

impl DomainEvent for ItemAdded {
    const EVENT_TYPE: &'static str = "catalog.item_added";
}
