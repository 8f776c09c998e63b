//! 并发安全的键控存储（KeyedStore）
//!
//! 以内部单调计数器分配标识，基于 `DashMap` 分片锁实现：
//! - 读与读互不阻塞；
//! - 写只在单步插入/更新/删除期间独占所在分片；
//! - `add` 将“预留标识”与“插入”合并为一步，标识序列 0,1,2,… 无重复、无空洞；
//! - 标识永不回收，删除后的标识不会再次分配。
//!
//! 存储常驻内存、不持久化，生命周期与进程（或所属目录）一致。
//!
use crate::entity::{CatalogItem, ItemId};
use crate::error::DomainResult;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

/// 键控存储：标识 -> 条目
pub struct KeyedStore<T: CatalogItem> {
    items: DashMap<ItemId, T>,
    next_id: AtomicU64,
}

impl<T: CatalogItem> Default for KeyedStore<T> {
    fn default() -> Self {
        Self {
            items: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T: CatalogItem> std::fmt::Debug for KeyedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedStore")
            .field("count", &self.items.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T: CatalogItem> KeyedStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入条目并返回新分配的标识
    ///
    /// 校验失败属于调用方违约，立即返回错误且不消耗标识。
    pub fn add(&self, mut item: T) -> DomainResult<ItemId> {
        item.validate()?;

        loop {
            let id = self.next_id.fetch_add(1, Ordering::AcqRel);
            // 标识只来源于计数器，Occupied 分支理论上不可达；若出现则换新标识重试，保证条目不丢失
            match self.items.entry(id) {
                Entry::Vacant(slot) => {
                    item.set_id(id);
                    slot.insert(item);
                    tracing::debug!(id, "item added to store");
                    return Ok(id);
                }
                Entry::Occupied(_) => {
                    tracing::warn!(id, "identifier already occupied, reserving a fresh one");
                }
            }
        }
    }

    /// 按标识读取条目快照
    pub fn try_get(&self, id: ItemId) -> Option<T> {
        self.items.get(&id).map(|entry| entry.value().clone())
    }

    /// 删除条目；并发重复删除时仅有一个调用方得到 `true`
    pub fn try_remove(&self, id: ItemId) -> bool {
        let removed = self.items.remove(&id).is_some();
        tracing::debug!(id, removed, "remove requested");
        removed
    }

    /// 仅当标识存在时替换条目，绝不插入；存储中的条目始终保留原标识
    pub fn try_update(&self, id: ItemId, mut new_item: T) -> DomainResult<bool> {
        new_item.validate()?;
        new_item.set_id(id);

        let updated = match self.items.get_mut(&id) {
            Some(mut slot) => {
                *slot = new_item;
                true
            }
            None => false,
        };
        tracing::debug!(id, updated, "update requested");
        Ok(updated)
    }

    /// 当前内容的时点快照（按标识升序），与后续写入互不影响
    pub fn items(&self) -> Vec<T> {
        let mut snapshot: Vec<T> = self
            .items
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        snapshot.sort_by_key(|item| item.id());
        snapshot
    }

    /// 当前条目数（并发下仅供参考）
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
