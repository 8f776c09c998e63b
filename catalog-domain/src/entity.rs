//! 目录条目（CatalogItem）基础抽象
//!
//! 条目的标识由存储在插入时分配，调用方填写的标识一律被覆盖。
//!
use crate::error::DomainResult;

/// 条目标识：由 `KeyedStore` 内部计数器单调分配，从 0 开始
pub type ItemId = u64;

/// 可存入目录的条目
pub trait CatalogItem: Clone + Send + Sync + 'static {
    /// 获取条目标识
    fn id(&self) -> ItemId;

    /// 写入条目标识（仅供存储在插入/更新时调用）
    fn set_id(&mut self, id: ItemId);

    /// 入库前的契约校验，失败即视为调用方违约
    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }
}
