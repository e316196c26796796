pub mod raw;
pub mod snapshot;

pub use raw::{RawInventory, RawProduct, RawSellable};
pub use snapshot::{
    CategorySummary, EnrichedItem, InventorySnapshot, StatusBucket, StockStatus,
};
