pub mod adjust;
pub mod aggregate;
pub mod filter;

pub use adjust::{AdjustmentError, AdjustmentKind, StockAdjustment, parse_quantity};
pub use aggregate::{GroupedInventory, LOW_STOCK_THRESHOLD, aggregate, aggregate_deduplicated};
pub use filter::{
    InventoryQuery, ParseStockStatusError, StockStatus, filter_by_search, filter_by_size,
    filter_by_stock_status, matches_search,
};
