use std::{fmt, str::FromStr};

use retailcraft_core::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::GroupedInventory;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    #[default]
    All,
    In,
    Low,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stock status: {0} (expected all, in, low or out)")]
pub struct ParseStockStatusError(pub String);

impl FromStr for StockStatus {
    type Err = ParseStockStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StockStatus::All),
            "in" => Ok(StockStatus::In),
            "low" => Ok(StockStatus::Low),
            "out" => Ok(StockStatus::Out),
            _ => Err(ParseStockStatusError(value.to_string())),
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StockStatus::All => "all",
            StockStatus::In => "in",
            StockStatus::Low => "low",
            StockStatus::Out => "out",
        })
    }
}

impl StockStatus {
    // In ignores zero-quantity sizes
    pub fn matches(self, item: &GroupedInventory) -> bool {
        match self {
            StockStatus::All => true,
            StockStatus::In => item.total_stock > 0 && item.low_stock_sizes.is_empty(),
            StockStatus::Low => item.is_low(),
            StockStatus::Out => item.is_out(),
        }
    }
}

pub fn matches_search(item: &GroupedInventory, term: &str) -> bool {
    let needle = term.to_lowercase();
    needle.is_empty()
        || item.product_name.to_lowercase().contains(&needle)
        || item.bar_code.to_lowercase().contains(&needle)
}

pub fn filter_by_stock_status(
    items: &[GroupedInventory],
    status: StockStatus,
) -> Vec<&GroupedInventory> {
    items.iter().filter(|item| status.matches(item)).collect()
}

pub fn filter_by_search<'a>(items: &'a [GroupedInventory], term: &str) -> Vec<&'a GroupedInventory> {
    items.iter().filter(|item| matches_search(item, term)).collect()
}

pub fn filter_by_size(items: &[GroupedInventory], size: Size) -> Vec<&GroupedInventory> {
    items
        .iter()
        .filter(|item| item.stocks.contains_key(&size))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryQuery {
    #[serde(default)]
    pub status: StockStatus,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub size: Option<Size>,
}

impl InventoryQuery {
    pub fn matches(&self, item: &GroupedInventory) -> bool {
        self.status.matches(item)
            && self
                .search
                .as_deref()
                .is_none_or(|term| matches_search(item, term))
            && self.size.is_none_or(|size| item.stocks.contains_key(&size))
    }

    pub fn apply<'a>(&self, items: &'a [GroupedInventory]) -> Vec<&'a GroupedInventory> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}
