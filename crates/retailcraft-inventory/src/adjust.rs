use std::fmt;

use retailcraft_core::{Size, StockChange};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::GroupedInventory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Add,
    Reduce,
}

impl fmt::Display for AdjustmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdjustmentKind::Add => f.write_str("add"),
            AdjustmentKind::Reduce => f.write_str("reduce"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjustmentError {
    #[error("quantity must be a positive whole number")]
    NonPositiveQuantity,
    #[error("not a whole number: {0}")]
    InvalidQuantity(String),
    #[error("cannot reduce {size} by {requested}, only {available} in stock")]
    ExceedsStock {
        size: Size,
        requested: u32,
        available: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    pub kind: AdjustmentKind,
    pub product_id: String,
    pub size: Size,
    pub quantity: i64,
}

impl StockAdjustment {
    pub fn add(product_id: impl Into<String>, size: Size, quantity: i64) -> Self {
        Self {
            kind: AdjustmentKind::Add,
            product_id: product_id.into(),
            size,
            quantity,
        }
    }

    pub fn reduce(product_id: impl Into<String>, size: Size, quantity: i64) -> Self {
        Self {
            kind: AdjustmentKind::Reduce,
            product_id: product_id.into(),
            size,
            quantity,
        }
    }

    // snapshot may be stale; the backend has the final say
    pub fn validate(&self, snapshot: &[GroupedInventory]) -> Result<StockChange, AdjustmentError> {
        let quantity = positive_quantity(self.quantity)?;

        if self.kind == AdjustmentKind::Reduce {
            let available = snapshot
                .iter()
                .find(|group| group.product_id == self.product_id)
                .and_then(|group| group.quantity(self.size))
                .unwrap_or(0);
            if quantity > available {
                return Err(AdjustmentError::ExceedsStock {
                    size: self.size,
                    requested: quantity,
                    available,
                });
            }
        }

        Ok(StockChange {
            product_id: self.product_id.clone(),
            size: self.size,
            quantity,
        })
    }
}

fn positive_quantity(raw: i64) -> Result<u32, AdjustmentError> {
    if raw <= 0 {
        return Err(AdjustmentError::NonPositiveQuantity);
    }
    u32::try_from(raw).map_err(|_| AdjustmentError::InvalidQuantity(raw.to_string()))
}

pub fn parse_quantity(raw: &str) -> Result<u32, AdjustmentError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AdjustmentError::InvalidQuantity(raw.trim().to_string()))?;
    positive_quantity(value)
}
