use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseSizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    S,
    M,
    L,
    XL,
    XXL,
}

impl Size {
    pub const ALL: [Size; 5] = [Size::S, Size::M, Size::L, Size::XL, Size::XXL];

    pub fn label(self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
            Size::XXL => "XXL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Size {
    type Err = ParseSizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "S" => Ok(Size::S),
            "M" => Ok(Size::M),
            "L" => Ok(Size::L),
            "XL" => Ok(Size::XL),
            "XXL" => Ok(Size::XXL),
            _ => Err(ParseSizeError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub product_id: String,
    pub product_name: String,
    pub bar_code: String,
    pub size: Size,
    pub quantity: u32,
}

// only counted, so every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LowStockItem {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    pub size: Option<String>,
    pub quantity: Option<i64>,
}

impl From<&StockRecord> for LowStockItem {
    fn from(record: &StockRecord) -> Self {
        Self {
            product_id: Some(record.product_id.clone()),
            product_name: Some(record.product_name.clone()),
            size: Some(record.size.label().to_string()),
            quantity: Some(i64::from(record.quantity)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_products: u64,
    pub total_stock: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
    pub product_id: String,
    pub size: Size,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parses_case_insensitively() {
        assert_eq!("xl".parse::<Size>().unwrap(), Size::XL);
        assert_eq!(" XXL ".parse::<Size>().unwrap(), Size::XXL);
        assert!("XS".parse::<Size>().is_err());
    }

    #[test]
    fn stock_record_uses_camel_case_wire_names() {
        let record: StockRecord = serde_json::from_str(
            r#"{"productId":"p1","productName":"Shirt","barCode":"B1","size":"M","quantity":3}"#,
        )
        .unwrap();
        assert_eq!(record.size, Size::M);
        assert_eq!(record.quantity, 3);
    }

    #[test]
    fn negative_quantity_is_rejected_at_the_boundary() {
        let parsed = serde_json::from_str::<StockRecord>(
            r#"{"productId":"p1","productName":"Shirt","barCode":"B1","size":"M","quantity":-1}"#,
        );
        assert!(parsed.is_err());

        let parsed = serde_json::from_str::<StockRecord>(
            r#"{"productId":"p1","productName":"Shirt","barCode":"B1","size":"M","quantity":"3"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn low_stock_entries_tolerate_partial_rows() {
        let items: Vec<LowStockItem> = serde_json::from_str(
            r#"[{"productId":"p1","size":"XS","quantity":2,"branchId":"b1"},{"productName":"Cap"}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].size.as_deref(), Some("XS"));
        assert_eq!(items[1].product_id, None);
    }
}
