use std::collections::{BTreeMap, HashMap};

use retailcraft_core::{Size, StockRecord};
use serde::Serialize;

pub const LOW_STOCK_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedInventory {
    pub product_id: String,
    pub product_name: String,
    pub bar_code: String,
    pub stocks: BTreeMap<Size, u32>,
    pub total_stock: u64,
    pub low_stock_sizes: Vec<Size>,
    pub out_of_stock_sizes: Vec<Size>,
}

impl GroupedInventory {
    fn seed(record: &StockRecord) -> Self {
        Self {
            product_id: record.product_id.clone(),
            product_name: record.product_name.clone(),
            bar_code: record.bar_code.clone(),
            stocks: BTreeMap::new(),
            total_stock: 0,
            low_stock_sizes: Vec::new(),
            out_of_stock_sizes: Vec::new(),
        }
    }

    fn absorb(&mut self, record: &StockRecord) {
        self.stocks.insert(record.size, record.quantity);
        self.total_stock += u64::from(record.quantity);

        match record.quantity {
            0 => self.out_of_stock_sizes.push(record.size),
            q if q <= LOW_STOCK_THRESHOLD => self.low_stock_sizes.push(record.size),
            _ => {}
        }
    }

    pub fn deduplicated_total(&self) -> u64 {
        self.stocks.values().map(|quantity| u64::from(*quantity)).sum()
    }

    pub fn quantity(&self, size: Size) -> Option<u32> {
        self.stocks.get(&size).copied()
    }

    pub fn is_low(&self) -> bool {
        !self.low_stock_sizes.is_empty()
    }

    pub fn is_out(&self) -> bool {
        !self.out_of_stock_sizes.is_empty()
    }

    pub fn can_reduce(&self, size: Size) -> bool {
        self.quantity(size).is_some_and(|quantity| quantity > 0)
    }

    pub fn can_delete(&self) -> bool {
        self.total_stock == 0
    }
}

/// Groups flat stock records by product, in first-seen product order.
///
/// `total_stock` accumulates every record, so a repeated (product, size)
/// pair is counted twice while `stocks` keeps only the last quantity. Size
/// classification happens as each record is read and is never revisited.
/// Use [`aggregate_deduplicated`] for totals derived from the size map.
pub fn aggregate(records: &[StockRecord]) -> Vec<GroupedInventory> {
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupedInventory> = Vec::new();

    for record in records {
        let index = *order.entry(record.product_id.as_str()).or_insert_with(|| {
            groups.push(GroupedInventory::seed(record));
            groups.len() - 1
        });
        groups[index].absorb(record);
    }

    groups
}

pub fn aggregate_deduplicated(records: &[StockRecord]) -> Vec<GroupedInventory> {
    let mut groups = aggregate(records);
    for group in &mut groups {
        group.total_stock = group.deduplicated_total();
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(product_id: &str, name: &str, size: Size, quantity: u32) -> StockRecord {
        StockRecord {
            product_id: product_id.to_string(),
            product_name: name.to_string(),
            bar_code: format!("BC-{product_id}"),
            size,
            quantity,
        }
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn single_low_record() {
        let groups = aggregate(&[record("p1", "Shirt", Size::M, 3)]);
        assert_eq!(groups.len(), 1);

        let shirt = &groups[0];
        assert_eq!(shirt.stocks, BTreeMap::from([(Size::M, 3)]));
        assert_eq!(shirt.total_stock, 3);
        assert_eq!(shirt.low_stock_sizes, vec![Size::M]);
        assert!(shirt.out_of_stock_sizes.is_empty());
    }

    #[test]
    fn mixed_levels_are_classified_per_size() {
        let groups = aggregate(&[
            record("p1", "Shirt", Size::M, 0),
            record("p1", "Shirt", Size::L, 5),
            record("p1", "Shirt", Size::XL, 20),
        ]);
        let shirt = &groups[0];

        assert_eq!(shirt.out_of_stock_sizes, vec![Size::M]);
        assert_eq!(shirt.low_stock_sizes, vec![Size::L]);
        assert_eq!(shirt.total_stock, 25);
        assert_eq!(shirt.quantity(Size::XL), Some(20));
        assert!(!shirt.low_stock_sizes.contains(&Size::XL));
        assert!(!shirt.out_of_stock_sizes.contains(&Size::XL));
        assert_eq!(shirt.total_stock, shirt.deduplicated_total());
    }

    #[test]
    fn groups_follow_first_seen_order() {
        let groups = aggregate(&[
            record("p2", "Trousers", Size::S, 9),
            record("p1", "Shirt", Size::S, 9),
            record("p2", "Trousers", Size::M, 9),
        ]);
        let ids: Vec<_> = groups.iter().map(|g| g.product_id.as_str()).collect();
        assert_eq!(ids, ["p2", "p1"]);
        assert_eq!(groups[0].total_stock, 18);
    }

    #[test]
    fn size_lists_keep_encounter_order() {
        let groups = aggregate(&[
            record("p1", "Shirt", Size::XL, 1),
            record("p1", "Shirt", Size::S, 2),
            record("p1", "Shirt", Size::XXL, 0),
            record("p1", "Shirt", Size::M, 0),
        ]);
        assert_eq!(groups[0].low_stock_sizes, vec![Size::XL, Size::S]);
        assert_eq!(groups[0].out_of_stock_sizes, vec![Size::XXL, Size::M]);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let records = vec![
            record("p1", "Shirt", Size::M, 0),
            record("p2", "Cap", Size::L, 12),
        ];
        let snapshot = records.clone();

        assert_eq!(aggregate(&records), aggregate(&records));
        assert_eq!(records, snapshot);
    }

    #[test]
    fn first_seen_display_fields_win() {
        let mut renamed = record("p1", "Shirt v2", Size::L, 8);
        renamed.bar_code = "NEW".to_string();

        let groups = aggregate(&[record("p1", "Shirt", Size::M, 8), renamed]);
        assert_eq!(groups[0].product_name, "Shirt");
        assert_eq!(groups[0].bar_code, "BC-p1");
    }

    #[test]
    fn duplicate_size_double_counts_in_the_faithful_total() {
        let records = [
            record("p1", "Shirt", Size::M, 4),
            record("p1", "Shirt", Size::M, 10),
        ];

        let faithful = aggregate(&records);
        assert_eq!(faithful[0].quantity(Size::M), Some(10));
        assert_eq!(faithful[0].total_stock, 14);
        // classified on first read, never reclassified
        assert_eq!(faithful[0].low_stock_sizes, vec![Size::M]);

        let corrected = aggregate_deduplicated(&records);
        assert_eq!(corrected[0].total_stock, 10);
        assert_ne!(faithful[0].total_stock, corrected[0].total_stock);
    }

    #[test]
    fn affordances_follow_quantities() {
        let groups = aggregate(&[
            record("p1", "Shirt", Size::M, 0),
            record("p2", "Cap", Size::L, 2),
        ]);
        assert!(!groups[0].can_reduce(Size::M));
        assert!(!groups[0].can_reduce(Size::L));
        assert!(groups[0].can_delete());
        assert!(groups[1].can_reduce(Size::L));
        assert!(!groups[1].can_delete());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let groups = aggregate(&[record("p1", "Shirt", Size::XL, 7)]);
        let value = serde_json::to_value(&groups[0]).unwrap();
        assert_eq!(value["totalStock"], 7);
        assert_eq!(value["stocks"]["XL"], 7);
        assert_eq!(value["lowStockSizes"], serde_json::json!([]));
    }
}
