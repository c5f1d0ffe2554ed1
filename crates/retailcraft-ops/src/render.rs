use std::fmt::Write;

use retailcraft_core::{Branch, BranchUser, Customer, Product, Size};
use retailcraft_desk::DashboardTiles;
use retailcraft_inventory::GroupedInventory;

fn size_labels(sizes: &[Size]) -> String {
    sizes
        .iter()
        .map(|size| size.label())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn inventory(items: &[&GroupedInventory], deduplicated: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<24} {:<14}", "PRODUCT", "BARCODE");
    for size in Size::ALL {
        let _ = write!(out, " {:>5}", size.label());
    }
    let _ = writeln!(out, " {:>7}  FLAGS", "TOTAL");

    for item in items {
        let _ = write!(out, "{:<24} {:<14}", item.product_name, item.bar_code);
        for size in Size::ALL {
            match item.quantity(size) {
                Some(quantity) => {
                    let _ = write!(out, " {quantity:>5}");
                }
                None => {
                    let _ = write!(out, " {:>5}", "-");
                }
            }
        }
        let total = if deduplicated {
            item.deduplicated_total()
        } else {
            item.total_stock
        };
        let _ = write!(out, " {total:>7}");

        let mut flags = Vec::new();
        if item.is_low() {
            flags.push(format!("low:{}", size_labels(&item.low_stock_sizes)));
        }
        if item.is_out() {
            flags.push(format!("out:{}", size_labels(&item.out_of_stock_sizes)));
        }
        let _ = writeln!(out, "  {}", flags.join(" "));
    }

    let _ = write!(out, "{} product(s)", items.len());
    out
}

pub fn dashboard(tiles: &DashboardTiles) -> String {
    format!(
        "products: {}\nunits in stock: {}\nlow-stock lines: {}",
        tiles.total_products, tiles.total_stock, tiles.low_stock_count
    )
}

pub fn branches(branches: &[Branch]) -> String {
    let mut out = String::new();
    for branch in branches {
        let _ = writeln!(
            out,
            "{:<10} {:<24} {}, {}{}",
            branch.code,
            branch.name,
            branch.address.city,
            branch.address.state,
            if branch.active { "" } else { " (inactive)" }
        );
    }
    let _ = write!(out, "{} branch(es)", branches.len());
    out
}

pub fn users(users: &[BranchUser]) -> String {
    let mut out = String::new();
    for user in users {
        let _ = writeln!(out, "{:<24} {:<32} {}", user.name, user.email, user.branch_id);
    }
    let _ = write!(out, "{} user(s)", users.len());
    out
}

pub fn customers(customers: &[Customer]) -> String {
    let mut out = String::new();
    for customer in customers {
        let _ = writeln!(
            out,
            "{:<4} {:<28} {:<16} {}",
            customer.customer_type,
            customer.display_name(),
            customer.phone.as_deref().unwrap_or("-"),
            customer.address.city
        );
    }
    let _ = write!(out, "{} customer(s)", customers.len());
    out
}

pub fn products(products: &[Product]) -> String {
    let mut out = String::new();
    for product in products {
        let _ = writeln!(
            out,
            "{:<14} {:<24} b2b {:>10} b2c {:>10}",
            product.bar_code, product.name, product.b2b_price, product.b2c_price
        );
    }
    let _ = write!(out, "{} product(s)", products.len());
    out
}

#[cfg(test)]
mod tests {
    use retailcraft_core::StockRecord;
    use retailcraft_inventory::aggregate;

    use super::*;

    #[test]
    fn inventory_table_flags_low_and_out_sizes() {
        let records: Vec<StockRecord> = [(Size::M, 0), (Size::L, 5), (Size::XL, 20)]
            .into_iter()
            .map(|(size, quantity)| StockRecord {
                product_id: "p1".to_string(),
                product_name: "Shirt".to_string(),
                bar_code: "SH-1".to_string(),
                size,
                quantity,
            })
            .collect();
        let groups = aggregate(&records);
        let rows: Vec<_> = groups.iter().collect();

        let table = inventory(&rows, false);
        assert!(table.contains("low:L"));
        assert!(table.contains("out:M"));
        assert!(table.contains("     25"));
        assert!(table.ends_with("1 product(s)"));
    }

    #[test]
    fn dashboard_lists_each_tile() {
        let text = dashboard(&DashboardTiles {
            total_products: 3,
            total_stock: 40,
            low_stock_count: 1,
        });
        assert_eq!(text, "products: 3\nunits in stock: 40\nlow-stock lines: 1");
    }
}
