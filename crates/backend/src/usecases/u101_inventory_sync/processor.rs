use std::collections::HashMap;

use contracts::domain::inventory::{
    CategorySummary, EnrichedItem, InventorySnapshot, RawProduct, RawSellable, StatusBucket,
    StockStatus,
};

const DAYS_PER_YEAR: f64 = 365.0;
const DEFAULT_REORDER_LEVEL: i64 = 5;
/// Divisor floor for the status classifier when a sellable never sold.
const MIN_DAILY_SALES: f64 = 0.1;
const TOP_SELLERS_LIMIT: usize = 20;
const TOP_CATEGORIES_LIMIT: usize = 10;

/// Turn the raw upstream records into the served snapshot.
///
/// Pure and deterministic: no I/O, no shared state. Every product is
/// flattened into one [`EnrichedItem`] per sellable, then the fleet-wide
/// aggregates are computed over the flattened sequence.
pub fn process_inventory(products: &[RawProduct]) -> InventorySnapshot {
    let items: Vec<EnrichedItem> = products
        .iter()
        .flat_map(|product| {
            product
                .sellables
                .iter()
                .map(move |sellable| enrich_sellable(product, sellable))
        })
        .collect();

    let low_stock_products: Vec<EnrichedItem> =
        items.iter().filter(|p| p.is_low_stock).cloned().collect();
    let out_of_stock_products: Vec<EnrichedItem> =
        items.iter().filter(|p| p.is_out_of_stock).cloned().collect();

    // Stable sort keeps input order for equal sale counts.
    let mut top_selling_products = items.clone();
    top_selling_products.sort_by(|a, b| b.total_sold.cmp(&a.total_sold));
    top_selling_products.truncate(TOP_SELLERS_LIMIT);

    let total_stock_value = round2(items.iter().map(|p| p.stock_value).sum());

    let average_turnover_rate = if items.is_empty() {
        0.0
    } else {
        round2(items.iter().map(|p| p.turnover_rate).sum::<f64>() / items.len() as f64)
    };

    let stock_status_distribution = StockStatus::ALL
        .iter()
        .filter_map(|status| {
            let count = items.iter().filter(|p| p.status == *status).count();
            if count == 0 {
                return None;
            }
            Some(StatusBucket {
                name: status.label().to_string(),
                value: count,
                color: status.color().to_string(),
            })
        })
        .collect();

    let top_categories = top_categories(&items);

    InventorySnapshot {
        total_products: items.len(),
        low_stock_count: low_stock_products.len(),
        out_of_stock_count: out_of_stock_products.len(),
        products: items,
        low_stock_products,
        out_of_stock_products,
        top_selling_products,
        total_stock_value,
        average_turnover_rate,
        stock_status_distribution,
        top_categories,
    }
}

fn enrich_sellable(product: &RawProduct, sellable: &RawSellable) -> EnrichedItem {
    let inventory = sellable.inventory.as_ref();
    let stock_level = inventory
        .and_then(|i| i.physical_stock_level_at_all_warehouses)
        .unwrap_or(0);
    let allocated_stock = inventory
        .and_then(|i| i.allocated_stock_level_at_all_warehouses)
        .unwrap_or(0);
    let available_stock = inventory
        .and_then(|i| i.available_stock_level_at_all_warehouses)
        .unwrap_or(0);
    let total_sold = sellable.total_quantity_sold.unwrap_or(0);
    let reorder_level = sellable.min_reorder_level.unwrap_or(DEFAULT_REORDER_LEVEL);
    let cost_price = sellable.cost_price.unwrap_or(0.0);

    let turnover_rate = if stock_level > 0 {
        (total_sold as f64 / stock_level as f64) * 100.0
    } else {
        0.0
    };

    let avg_daily_sales = total_sold as f64 / DAYS_PER_YEAR;
    // A sellable that never sold depletes never: the field carries the
    // infinity sentinel (null on the wire), while the status classifier
    // applies the 0.1 floor instead. The two policies diverge on purpose.
    let days_of_stock_remaining = if avg_daily_sales > 0.0 {
        (available_stock as f64 / avg_daily_sales).round()
    } else {
        f64::INFINITY
    };

    EnrichedItem {
        id: product.id,
        title: sellable
            .full_title
            .clone()
            .unwrap_or_else(|| product.title.clone()),
        sku: sellable.sku_code.clone(),
        price: sellable.price.unwrap_or(0.0),
        cost_price,
        stock_level,
        allocated_stock,
        available_stock,
        total_sold,
        profit: sellable.profit.unwrap_or(0.0),
        margin: sellable.margin.unwrap_or(0.0),
        image_url: sellable
            .image_url
            .clone()
            .or_else(|| product.thumbnail_url.clone()),
        is_low_stock: available_stock <= reorder_level && available_stock > 0,
        is_out_of_stock: available_stock == 0,
        reorder_level,
        turnover_rate: round2(turnover_rate),
        stock_value: round2(available_stock as f64 * cost_price),
        days_of_stock_remaining,
        status: classify_stock_status(available_stock, total_sold, reorder_level),
    }
}

/// Classify one sellable's stock position from its available stock, lifetime
/// sales and reorder level.
pub fn classify_stock_status(available: i64, total_sold: i64, reorder_level: i64) -> StockStatus {
    if available == 0 {
        return StockStatus::Critical;
    }
    if available <= reorder_level {
        return StockStatus::Low;
    }

    let avg_daily_sales = total_sold as f64 / DAYS_PER_YEAR;
    let divisor = if avg_daily_sales > 0.0 {
        avg_daily_sales
    } else {
        MIN_DAILY_SALES
    };
    let days_of_stock = available as f64 / divisor;

    if days_of_stock < 7.0 {
        StockStatus::Low
    } else if days_of_stock < 30.0 {
        StockStatus::Adequate
    } else if days_of_stock < 90.0 {
        StockStatus::Good
    } else {
        StockStatus::Overstock
    }
}

/// Group items by the first whitespace-delimited token of their title and
/// keep the ten categories with the highest summed stock value.
fn top_categories(items: &[EnrichedItem]) -> Vec<CategorySummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    // First-seen order; the sort below is stable and by value only.
    let mut categories: Vec<CategorySummary> = Vec::new();

    for item in items {
        let name = item.title.split_whitespace().next().unwrap_or("Other");
        let position = match index.get(name) {
            Some(&position) => position,
            None => {
                index.insert(name.to_string(), categories.len());
                categories.push(CategorySummary {
                    name: name.to_string(),
                    stock_level: 0,
                    value: 0.0,
                });
                categories.len() - 1
            }
        };
        categories[position].stock_level += item.available_stock;
        categories[position].value += item.stock_value;
    }

    categories.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    categories.truncate(TOP_CATEGORIES_LIMIT);
    categories
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::inventory::RawInventory;

    fn sellable(available: i64, sold: i64, reorder: i64) -> RawSellable {
        RawSellable {
            sku_code: Some(format!("SKU-{available}-{sold}")),
            total_quantity_sold: Some(sold),
            min_reorder_level: Some(reorder),
            cost_price: Some(2.5),
            inventory: Some(RawInventory {
                physical_stock_level_at_all_warehouses: Some(available),
                allocated_stock_level_at_all_warehouses: Some(0),
                available_stock_level_at_all_warehouses: Some(available),
            }),
            ..Default::default()
        }
    }

    fn product(id: i64, title: &str, sellables: Vec<RawSellable>) -> RawProduct {
        RawProduct {
            id,
            title: title.to_string(),
            thumbnail_url: Some("https://img.example/p.png".to_string()),
            sellables,
        }
    }

    #[test]
    fn out_of_stock_item_is_critical() {
        let snapshot = process_inventory(&[product(1, "Widget One", vec![sellable(0, 10, 5)])]);

        let item = &snapshot.products[0];
        assert_eq!(item.status, StockStatus::Critical);
        assert!(item.is_out_of_stock);
        assert!(!item.is_low_stock);
        assert_eq!(snapshot.out_of_stock_count, 1);
        assert_eq!(snapshot.low_stock_count, 0);
    }

    #[test]
    fn zero_sales_item_with_stock_is_overstock() {
        // avgDailySales = 0, classifier divides by the 0.1 floor:
        // 10 / 0.1 = 100 days => overstock.
        let snapshot = process_inventory(&[product(1, "Widget", vec![sellable(10, 0, 5)])]);

        let item = &snapshot.products[0];
        assert_eq!(item.status, StockStatus::Overstock);
        // The per-item field uses the other policy: unbounded.
        assert!(item.days_of_stock_remaining.is_infinite());
    }

    #[test]
    fn low_stock_flag_matches_status() {
        let snapshot = process_inventory(&[product(1, "Widget", vec![sellable(3, 50, 5)])]);

        let item = &snapshot.products[0];
        assert!(item.is_low_stock);
        assert!(!item.is_out_of_stock);
        assert_eq!(item.status, StockStatus::Low);
        assert_eq!(snapshot.low_stock_products.len(), 1);
    }

    #[test]
    fn classifier_thresholds() {
        // 100 available, reorder 5; sold per year drives days-of-stock.
        assert_eq!(classify_stock_status(100, 36500, 5), StockStatus::Low); // 1 day
        assert_eq!(classify_stock_status(100, 3650, 5), StockStatus::Adequate); // 10 days
        assert_eq!(classify_stock_status(100, 730, 5), StockStatus::Good); // 50 days
        assert_eq!(classify_stock_status(100, 365, 5), StockStatus::Overstock); // 100 days
        assert_eq!(classify_stock_status(0, 0, 5), StockStatus::Critical);
        assert_eq!(classify_stock_status(5, 365, 5), StockStatus::Low);
    }

    #[test]
    fn numeric_fields_default_when_absent() {
        let bare = RawSellable::default();
        let snapshot = process_inventory(&[product(7, "Bare Product", vec![bare])]);

        let item = &snapshot.products[0];
        assert_eq!(item.stock_level, 0);
        assert_eq!(item.available_stock, 0);
        assert_eq!(item.total_sold, 0);
        assert_eq!(item.reorder_level, 5);
        assert_eq!(item.price, 0.0);
        assert_eq!(item.turnover_rate, 0.0);
        assert_eq!(item.status, StockStatus::Critical);
        assert_eq!(item.title, "Bare Product");
        assert_eq!(item.image_url.as_deref(), Some("https://img.example/p.png"));
    }

    #[test]
    fn top_sellers_sorted_and_capped() {
        let products: Vec<RawProduct> = (0..25)
            .map(|i| product(i, "Widget", vec![sellable(50, i * 10, 5)]))
            .collect();
        let snapshot = process_inventory(&products);

        assert_eq!(snapshot.top_selling_products.len(), 20);
        let sold: Vec<i64> = snapshot
            .top_selling_products
            .iter()
            .map(|p| p.total_sold)
            .collect();
        let mut expected = sold.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(sold, expected);
        assert_eq!(sold[0], 240);
    }

    #[test]
    fn status_distribution_sums_to_total_and_drops_empty_buckets() {
        let products = vec![
            product(1, "A", vec![sellable(0, 10, 5)]),   // critical
            product(2, "B", vec![sellable(3, 100, 5)]),  // low
            product(3, "C", vec![sellable(100, 365, 5)]), // overstock
        ];
        let snapshot = process_inventory(&products);

        let total: usize = snapshot
            .stock_status_distribution
            .iter()
            .map(|b| b.value)
            .sum();
        assert_eq!(total, snapshot.total_products);
        assert!(snapshot.stock_status_distribution.iter().all(|b| b.value > 0));
        let names: Vec<&str> = snapshot
            .stock_status_distribution
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(names, vec!["Critical (Out of Stock)", "Low Stock", "Overstock"]);
    }

    #[test]
    fn categories_grouped_by_first_title_word() {
        let products = vec![
            product(1, "Mango Ice 100ml", vec![sellable(10, 365, 5)]),
            product(2, "Mango Tango 50ml", vec![sellable(20, 365, 5)]),
            product(3, "Berry Blast", vec![sellable(5, 365, 2)]),
            product(4, "", vec![sellable(8, 365, 5)]),
        ];
        let snapshot = process_inventory(&products);

        let mango = snapshot
            .top_categories
            .iter()
            .find(|c| c.name == "Mango")
            .unwrap();
        assert_eq!(mango.stock_level, 30);
        assert_eq!(mango.value, 75.0);
        assert!(snapshot.top_categories.iter().any(|c| c.name == "Other"));
        // Sorted descending by summed stock value.
        let values: Vec<f64> = snapshot.top_categories.iter().map(|c| c.value).collect();
        let mut expected = values.clone();
        expected.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(values, expected);
    }

    #[test]
    fn derived_metrics_are_rounded() {
        let mut s = sellable(3, 100, 2);
        s.cost_price = Some(1.333);
        let snapshot = process_inventory(&[product(1, "Widget", vec![s])]);

        let item = &snapshot.products[0];
        // 100 / 3 * 100 = 3333.333... -> 3333.33
        assert_eq!(item.turnover_rate, 3333.33);
        // 3 * 1.333 = 3.999 -> 4.0
        assert_eq!(item.stock_value, 4.0);
        // 3 / (100 / 365) = 10.95 -> 11
        assert_eq!(item.days_of_stock_remaining, 11.0);
    }

    #[test]
    fn absent_sku_and_image_are_omitted_from_json() {
        let mut bare_product = product(9, "Bare Widget", vec![RawSellable::default()]);
        bare_product.thumbnail_url = None;
        let snapshot = process_inventory(&[bare_product]);

        let value = serde_json::to_value(&snapshot.products[0]).unwrap();
        let object = value.as_object().unwrap();
        // The upstream-facing original drops undefined keys entirely.
        assert!(!object.contains_key("sku"));
        assert!(!object.contains_key("imageUrl"));

        let snapshot = process_inventory(&[product(1, "Widget", vec![sellable(1, 1, 5)])]);
        let value = serde_json::to_value(&snapshot.products[0]).unwrap();
        assert!(value.as_object().unwrap().contains_key("sku"));
        assert!(value.as_object().unwrap().contains_key("imageUrl"));
    }

    #[test]
    fn processing_is_deterministic() {
        let products = vec![
            product(1, "Mango Ice", vec![sellable(10, 20, 5), sellable(0, 3, 5)]),
            product(2, "Berry Blast", vec![sellable(7, 0, 5)]),
        ];

        let a = serde_json::to_string(&process_inventory(&products)).unwrap();
        let b = serde_json::to_string(&process_inventory(&products)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_yields_empty_snapshot() {
        let snapshot = process_inventory(&[]);
        assert_eq!(snapshot.total_products, 0);
        assert_eq!(snapshot.average_turnover_rate, 0.0);
        assert_eq!(snapshot.total_stock_value, 0.0);
        assert!(snapshot.stock_status_distribution.is_empty());
        assert!(snapshot.top_categories.is_empty());
    }
}
