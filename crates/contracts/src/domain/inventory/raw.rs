use serde::{Deserialize, Serialize};

/// Product record as returned by the upstream inventory API.
///
/// Every numeric field the upstream may omit is modelled as an `Option`;
/// defaulting happens in the aggregation step, never during parsing, so a
/// legitimate value of 0 is distinguishable from an absent field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProduct {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub sellables: Vec<RawSellable>,
}

/// A sellable variant (SKU) belonging to a parent product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSellable {
    #[serde(default)]
    pub sku_code: Option<String>,
    #[serde(default)]
    pub full_title: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub cost_price: Option<f64>,
    #[serde(default)]
    pub profit: Option<f64>,
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default)]
    pub total_quantity_sold: Option<i64>,
    #[serde(default)]
    pub min_reorder_level: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub inventory: Option<RawInventory>,
}

/// Stock counts across all warehouses for one sellable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInventory {
    #[serde(default)]
    pub physical_stock_level_at_all_warehouses: Option<i64>,
    #[serde(default)]
    pub allocated_stock_level_at_all_warehouses: Option<i64>,
    #[serde(default)]
    pub available_stock_level_at_all_warehouses: Option<i64>,
}
