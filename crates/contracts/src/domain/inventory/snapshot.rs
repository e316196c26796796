use serde::{Deserialize, Serialize};

// ============================================================================
// Stock status
// ============================================================================

/// Classification of one sellable's stock position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Critical,
    Low,
    Adequate,
    Good,
    Overstock,
}

impl StockStatus {
    /// Fixed display order for the status distribution.
    pub const ALL: [StockStatus; 5] = [
        StockStatus::Critical,
        StockStatus::Low,
        StockStatus::Adequate,
        StockStatus::Good,
        StockStatus::Overstock,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical (Out of Stock)",
            Self::Low => "Low Stock",
            Self::Adequate => "Adequate",
            Self::Good => "Good",
            Self::Overstock => "Overstock",
        }
    }

    /// Chart color used by the dashboard for this status.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Critical => "#ef4444",
            Self::Low => "#f97316",
            Self::Adequate => "#eab308",
            Self::Good => "#10b981",
            Self::Overstock => "#3b82f6",
        }
    }
}

// ============================================================================
// Enriched item
// ============================================================================

/// One (product, sellable) pair with its derived metrics. This is the unit
/// the service serves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedItem {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub price: f64,
    pub cost_price: f64,
    pub stock_level: i64,
    pub allocated_stock: i64,
    pub available_stock: i64,
    pub total_sold: i64,
    pub profit: f64,
    pub margin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_low_stock: bool,
    pub is_out_of_stock: bool,
    pub reorder_level: i64,
    /// Units sold as a percentage of current physical stock, 2 decimals.
    pub turnover_rate: f64,
    /// Available stock valued at cost price, 2 decimals.
    pub stock_value: f64,
    /// Projected days until available stock depletes at the observed sale
    /// rate. Positive infinity when nothing was ever sold; serde_json emits
    /// `null` for non-finite floats, which is the wire shape consumers expect.
    pub days_of_stock_remaining: f64,
    pub status: StockStatus,
}

// ============================================================================
// Fleet-wide aggregates
// ============================================================================

/// One slice of the status distribution chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBucket {
    pub name: String,
    pub value: usize,
    pub color: String,
}

/// Stock totals for one title-derived category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub stock_level: i64,
    pub value: f64,
}

/// The full cached payload: every enriched item plus the derived aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySnapshot {
    pub products: Vec<EnrichedItem>,
    pub low_stock_products: Vec<EnrichedItem>,
    pub out_of_stock_products: Vec<EnrichedItem>,
    pub top_selling_products: Vec<EnrichedItem>,
    pub total_products: usize,
    pub total_stock_value: f64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub average_turnover_rate: f64,
    pub stock_status_distribution: Vec<StatusBucket>,
    pub top_categories: Vec<CategorySummary>,
}
