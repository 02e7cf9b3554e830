//! View models
//!
//! Data-only shapes consumed by whatever renders the UI: summary cards,
//! chart series, and per-rep stock totals. No templating lives here;
//! callers bind their own presentation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shared::models::StockItem;

/// Stock level band for badge coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    /// Band from remaining units: 0 is out, below 50 is low.
    pub fn for_remaining(remaining: i64) -> Self {
        match remaining {
            r if r <= 0 => Self::OutOfStock,
            r if r < 50 => Self::Low,
            _ => Self::InStock,
        }
    }
}

/// Headline cards for the samples page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total_stock: i64,
    pub total_distributed: i64,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
}

impl StockSummary {
    pub fn from_items(items: &[StockItem]) -> Self {
        let mut summary = Self::default();
        for item in items {
            summary.total_stock += item.total_stock;
            summary.total_distributed += item.distributed;
            match StockLevel::for_remaining(item.remaining()) {
                StockLevel::OutOfStock => summary.out_of_stock_items += 1,
                StockLevel::Low => summary.low_stock_items += 1,
                StockLevel::InStock => {}
            }
        }
        summary
    }
}

/// Per-rep holdings across all products, plus what the warehouse keeps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MrStockTotals {
    pub per_mr: BTreeMap<String, i64>,
    pub warehouse_remaining: i64,
}

impl MrStockTotals {
    pub fn from_items(items: &[StockItem]) -> Self {
        let mut totals = Self::default();
        for item in items {
            totals.warehouse_remaining += item.remaining();
            for (mr, qty) in &item.mr_stocks {
                *totals.per_mr.entry(mr.clone()).or_insert(0) += qty;
            }
        }
        totals
    }
}

/// Labels plus values for one chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    /// Build a series from label/value pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, f64)>) -> Self {
        let mut series = Self::default();
        for (label, value) in pairs {
            series.labels.push(label);
            series.values.push(value);
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::StockItemCreate;

    fn item(name: &str, total: i64, distributed_to: &[(&str, i64)]) -> StockItem {
        let mut item = StockItem::from_create(
            name.to_string(),
            StockItemCreate {
                name: name.to_string(),
                batch_number: None,
                total_stock: total,
                unit_price: None,
                expiry_date: None,
                description: None,
            },
        );
        for (mr, qty) in distributed_to {
            item.distribute_to(mr, *qty).unwrap();
        }
        item
    }

    #[test]
    fn stock_levels_band_at_zero_and_fifty() {
        assert_eq!(StockLevel::for_remaining(0), StockLevel::OutOfStock);
        assert_eq!(StockLevel::for_remaining(49), StockLevel::Low);
        assert_eq!(StockLevel::for_remaining(50), StockLevel::InStock);
    }

    #[test]
    fn summary_counts_bands_and_totals() {
        let items = vec![
            item("A", 100, &[("Alice", 60)]),
            item("B", 30, &[("Bob", 30)]),
        ];
        let summary = StockSummary::from_items(&items);
        assert_eq!(summary.total_stock, 130);
        assert_eq!(summary.total_distributed, 90);
        assert_eq!(summary.low_stock_items, 1); // A: 40 remaining
        assert_eq!(summary.out_of_stock_items, 1); // B: 0 remaining
    }

    #[test]
    fn per_mr_totals_aggregate_across_products() {
        let items = vec![
            item("A", 100, &[("Alice", 20), ("Bob", 10)]),
            item("B", 50, &[("Alice", 5)]),
        ];
        let totals = MrStockTotals::from_items(&items);
        assert_eq!(totals.per_mr.get("Alice"), Some(&25));
        assert_eq!(totals.per_mr.get("Bob"), Some(&10));
        assert_eq!(totals.warehouse_remaining, 70 + 45);
    }

    #[test]
    fn chart_series_keeps_pair_order() {
        let series =
            ChartSeries::from_pairs([("Jan".to_string(), 1.0), ("Feb".to_string(), 2.0)]);
        assert_eq!(series.labels, vec!["Jan", "Feb"]);
        assert_eq!(series.values, vec![1.0, 2.0]);
    }
}
