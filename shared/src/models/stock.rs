//! Sample Stock Models
//!
//! The warehouse ledger for sample products. `total_stock` is the
//! cumulative quantity ever received; `distributed` and the per-rep
//! allocation map grow as units are handed out, so the quantity still
//! on the shelf is always the derived [`StockItem::remaining`], never a
//! stored field of its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Warehouse stock item with its per-rep allocation ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: String,
    pub name: String,
    pub batch_number: Option<String>,
    /// Cumulative units received into the warehouse. The level
    /// endpoint sends the quantity currently on the shelf under
    /// `stock`; callers reconcile that against the hand-out history.
    #[serde(alias = "stock")]
    pub total_stock: i64,
    /// Units handed to reps so far
    #[serde(default)]
    pub distributed: i64,
    /// Live allocation per rep name
    #[serde(default)]
    pub mr_stocks: BTreeMap<String, i64>,
    pub unit_price: Option<f64>,
    pub expiry_date: Option<String>,
    pub description: Option<String>,
}

impl StockItem {
    /// Units still in the warehouse.
    pub fn remaining(&self) -> i64 {
        self.total_stock - self.distributed
    }

    /// Sum of the per-rep allocations.
    pub fn allocated_total(&self) -> i64 {
        self.mr_stocks.values().sum()
    }

    /// Record receipt of new units into the warehouse.
    pub fn receive(&mut self, quantity: i64) {
        self.total_stock += quantity;
    }

    /// Move units from the warehouse to a rep, keeping the ledger
    /// consistent. Fails when the warehouse cannot cover the quantity.
    pub fn distribute_to(&mut self, mr: &str, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if quantity > self.remaining() {
            return Err(DomainError::InsufficientStock {
                product: self.name.clone(),
                requested: quantity,
                available: self.remaining(),
            });
        }
        self.distributed += quantity;
        *self.mr_stocks.entry(mr.to_string()).or_insert(0) += quantity;
        Ok(())
    }

    /// Reverse an earlier hand-out (a deleted or edited visit report).
    /// The rep's allocation entry is dropped once it reaches zero, and
    /// `distributed` never falls below the allocations that remain.
    pub fn refund_from(&mut self, mr: &str, quantity: i64) {
        if let Some(held) = self.mr_stocks.get_mut(mr) {
            *held -= quantity;
            if *held <= 0 {
                self.mr_stocks.remove(mr);
            }
        }
        self.distributed = (self.distributed - quantity).max(self.allocated_total());
    }

    /// Clear the allocation ledger ahead of a replay from history.
    pub fn reset_allocations(&mut self) {
        self.distributed = 0;
        self.mr_stocks.clear();
    }
}

/// Create stock item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItemCreate {
    pub name: String,
    pub batch_number: Option<String>,
    pub total_stock: i64,
    pub unit_price: Option<f64>,
    pub expiry_date: Option<String>,
    pub description: Option<String>,
}

impl StockItem {
    /// Build a full record from a create payload and an assigned ID.
    pub fn from_create(id: String, payload: StockItemCreate) -> Self {
        Self {
            id,
            name: payload.name,
            batch_number: payload.batch_number,
            total_stock: payload.total_stock,
            distributed: 0,
            mr_stocks: BTreeMap::new(),
            unit_price: payload.unit_price,
            expiry_date: payload.expiry_date,
            description: payload.description,
        }
    }
}

/// Body for the stock level endpoint (PUT)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevelUpdate {
    pub name: String,
    pub stock: i64,
}

/// Body for the stock-received endpoint (POST)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockReceipt {
    /// Receiving rep; absent for plain warehouse receipts
    pub mr_name: Option<String>,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub date: String,
}

/// One hand-out of units to a rep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    /// Absent until assigned (locally or by the server)
    pub id: Option<i64>,
    pub date: String,
    /// Product name; history records match stock items by name
    pub product: String,
    pub mr: String,
    pub quantity: i64,
    pub recipient: Option<String>,
    pub notes: Option<String>,
}

/// Recompute every item's `distributed` and `mr_stocks` from the
/// distribution history. Receipts (`total_stock`) are left untouched,
/// so `remaining` reflects exactly the hand-outs that still exist.
pub fn rebuild_allocations(items: &mut [StockItem], history: &[Distribution]) {
    for item in items.iter_mut() {
        item.reset_allocations();
    }
    for record in history {
        if let Some(item) = items.iter_mut().find(|item| item.name == record.product) {
            item.distributed += record.quantity;
            *item.mr_stocks.entry(record.mr.clone()).or_insert(0) += record.quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(total: i64) -> StockItem {
        StockItem::from_create(
            "101".to_string(),
            StockItemCreate {
                name: "Paracetamol 500mg".to_string(),
                batch_number: Some("B-2025-08".to_string()),
                total_stock: total,
                unit_price: None,
                expiry_date: None,
                description: None,
            },
        )
    }

    #[test]
    fn distribution_moves_units_and_keeps_the_ledger_consistent() {
        let mut stock = item(100);
        stock.distribute_to("Alice", 30).unwrap();
        assert_eq!(stock.remaining(), 70);
        assert_eq!(stock.distributed, 30);
        assert_eq!(stock.mr_stocks.get("Alice"), Some(&30));
        assert!(stock.allocated_total() <= stock.distributed);
    }

    #[test]
    fn distribution_rejects_shortfalls_and_bad_quantities() {
        let mut stock = item(10);
        assert!(matches!(
            stock.distribute_to("Alice", 11),
            Err(DomainError::InsufficientStock { available: 10, .. })
        ));
        assert!(stock.distribute_to("Alice", 0).is_err());
        assert_eq!(stock.remaining(), 10);
    }

    #[test]
    fn refund_restores_the_warehouse_and_clears_empty_entries() {
        let mut stock = item(100);
        stock.distribute_to("Alice", 30).unwrap();
        stock.refund_from("Alice", 30);
        assert_eq!(stock.remaining(), 100);
        assert_eq!(stock.distributed, 0);
        assert!(stock.mr_stocks.is_empty());
    }

    #[test]
    fn partial_refund_keeps_the_rest_allocated() {
        let mut stock = item(100);
        stock.distribute_to("Alice", 30).unwrap();
        stock.refund_from("Alice", 10);
        assert_eq!(stock.remaining(), 80);
        assert_eq!(stock.mr_stocks.get("Alice"), Some(&20));
    }

    #[test]
    fn rebuild_replays_exactly_the_surviving_history() {
        let mut items = vec![item(100)];
        items[0].distribute_to("Alice", 30).unwrap();
        items[0].distribute_to("Bob", 10).unwrap();
        let history = vec![Distribution {
            id: Some(1),
            date: "2025-08-10".to_string(),
            product: "Paracetamol 500mg".to_string(),
            mr: "Bob".to_string(),
            quantity: 10,
            recipient: None,
            notes: None,
        }];
        rebuild_allocations(&mut items, &history);
        assert_eq!(items[0].remaining(), 90);
        assert_eq!(items[0].distributed, 10);
        assert!(items[0].mr_stocks.get("Alice").is_none());
        assert_eq!(items[0].mr_stocks.get("Bob"), Some(&10));
    }

    #[test]
    fn legacy_payloads_with_a_plain_stock_field_still_parse() {
        let parsed: StockItem =
            serde_json::from_str(r#"{"id":"7","name":"Ibuprofen","stock":40}"#).unwrap();
        assert_eq!(parsed.total_stock, 40);
        assert_eq!(parsed.distributed, 0);
        assert_eq!(parsed.remaining(), 40);
    }
}
