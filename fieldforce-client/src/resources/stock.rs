//! Sample stock manager
//!
//! Holds the warehouse ledger (stock items plus the distribution
//! history) and the compound hand-out operation. The backend's level
//! endpoint is per product (`mr-stock/{id}?userName=`) and reports the
//! quantity currently on the shelf, so level writes send the adjusted
//! current level and refreshed records are lifted back to cumulative
//! totals against the replayed history. The network side of a
//! distribution is three calls with no transaction: the stock level
//! update decides success, the receipt credit and history record are
//! best-effort.

use shared::list::{Pagination, paginate};
use shared::models::{
    Distribution, StockItem, StockItemCreate, StockLevelUpdate, StockReceipt, rebuild_allocations,
};
use shared::validation::{MAX_NAME_LEN, validate_positive, validate_required_text};
use shared::{DomainError, list};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::{DataMode, SyncedResource};
use crate::view::{MrStockTotals, StockSummary};
use crate::{ClientResult, resources};

/// Rows shown per stock page
pub const PAGE_SIZE: usize = 6;

/// Stock filter band, matching the level badges plus a medium/high split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBand {
    Out,
    Low,
    Medium,
    High,
}

impl StockBand {
    /// Bands over remaining units: 0 / below 50 / 50 to 100 / above 100.
    pub fn for_remaining(remaining: i64) -> Self {
        match remaining {
            r if r <= 0 => Self::Out,
            r if r < 50 => Self::Low,
            r if r <= 100 => Self::Medium,
            _ => Self::High,
        }
    }
}

/// Filters for the stock table
#[derive(Debug, Clone, Default)]
pub struct StockFilter {
    /// Substring over name, batch number, and description
    pub search: String,
    /// Exact product name, empty for all
    pub product: String,
    /// Only items with an allocation for this rep, empty for all
    pub mr: String,
    pub band: Option<StockBand>,
}

impl StockFilter {
    fn matches(&self, item: &StockItem) -> bool {
        if !self.product.is_empty() && item.name != self.product {
            return false;
        }
        if !self.mr.is_empty() && !item.mr_stocks.contains_key(&self.mr) {
            return false;
        }
        if let Some(band) = self.band
            && StockBand::for_remaining(item.remaining()) != band
        {
            return false;
        }
        list::matches_search(
            &self.search,
            &[
                &item.name,
                item.batch_number.as_deref().unwrap_or(""),
                item.description.as_deref().unwrap_or(""),
            ],
        )
    }
}

/// Manager for warehouse stock and distributions
#[derive(Debug)]
pub struct StockManager {
    api: ApiClient,
    store: LocalStore,
    items_resource: SyncedResource<StockItem>,
    history_resource: SyncedResource<Distribution>,
    items: Vec<StockItem>,
    history: Vec<Distribution>,
    mode: DataMode,
}

impl StockManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let items_resource = SyncedResource::new("mr-stock", keys::STOCK);
        let history_resource = SyncedResource::new("distributions", keys::DISTRIBUTIONS);
        let items = items_resource.load_local(&store);
        let history = history_resource.load_local(&store);
        Self {
            api,
            store,
            items_resource,
            history_resource,
            items,
            history,
            mode: DataMode::Fallback,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn history(&self) -> &[Distribution] {
        &self.history
    }

    /// Fetch shelf levels and distribution history together; the level
    /// fetch decides the mode. API records arrive with current levels
    /// and get lifted to cumulative totals against the history.
    pub async fn refresh(&mut self) -> DataMode {
        let items_resource = SyncedResource::<StockItem>::new("mr-stock", keys::STOCK)
            .with_query("userName", self.user_name());
        let (items, history) = tokio::join!(
            items_resource.refresh(&self.api, &self.store),
            self.history_resource.refresh(&self.api, &self.store),
        );
        let (mode, items) = items;
        let (_, history) = history;
        let previous = std::mem::replace(&mut self.items, items);
        self.history = history;
        self.mode = mode;
        if mode == DataMode::Api {
            self.absorb_wire_levels(&previous);
        }
        mode
    }

    /// The level endpoint reports the quantity currently on the shelf.
    /// Replay the hand-out history, then raise `total_stock` so the
    /// derived remaining equals the reported level. Metadata the level
    /// endpoint does not carry comes from the previous records.
    fn absorb_wire_levels(&mut self, previous: &[StockItem]) {
        rebuild_allocations(&mut self.items, &self.history);
        for item in &mut self.items {
            item.total_stock += item.distributed;
            if let Some(prev) = previous.iter().find(|p| p.id == item.id) {
                if item.batch_number.is_none() {
                    item.batch_number = prev.batch_number.clone();
                }
                if item.unit_price.is_none() {
                    item.unit_price = prev.unit_price;
                }
                if item.expiry_date.is_none() {
                    item.expiry_date = prev.expiry_date.clone();
                }
                if item.description.is_none() {
                    item.description = prev.description.clone();
                }
            }
        }
        self.items_resource.save_local(&self.store, &self.items);
    }

    /// Recompute every item's allocation ledger from the distribution
    /// history. Receipts stay fixed; only `distributed` and the per-rep
    /// map are rebuilt.
    pub fn apply_distributions(&mut self) {
        rebuild_allocations(&mut self.items, &self.history);
        self.items_resource.save_local(&self.store, &self.items);
    }

    pub fn filtered(&self, filter: &StockFilter) -> Vec<&StockItem> {
        self.items.iter().filter(|i| filter.matches(i)).collect()
    }

    pub fn page(&self, filter: &StockFilter, page: usize) -> (Vec<&StockItem>, Pagination) {
        let filtered = self.filtered(filter);
        let paged = paginate(&filtered, page, PAGE_SIZE);
        (paged.items.to_vec(), paged.pagination)
    }

    pub fn get(&self, product_id: &str) -> Option<&StockItem> {
        self.items.iter().find(|i| i.id == product_id)
    }

    pub fn summary(&self) -> StockSummary {
        StockSummary::from_items(&self.items)
    }

    pub fn mr_totals(&self) -> MrStockTotals {
        MrStockTotals::from_items(&self.items)
    }

    /// Register a new sample product.
    pub async fn add_item(&mut self, payload: StockItemCreate) -> ClientResult<()> {
        validate_required_text(&payload.name, "product name", MAX_NAME_LEN)?;
        validate_positive(payload.total_stock, "total stock")?;

        if self.mode == DataMode::Api {
            match self.api.post::<StockItem, _>("products", &payload).await {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "product create failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        let id = next_string_id(&self.items);
        self.items.push(StockItem::from_create(id, payload));
        self.items_resource.save_local(&self.store, &self.items);
        Ok(())
    }

    /// Receive more units of an existing product into the warehouse.
    /// In API mode the current shelf level is read back first, the
    /// raised level is PUT, and a receipt is credited best-effort.
    pub async fn add_stock(&mut self, product_id: &str, quantity: i64) -> ClientResult<()> {
        validate_positive(quantity, "quantity")?;
        let item = self
            .get(product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;
        let name = item.name.clone();

        if self.mode == DataMode::Api {
            match self.fetch_level(product_id).await {
                Ok(level) => {
                    match self
                        .put_level(product_id, &level.name, level.stock + quantity)
                        .await
                    {
                        Ok(()) => {
                            let receipt = StockReceipt {
                                mr_name: None,
                                product_id: product_id.to_string(),
                                product_name: name.clone(),
                                quantity,
                                date: resources::today(),
                            };
                            if let Err(e) = self
                                .api
                                .post_opt::<serde_json::Value, _>("stock-received", &receipt)
                                .await
                            {
                                tracing::warn!(error = %e, "receipt credit failed, shelf level already updated");
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "stock level update failed, switching to fallback");
                            self.mode = DataMode::Fallback;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stock level read failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == product_id) {
            item.receive(quantity);
        }
        self.items_resource.save_local(&self.store, &self.items);
        Ok(())
    }

    /// Hand units to a rep: check the warehouse can cover it, push the
    /// lowered level (API mode), credit the rep's receipt and record
    /// the hand-out in the history, update the local ledger, then
    /// re-sync so server-assigned IDs replace the locally picked ones.
    pub async fn distribute(
        &mut self,
        product_id: &str,
        mr: &str,
        quantity: i64,
        recipient: Option<String>,
        notes: Option<String>,
    ) -> ClientResult<()> {
        validate_required_text(mr, "rep name", MAX_NAME_LEN)?;
        validate_positive(quantity, "quantity")?;
        let item = self
            .get(product_id)
            .ok_or_else(|| DomainError::not_found(format!("product {product_id}")))?;
        if quantity > item.remaining() {
            return Err(DomainError::InsufficientStock {
                product: item.name.clone(),
                requested: quantity,
                available: item.remaining(),
            }
            .into());
        }
        let name = item.name.clone();

        let record = Distribution {
            id: None,
            date: resources::today(),
            product: name.clone(),
            mr: mr.to_string(),
            quantity,
            recipient,
            notes,
        };

        let mut synced = false;
        if self.mode == DataMode::Api {
            match self.fetch_level(product_id).await {
                Ok(level) => {
                    if level.stock < quantity {
                        return Err(DomainError::InsufficientStock {
                            product: name,
                            requested: quantity,
                            available: level.stock,
                        }
                        .into());
                    }
                    match self
                        .put_level(product_id, &level.name, level.stock - quantity)
                        .await
                    {
                        Ok(()) => {
                            let receipt = StockReceipt {
                                mr_name: Some(mr.to_string()),
                                product_id: product_id.to_string(),
                                product_name: name.clone(),
                                quantity,
                                date: record.date.clone(),
                            };
                            if let Err(e) = self
                                .api
                                .post_opt::<serde_json::Value, _>("stock-received", &receipt)
                                .await
                            {
                                tracing::warn!(error = %e, "rep receipt credit failed, views may disagree until next sync");
                            }
                            if let Err(e) = self
                                .api
                                .post_opt::<Distribution, _>("distributions", &record)
                                .await
                            {
                                tracing::warn!(error = %e, "distribution record post failed");
                            }
                            synced = true;
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "stock level update failed, switching to fallback");
                            self.mode = DataMode::Fallback;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stock level read failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == product_id) {
            item.distribute_to(mr, quantity)?;
        }
        let mut record = record;
        record.id = Some(resources::next_id(
            self.history.iter().filter_map(|d| d.id),
        ));
        self.history.push(record);
        self.items_resource.save_local(&self.store, &self.items);
        self.history_resource.save_local(&self.store, &self.history);

        if synced {
            self.refresh().await;
        }
        Ok(())
    }

    fn user_name(&self) -> String {
        self.store.profile().0.unwrap_or_default()
    }

    /// Read the server's current shelf level for one product.
    async fn fetch_level(&self, product_id: &str) -> ClientResult<StockLevelUpdate> {
        let user = self.user_name();
        self.api
            .get_query(
                &format!("mr-stock/{product_id}"),
                &[("userName", user.as_str())],
            )
            .await
    }

    async fn put_level(&self, product_id: &str, name: &str, stock: i64) -> ClientResult<()> {
        let user = self.user_name();
        let level = StockLevelUpdate {
            name: name.to_string(),
            stock,
        };
        self.api
            .put_query::<serde_json::Value, _, _>(
                &format!("mr-stock/{product_id}"),
                &[("userName", user.as_str())],
                &level,
            )
            .await?;
        Ok(())
    }

    /// Deduct the samples consumed by a submitted visit report. Checked
    /// up front so a shortfall on any line leaves nothing deducted.
    pub(crate) fn consume_samples(
        &mut self,
        mr: &str,
        samples: &[shared::models::SampleGiven],
    ) -> ClientResult<()> {
        for sample in samples {
            let item = self.get(&sample.product_id).ok_or_else(|| {
                DomainError::not_found(format!("product {}", sample.product_id))
            })?;
            if sample.quantity > item.remaining() {
                return Err(DomainError::InsufficientStock {
                    product: item.name.clone(),
                    requested: sample.quantity,
                    available: item.remaining(),
                }
                .into());
            }
        }
        for sample in samples {
            if let Some(item) = self.items.iter_mut().find(|i| i.id == sample.product_id) {
                item.distribute_to(mr, sample.quantity)?;
            }
        }
        self.items_resource.save_local(&self.store, &self.items);
        Ok(())
    }

    /// Refund the samples of a deleted or re-edited visit report.
    pub(crate) fn refund_samples(&mut self, mr: &str, samples: &[shared::models::SampleGiven]) {
        for sample in samples {
            if let Some(item) = self.items.iter_mut().find(|i| i.id == sample.product_id) {
                item.refund_from(mr, sample.quantity);
            }
        }
        self.items_resource.save_local(&self.store, &self.items);
    }

    /// Distinct product names for the filter dropdown, sorted.
    pub fn product_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.items.iter().map(|i| i.name.clone()).collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Fallback string IDs continue the numeric sequence where possible.
fn next_string_id(items: &[StockItem]) -> String {
    let max = items
        .iter()
        .filter_map(|i| i.id.parse::<i64>().ok())
        .max()
        .unwrap_or(100);
    (max + 1).to_string()
}
