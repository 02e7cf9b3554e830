//! Visit report (daily call report) manager
//!
//! Submission consumes sample stock, deletion refunds it, and an edit
//! refunds the old lines before deducting the new ones. The sample
//! basket is drafted against effective availability, counting what the
//! draft itself already claims.

use shared::error::DomainResult;
use shared::list::Pagination;
use shared::models::{SampleGiven, StockItem, VisitReport, VisitReportCreate};
use shared::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use shared::{DomainError, list};

use crate::http::ApiClient;
use crate::resources::stock::StockManager;
use crate::store::{LocalStore, keys};
use crate::sync::{DataMode, SyncedResource};
use crate::{ClientResult, resources};

/// Rows shown per report page
pub const PAGE_SIZE: usize = 3;

/// Sample basket built up while filling in the report form
#[derive(Debug, Clone, Default)]
pub struct DraftBasket {
    lines: Vec<SampleGiven>,
}

impl DraftBasket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[SampleGiven] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units of one product already claimed by this draft.
    pub fn drafted_for(&self, product_id: &str) -> i64 {
        self.lines
            .iter()
            .filter(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .sum()
    }

    /// Add units of a product, merging with an existing line. The
    /// effective ceiling is what the warehouse holds minus what this
    /// draft has already claimed.
    pub fn add_line(&mut self, item: &StockItem, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        let available = item.remaining() - self.drafted_for(&item.id);
        if quantity > available {
            return Err(DomainError::InsufficientStock {
                product: item.name.clone(),
                requested: quantity,
                available,
            });
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == item.id) {
            line.quantity += quantity;
        } else {
            self.lines.push(SampleGiven {
                product_id: item.id.clone(),
                product_name: item.name.clone(),
                quantity,
            });
        }
        Ok(())
    }

    pub fn remove_line(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Consume the basket into a payload's sample list.
    pub fn into_lines(self) -> Vec<SampleGiven> {
        self.lines
    }
}

/// Manager for submitted visit reports, with its own page cursor
#[derive(Debug)]
pub struct VisitReportManager {
    api: ApiClient,
    store: LocalStore,
    resource: SyncedResource<VisitReport>,
    records: Vec<VisitReport>,
    mode: DataMode,
    page: usize,
}

impl VisitReportManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let resource = SyncedResource::new("dcrs", keys::VISIT_REPORTS);
        let mut records: Vec<VisitReport> = resource.load_local(&store);
        sort_newest_first(&mut records);
        Self {
            api,
            store,
            resource,
            records,
            mode: DataMode::Fallback,
            page: 1,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn records(&self) -> &[VisitReport] {
        &self.records
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = Pagination::new(page, PAGE_SIZE, self.records.len()).page;
    }

    pub async fn refresh(&mut self) -> DataMode {
        let (mode, mut records) = self.resource.refresh(&self.api, &self.store).await;
        sort_newest_first(&mut records);
        self.mode = mode;
        self.records = records;
        self.set_page(self.page);
        mode
    }

    /// The page at the manager's cursor, newest first.
    pub fn page_view(&self) -> (Vec<&VisitReport>, Pagination) {
        let refs: Vec<&VisitReport> = self.records.iter().collect();
        let paged = list::paginate(&refs, self.page, PAGE_SIZE);
        (paged.items.to_vec(), paged.pagination)
    }

    /// Reports filtered by search over title, doctor, and location.
    pub fn search(&self, term: &str) -> Vec<&VisitReport> {
        self.records
            .iter()
            .filter(|r| {
                list::matches_search(
                    term,
                    &[
                        &r.visit_title,
                        &r.doctor_name,
                        r.clinic_location.as_deref().unwrap_or(""),
                    ],
                )
            })
            .collect()
    }

    pub fn get(&self, report_id: i64) -> Option<&VisitReport> {
        self.records.iter().find(|r| r.report_id == report_id)
    }

    fn validate(payload: &VisitReportCreate) -> ClientResult<()> {
        validate_required_text(&payload.visit_title, "visit title", MAX_NAME_LEN)?;
        validate_required_text(&payload.visit_type, "visit type", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.doctor_name, "doctor name", MAX_NAME_LEN)?;
        validate_required_text(&payload.date_time, "date and time", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&payload.clinic_location, "location", MAX_ADDRESS_LEN)?;
        validate_optional_text(&payload.remarks, "remarks", MAX_NOTE_LEN)?;
        if let Some(rating) = payload.rating
            && !(1..=5).contains(&rating)
        {
            return Err(DomainError::validation("rating must be between 1 and 5").into());
        }
        for sample in &payload.samples_given {
            if sample.quantity <= 0 {
                return Err(DomainError::validation(format!(
                    "sample quantity for {} must be positive",
                    sample.product_name
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Submit a report and deduct its samples from stock. The cursor
    /// returns to page 1 so the new report is visible.
    pub async fn submit(
        &mut self,
        payload: VisitReportCreate,
        mr_name: &str,
        stock: &mut StockManager,
    ) -> ClientResult<i64> {
        Self::validate(&payload)?;
        stock.consume_samples(mr_name, &payload.samples_given)?;

        let report_id = if self.mode == DataMode::Api {
            match self.api.post::<VisitReport, _>("dcrs", &payload).await {
                Ok(created) => {
                    let id = created.report_id;
                    self.refresh().await;
                    self.page = 1;
                    return Ok(id);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "report submit failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                    self.local_insert(payload)
                }
            }
        } else {
            self.local_insert(payload)
        };
        self.page = 1;
        Ok(report_id)
    }

    fn local_insert(&mut self, payload: VisitReportCreate) -> i64 {
        let id = resources::next_id(self.records.iter().map(|r| r.report_id));
        self.records
            .push(VisitReport::from_create(id, payload, resources::now_stamp()));
        sort_newest_first(&mut self.records);
        self.resource.save_local(&self.store, &self.records);
        id
    }

    /// Re-submit a report: refund the old sample lines, deduct the new
    /// ones. A shortfall on the new lines restores the old deduction
    /// and leaves the report untouched.
    pub async fn edit(
        &mut self,
        report_id: i64,
        payload: VisitReportCreate,
        mr_name: &str,
        stock: &mut StockManager,
    ) -> ClientResult<()> {
        Self::validate(&payload)?;
        let old_samples = self
            .get(report_id)
            .ok_or_else(|| DomainError::not_found(format!("report {report_id}")))?
            .samples_given
            .clone();

        stock.refund_samples(mr_name, &old_samples);
        if let Err(e) = stock.consume_samples(mr_name, &payload.samples_given) {
            // restore the original deduction, which the refund just freed
            stock
                .consume_samples(mr_name, &old_samples)
                .unwrap_or_else(|restore| {
                    tracing::warn!(error = %restore, "could not restore samples after failed edit")
                });
            return Err(e);
        }

        if self.mode == DataMode::Api {
            match self
                .api
                .put::<VisitReport, _>(&format!("dcrs/{report_id}"), &payload)
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "report update failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(report) = self.records.iter_mut().find(|r| r.report_id == report_id) {
            let submission_time = report.submission_time.clone();
            *report = VisitReport::from_create(
                report_id,
                payload,
                submission_time.unwrap_or_else(resources::now_stamp),
            );
        }
        sort_newest_first(&mut self.records);
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Delete a report and refund its samples. When the last record of
    /// a trailing page goes away, the cursor steps back one page.
    pub async fn delete(
        &mut self,
        report_id: i64,
        mr_name: &str,
        stock: &mut StockManager,
    ) -> ClientResult<()> {
        let samples = self
            .get(report_id)
            .ok_or_else(|| DomainError::not_found(format!("report {report_id}")))?
            .samples_given
            .clone();

        if self.mode == DataMode::Api {
            match self.api.delete(&format!("dcrs/{report_id}")).await {
                Ok(()) => {
                    stock.refund_samples(mr_name, &samples);
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "report delete failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        stock.refund_samples(mr_name, &samples);
        self.records.retain(|r| r.report_id != report_id);
        self.resource.save_local(&self.store, &self.records);
        self.set_page(self.page);
        Ok(())
    }
}

fn sort_newest_first(records: &mut [VisitReport]) {
    records.sort_by(|a, b| b.date_time.cmp(&a.date_time));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use shared::models::StockItemCreate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, VisitReportManager, StockManager) {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::new("http://127.0.0.1:9").with_data_dir(dir.path());
        let api = ApiClient::new(&config).unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        (
            dir,
            VisitReportManager::new(api.clone(), store.clone()),
            StockManager::new(api, store),
        )
    }

    async fn seed_product(stock: &mut StockManager, name: &str, total: i64) -> String {
        stock
            .add_item(StockItemCreate {
                name: name.to_string(),
                batch_number: None,
                total_stock: total,
                unit_price: None,
                expiry_date: None,
                description: None,
            })
            .await
            .unwrap();
        stock.items().last().unwrap().id.clone()
    }

    fn report(title: &str, date_time: &str, samples: Vec<SampleGiven>) -> VisitReportCreate {
        VisitReportCreate {
            visit_title: title.to_string(),
            visit_type: "Clinic Visit".to_string(),
            doctor_id: None,
            doctor_name: "Dr. Mehta".to_string(),
            clinic_location: Some("City Clinic, Pune".to_string()),
            date_time: date_time.to_string(),
            rating: Some(4),
            remarks: None,
            samples_given: samples,
        }
    }

    fn line(product_id: &str, quantity: i64) -> SampleGiven {
        SampleGiven {
            product_id: product_id.to_string(),
            product_name: "sample".to_string(),
            quantity,
        }
    }

    #[tokio::test]
    async fn submit_deducts_and_delete_refunds_exactly() {
        let (_dir, mut reports, mut stock) = setup();
        let id = seed_product(&mut stock, "Paracetamol 500mg", 100).await;

        let report_id = reports
            .submit(
                report("Morning round", "2025-08-12T10:30", vec![line(&id, 30)]),
                "Alice",
                &mut stock,
            )
            .await
            .unwrap();
        assert_eq!(stock.get(&id).unwrap().remaining(), 70);
        assert_eq!(stock.get(&id).unwrap().mr_stocks.get("Alice"), Some(&30));

        reports.delete(report_id, "Alice", &mut stock).await.unwrap();
        assert_eq!(stock.get(&id).unwrap().remaining(), 100);
        assert!(stock.get(&id).unwrap().mr_stocks.get("Alice").is_none());
        assert!(reports.records().is_empty());
    }

    #[tokio::test]
    async fn edit_refunds_old_lines_then_deducts_new_ones() {
        let (_dir, mut reports, mut stock) = setup();
        let id = seed_product(&mut stock, "Paracetamol 500mg", 100).await;

        let report_id = reports
            .submit(
                report("Visit", "2025-08-12T10:30", vec![line(&id, 30)]),
                "Alice",
                &mut stock,
            )
            .await
            .unwrap();

        reports
            .edit(
                report_id,
                report("Visit", "2025-08-12T10:30", vec![line(&id, 10)]),
                "Alice",
                &mut stock,
            )
            .await
            .unwrap();
        assert_eq!(stock.get(&id).unwrap().remaining(), 90);
        assert_eq!(stock.get(&id).unwrap().mr_stocks.get("Alice"), Some(&10));
    }

    #[tokio::test]
    async fn failed_edit_restores_the_original_deduction() {
        let (_dir, mut reports, mut stock) = setup();
        let id = seed_product(&mut stock, "Paracetamol 500mg", 50).await;

        let report_id = reports
            .submit(
                report("Visit", "2025-08-12T10:30", vec![line(&id, 30)]),
                "Alice",
                &mut stock,
            )
            .await
            .unwrap();

        // 30 refunded, but 80 cannot be covered by 50 total
        let result = reports
            .edit(
                report_id,
                report("Visit", "2025-08-12T10:30", vec![line(&id, 80)]),
                "Alice",
                &mut stock,
            )
            .await;
        assert!(result.is_err());
        assert_eq!(stock.get(&id).unwrap().remaining(), 20);
        assert_eq!(stock.get(&id).unwrap().mr_stocks.get("Alice"), Some(&30));
        assert_eq!(reports.get(report_id).unwrap().samples_given[0].quantity, 30);
    }

    #[tokio::test]
    async fn draft_basket_enforces_effective_availability() {
        let (_dir, _reports, mut stock) = setup();
        let id = seed_product(&mut stock, "Paracetamol 500mg", 40).await;
        let item = stock.get(&id).unwrap().clone();

        let mut basket = DraftBasket::new();
        basket.add_line(&item, 25).unwrap();
        // 15 left once the draft's own claim counts
        assert!(matches!(
            basket.add_line(&item, 20),
            Err(DomainError::InsufficientStock { available: 15, .. })
        ));
        basket.add_line(&item, 15).unwrap();
        assert_eq!(basket.lines().len(), 1);
        assert_eq!(basket.drafted_for(&id), 40);

        basket.remove_line(&id);
        assert!(basket.is_empty());
    }

    #[tokio::test]
    async fn reports_list_newest_first_and_cursor_steps_back() {
        let (_dir, mut reports, mut stock) = setup();
        let id = seed_product(&mut stock, "Paracetamol 500mg", 100).await;

        for day in 1..=4 {
            reports
                .submit(
                    report(
                        &format!("Visit {day}"),
                        &format!("2025-08-0{day}T09:00"),
                        vec![line(&id, 1)],
                    ),
                    "Alice",
                    &mut stock,
                )
                .await
                .unwrap();
        }
        let (page, pagination) = reports.page_view();
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(page[0].visit_title, "Visit 4");

        // trailing page with a single record; deleting it steps back
        reports.set_page(2);
        let trailing_id = reports.page_view().0[0].report_id;
        reports.delete(trailing_id, "Alice", &mut stock).await.unwrap();
        assert_eq!(reports.current_page(), 1);
    }
}
