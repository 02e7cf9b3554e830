//! Expense claims manager

use shared::list::{Pagination, paginate};
use shared::models::{Expense, ExpenseApproval, ExpenseCreate, ExpenseRejection, ExpenseStatus};
use shared::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_optional_text,
    validate_required_text,
};
use shared::{DomainError, list};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::{DataMode, SyncedResource};
use crate::{ClientResult, resources};

/// Rows shown per expense page
pub const PAGE_SIZE: usize = 6;

/// Filters for the expense table
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Substring over rep name, category, and description
    pub search: String,
    pub status: Option<ExpenseStatus>,
    /// Exact category, empty for all
    pub category: String,
}

impl ExpenseFilter {
    fn matches(&self, expense: &Expense) -> bool {
        if let Some(status) = self.status
            && expense.status != status
        {
            return false;
        }
        if !self.category.is_empty() && expense.category != self.category {
            return false;
        }
        list::matches_search(
            &self.search,
            &[
                &expense.mr_name,
                &expense.category,
                expense.description.as_deref().unwrap_or(""),
            ],
        )
    }
}

/// Counts and totals for the expense summary cards
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseSummary {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub approved_amount: f64,
    pub pending_amount: f64,
}

/// Manager for expense claims and their review workflow
#[derive(Debug)]
pub struct ExpenseManager {
    api: ApiClient,
    store: LocalStore,
    resource: SyncedResource<Expense>,
    records: Vec<Expense>,
    mode: DataMode,
}

impl ExpenseManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let resource = SyncedResource::new("expenses", keys::EXPENSES);
        let records = resource.load_local(&store);
        Self {
            api,
            store,
            resource,
            records,
            mode: DataMode::Fallback,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub async fn refresh(&mut self) -> DataMode {
        let (mode, records) = self.resource.refresh(&self.api, &self.store).await;
        self.mode = mode;
        self.records = records;
        mode
    }

    pub fn filtered(&self, filter: &ExpenseFilter) -> Vec<&Expense> {
        self.records.iter().filter(|e| filter.matches(e)).collect()
    }

    pub fn page(&self, filter: &ExpenseFilter, page: usize) -> (Vec<&Expense>, Pagination) {
        let filtered = self.filtered(filter);
        let paged = paginate(&filtered, page, PAGE_SIZE);
        (paged.items.to_vec(), paged.pagination)
    }

    /// Summary cards over the full (unfiltered) list.
    pub fn summary(&self) -> ExpenseSummary {
        let mut summary = ExpenseSummary::default();
        for expense in &self.records {
            match expense.status {
                ExpenseStatus::Pending => {
                    summary.pending += 1;
                    summary.pending_amount += expense.amount;
                }
                ExpenseStatus::Approved => {
                    summary.approved += 1;
                    summary.approved_amount += expense.amount;
                }
                ExpenseStatus::Rejected => summary.rejected += 1,
            }
        }
        summary
    }

    pub fn get(&self, id: i64) -> Option<&Expense> {
        self.records.iter().find(|e| e.id == id)
    }

    /// Submit a new claim.
    pub async fn submit(&mut self, payload: ExpenseCreate) -> ClientResult<()> {
        validate_required_text(&payload.mr_name, "rep name", MAX_NAME_LEN)?;
        validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&payload.date, "date", MAX_SHORT_TEXT_LEN)?;
        validate_amount(payload.amount, "amount")?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

        if self.mode == DataMode::Api {
            match self.api.post::<Expense, _>("expenses", &payload).await {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "expense submit failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        let id = resources::next_id(self.records.iter().map(|e| e.id));
        self.records.push(Expense {
            id,
            mr_name: payload.mr_name,
            category: payload.category,
            amount: payload.amount,
            description: payload.description,
            date: payload.date,
            submitted_date: Some(resources::today()),
            status: ExpenseStatus::Pending,
            receipt: payload.receipt,
            approved_by: None,
            approved_date: None,
            rejected_by: None,
            rejection_reason: None,
        });
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Approve a pending claim. Only pending claims are reviewable.
    pub async fn approve(&mut self, id: i64, approved_by: &str) -> ClientResult<()> {
        validate_required_text(approved_by, "approver", MAX_NAME_LEN)?;
        self.reviewable(id, ExpenseStatus::Approved)?;

        if self.mode == DataMode::Api {
            let body = ExpenseApproval {
                approved_by: approved_by.to_string(),
            };
            match self
                .api
                .post_opt::<Expense, _>(&format!("expenses/{id}/approve"), &body)
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "expense approve failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(expense) = self.records.iter_mut().find(|e| e.id == id) {
            expense.status = ExpenseStatus::Approved;
            expense.approved_by = Some(approved_by.to_string());
            expense.approved_date = Some(resources::today());
        }
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Reject a pending claim; a non-empty reason is required.
    pub async fn reject(&mut self, id: i64, rejected_by: &str, reason: &str) -> ClientResult<()> {
        validate_required_text(rejected_by, "reviewer", MAX_NAME_LEN)?;
        validate_required_text(reason, "rejection reason", MAX_NOTE_LEN)?;
        self.reviewable(id, ExpenseStatus::Rejected)?;

        if self.mode == DataMode::Api {
            let body = ExpenseRejection {
                rejected_by: rejected_by.to_string(),
                reason: reason.to_string(),
            };
            match self
                .api
                .post_opt::<Expense, _>(&format!("expenses/{id}/reject"), &body)
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "expense reject failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(expense) = self.records.iter_mut().find(|e| e.id == id) {
            expense.status = ExpenseStatus::Rejected;
            expense.rejected_by = Some(rejected_by.to_string());
            expense.rejection_reason = Some(reason.to_string());
        }
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Remove a claim.
    pub async fn delete(&mut self, id: i64) -> ClientResult<()> {
        if !self.records.iter().any(|e| e.id == id) {
            return Err(DomainError::not_found(format!("expense {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self.api.delete(&format!("expenses/{id}")).await {
                Ok(()) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "expense delete failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        self.records.retain(|e| e.id != id);
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    fn reviewable(&self, id: i64, next: ExpenseStatus) -> ClientResult<()> {
        let expense = self
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("expense {id}")))?;
        expense.ensure_reviewable(next)?;
        Ok(())
    }
}
