//! Sales target manager

use shared::list::{Pagination, paginate};
use shared::models::{AchievementBand, Target, TargetCreate, TargetUpdate};
use shared::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_required_text,
};
use shared::{DomainError, list};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::{DataMode, SyncedResource};
use crate::{ClientResult, resources};

/// Rows shown per target page
pub const PAGE_SIZE: usize = 6;

/// Filters for the target table
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    /// Substring over rep name and period
    pub search: String,
    /// Derived attainment band, `None` for all
    pub band: Option<AchievementBand>,
}

impl TargetFilter {
    fn matches(&self, target: &Target) -> bool {
        if let Some(band) = self.band
            && target.band() != band
        {
            return false;
        }
        list::matches_search(&self.search, &[&target.mr_name, &target.period])
    }
}

/// Manager for periodic sales and visit targets
#[derive(Debug)]
pub struct TargetManager {
    api: ApiClient,
    store: LocalStore,
    resource: SyncedResource<Target>,
    records: Vec<Target>,
    mode: DataMode,
}

impl TargetManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let resource = SyncedResource::new("targets", keys::TARGETS);
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

    pub fn records(&self) -> &[Target] {
        &self.records
    }

    pub async fn refresh(&mut self) -> DataMode {
        let (mode, records) = self.resource.refresh(&self.api, &self.store).await;
        self.mode = mode;
        self.records = records;
        mode
    }

    pub fn filtered(&self, filter: &TargetFilter) -> Vec<&Target> {
        self.records.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn page(&self, filter: &TargetFilter, page: usize) -> (Vec<&Target>, Pagination) {
        let filtered = self.filtered(filter);
        let paged = paginate(&filtered, page, PAGE_SIZE);
        (paged.items.to_vec(), paged.pagination)
    }

    pub fn get(&self, id: i64) -> Option<&Target> {
        self.records.iter().find(|t| t.id == id)
    }

    /// Highest sales attainment across all targets, for the spotlight
    /// card. `None` when no targets exist.
    pub fn top_performer(&self) -> Option<&Target> {
        self.records
            .iter()
            .max_by_key(|t| t.achievement_percentage())
    }

    fn validate(payload: &TargetCreate) -> ClientResult<()> {
        validate_required_text(&payload.mr_name, "rep name", MAX_NAME_LEN)?;
        validate_required_text(&payload.period, "period", MAX_SHORT_TEXT_LEN)?;
        validate_amount(payload.sales_target, "sales target")?;
        Ok(())
    }

    /// Set a new target.
    pub async fn add(&mut self, payload: TargetCreate) -> ClientResult<()> {
        Self::validate(&payload)?;
        if self.mode == DataMode::Api {
            match self.api.post::<Target, _>("targets", &payload).await {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "target create failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        let id = resources::next_id(self.records.iter().map(|t| t.id));
        self.records.push(Target::from_create(id, payload));
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Edit a target in place (including achievement updates).
    pub async fn update(&mut self, id: i64, update: TargetUpdate) -> ClientResult<()> {
        if !self.records.iter().any(|t| t.id == id) {
            return Err(DomainError::not_found(format!("target {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self
                .api
                .put::<Target, _>(&format!("targets/{id}"), &update)
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "target update failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(target) = self.records.iter_mut().find(|t| t.id == id) {
            target.apply(update);
        }
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Remove a target.
    pub async fn delete(&mut self, id: i64) -> ClientResult<()> {
        if !self.records.iter().any(|t| t.id == id) {
            return Err(DomainError::not_found(format!("target {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self.api.delete(&format!("targets/{id}")).await {
                Ok(()) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "target delete failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        self.records.retain(|t| t.id != id);
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use tempfile::TempDir;

    fn manager() -> (TempDir, TargetManager) {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::new("http://127.0.0.1:9").with_data_dir(dir.path());
        let api = ApiClient::new(&config).unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        (dir, TargetManager::new(api, store))
    }

    fn payload(mr: &str, sales_target: f64, achievement: f64) -> TargetCreate {
        TargetCreate {
            mr_name: mr.to_string(),
            period: "Q3 2025".to_string(),
            sales_target,
            sales_achievement: Some(achievement),
            visits_target: Some(20),
            visits_achievement: Some(12),
            start_date: None,
            end_date: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn top_performer_picks_the_highest_percentage() {
        let (_dir, mut manager) = manager();
        manager.add(payload("Priya", 100.0, 95.0)).await.unwrap();
        manager.add(payload("Arun", 100.0, 60.0)).await.unwrap();
        assert_eq!(manager.top_performer().unwrap().mr_name, "Priya");
    }

    #[tokio::test]
    async fn band_filter_uses_the_derived_band() {
        let (_dir, mut manager) = manager();
        manager.add(payload("Priya", 100.0, 95.0)).await.unwrap();
        manager.add(payload("Arun", 100.0, 60.0)).await.unwrap();
        manager.add(payload("Dev", 100.0, 20.0)).await.unwrap();

        let filter = TargetFilter {
            band: Some(AchievementBand::Average),
            ..Default::default()
        };
        let matched = manager.filtered(&filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].mr_name, "Arun");
    }

    #[tokio::test]
    async fn achievement_updates_move_the_band() {
        let (_dir, mut manager) = manager();
        manager.add(payload("Priya", 100.0, 60.0)).await.unwrap();
        assert_eq!(manager.get(1).unwrap().band(), AchievementBand::Average);

        let update = TargetUpdate {
            sales_achievement: Some(92.0),
            ..Default::default()
        };
        manager.update(1, update).await.unwrap();
        assert_eq!(manager.get(1).unwrap().band(), AchievementBand::Excellent);
    }

    #[tokio::test]
    async fn zero_sales_target_is_rejected() {
        let (_dir, mut manager) = manager();
        assert!(manager.add(payload("Priya", 0.0, 10.0)).await.is_err());
        assert!(manager.records().is_empty());
    }
}
