//! Doctor directory manager

use shared::list::{Pagination, paginate};
use shared::models::{Doctor, DoctorCreate, DoctorUpdate};
use shared::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use shared::{DomainError, list};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::{DataMode, SyncedResource};
use crate::{ClientResult, resources};

/// Rows shown per directory page
pub const PAGE_SIZE: usize = 8;

/// Filters for the directory table
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    /// Substring over name, clinic, and assigned rep
    pub search: String,
    /// Exact specialty, empty for all
    pub specialty: String,
}

impl DoctorFilter {
    fn matches(&self, doctor: &Doctor) -> bool {
        if !self.specialty.is_empty() && doctor.specialty != self.specialty {
            return false;
        }
        list::matches_search(
            &self.search,
            &[
                &doctor.name,
                doctor.clinic_name.as_deref().unwrap_or(""),
                doctor.assigned_mr.as_deref().unwrap_or(""),
            ],
        )
    }
}

/// Manager for the doctor/pharmacy directory
#[derive(Debug)]
pub struct DoctorManager {
    api: ApiClient,
    store: LocalStore,
    resource: SyncedResource<Doctor>,
    records: Vec<Doctor>,
    mode: DataMode,
}

impl DoctorManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let resource = SyncedResource::new("doctors", keys::DOCTORS);
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

    pub fn records(&self) -> &[Doctor] {
        &self.records
    }

    /// Re-fetch the directory; the manual retry surface.
    pub async fn refresh(&mut self) -> DataMode {
        let (mode, records) = self.resource.refresh(&self.api, &self.store).await;
        self.mode = mode;
        self.records = records;
        mode
    }

    /// Filtered view in list order.
    pub fn filtered(&self, filter: &DoctorFilter) -> Vec<&Doctor> {
        self.records.iter().filter(|d| filter.matches(d)).collect()
    }

    /// One directory page of the filtered view.
    pub fn page(&self, filter: &DoctorFilter, page: usize) -> (Vec<&Doctor>, Pagination) {
        let filtered = self.filtered(filter);
        let paged = paginate(&filtered, page, PAGE_SIZE);
        (paged.items.to_vec(), paged.pagination)
    }

    /// Distinct specialties for the filter dropdown, sorted.
    pub fn specialties(&self) -> Vec<String> {
        let mut specialties: Vec<String> =
            self.records.iter().map(|d| d.specialty.clone()).collect();
        specialties.sort();
        specialties.dedup();
        specialties
    }

    pub fn get(&self, id: i64) -> Option<&Doctor> {
        self.records.iter().find(|d| d.id == id)
    }

    fn validate(payload: &DoctorCreate) -> ClientResult<()> {
        validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&payload.specialty, "specialty", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&payload.email, "email", shared::validation::MAX_EMAIL_LEN)?;
        validate_optional_text(&payload.clinic_name, "clinic name", MAX_NAME_LEN)?;
        validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
        validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;
        Ok(())
    }

    /// Add a doctor. API first; local append when the backend is down.
    pub async fn add(&mut self, payload: DoctorCreate) -> ClientResult<()> {
        Self::validate(&payload)?;
        if self.mode == DataMode::Api {
            match self.api.post::<Doctor, _>("doctors", &payload).await {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "doctor create failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        let id = resources::next_id(self.records.iter().map(|d| d.id));
        self.records.push(Doctor::from_create(id, payload));
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Edit a doctor in place.
    pub async fn update(&mut self, id: i64, update: DoctorUpdate) -> ClientResult<()> {
        if !self.records.iter().any(|d| d.id == id) {
            return Err(DomainError::not_found(format!("doctor {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self
                .api
                .put::<Doctor, _>(&format!("doctors/{id}"), &update)
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "doctor update failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(doctor) = self.records.iter_mut().find(|d| d.id == id) {
            doctor.apply(update);
        }
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Remove a doctor.
    pub async fn delete(&mut self, id: i64) -> ClientResult<()> {
        if !self.records.iter().any(|d| d.id == id) {
            return Err(DomainError::not_found(format!("doctor {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self.api.delete(&format!("doctors/{id}")).await {
                Ok(()) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "doctor delete failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        self.records.retain(|d| d.id != id);
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use tempfile::TempDir;

    fn manager() -> (TempDir, DoctorManager) {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::new("http://127.0.0.1:9").with_data_dir(dir.path());
        let api = ApiClient::new(&config).unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        (dir, DoctorManager::new(api, store))
    }

    fn payload(name: &str, specialty: &str) -> DoctorCreate {
        DoctorCreate {
            name: name.to_string(),
            contact_type: None,
            specialty: specialty.to_string(),
            phone: None,
            email: None,
            clinic_name: Some("City Clinic".to_string()),
            address: None,
            city: None,
            assigned_mr: Some("priya@kavya.example".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn fallback_adds_assign_sequential_ids_and_persist() {
        let (_dir, mut manager) = manager();
        manager.add(payload("Dr. Mehta", "Cardiology")).await.unwrap();
        manager.add(payload("Dr. Rao", "Dermatology")).await.unwrap();
        assert_eq!(manager.records()[0].id, 1);
        assert_eq!(manager.records()[1].id, 2);

        let reloaded = DoctorManager::new(manager.api.clone(), manager.store.clone());
        assert_eq!(reloaded.records().len(), 2);
    }

    #[tokio::test]
    async fn filters_combine_search_and_specialty() {
        let (_dir, mut manager) = manager();
        manager.add(payload("Dr. Mehta", "Cardiology")).await.unwrap();
        manager.add(payload("Dr. Rao", "Dermatology")).await.unwrap();

        let filter = DoctorFilter {
            search: "mehta".to_string(),
            specialty: String::new(),
        };
        assert_eq!(manager.filtered(&filter).len(), 1);

        let filter = DoctorFilter {
            search: "clinic".to_string(),
            specialty: "Dermatology".to_string(),
        };
        let matched = manager.filtered(&filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].name, "Dr. Rao");
    }

    #[tokio::test]
    async fn filtering_is_idempotent() {
        let (_dir, mut manager) = manager();
        manager.add(payload("Dr. Mehta", "Cardiology")).await.unwrap();
        let filter = DoctorFilter {
            search: "dr".to_string(),
            specialty: String::new(),
        };
        let once: Vec<i64> = manager.filtered(&filter).iter().map(|d| d.id).collect();
        let twice: Vec<i64> = manager.filtered(&filter).iter().map(|d| d.id).collect();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn update_and_delete_respect_missing_ids() {
        let (_dir, mut manager) = manager();
        manager.add(payload("Dr. Mehta", "Cardiology")).await.unwrap();

        let mut update = DoctorUpdate::default();
        update.city = Some("Pune".to_string());
        manager.update(1, update).await.unwrap();
        assert_eq!(manager.get(1).unwrap().city.as_deref(), Some("Pune"));

        assert!(manager.update(99, DoctorUpdate::default()).await.is_err());
        manager.delete(1).await.unwrap();
        assert!(manager.records().is_empty());
        assert!(manager.delete(1).await.is_err());
    }

    #[tokio::test]
    async fn validation_rejects_blank_names_before_any_mutation() {
        let (_dir, mut manager) = manager();
        let result = manager.add(payload("   ", "Cardiology")).await;
        assert!(result.is_err());
        assert!(manager.records().is_empty());
    }
}
