//! Field task manager

use shared::list::{Pagination, paginate};
use shared::models::{Task, TaskCreate, TaskStatus, TaskUpdate};
use shared::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use shared::{DomainError, list};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::{DataMode, SyncedResource};
use crate::{ClientResult, resources};

/// Rows shown per task page
pub const PAGE_SIZE: usize = 5;

/// Filters for the task board
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Substring over title, doctor, clinic, and assignee
    pub search: String,
    /// Matched against the overdue-derived status
    pub status: Option<TaskStatus>,
    /// Exact priority label, empty for all
    pub priority: String,
}

impl TaskFilter {
    fn matches(&self, task: &Task, today: &str) -> bool {
        if let Some(status) = self.status
            && task.effective_status(today) != status
        {
            return false;
        }
        if !self.priority.is_empty() && task.priority != self.priority {
            return false;
        }
        list::matches_search(
            &self.search,
            &[
                &task.title,
                task.doctor_name.as_deref().unwrap_or(""),
                task.clinic_name.as_deref().unwrap_or(""),
                &task.assigned_to,
            ],
        )
    }
}

/// Manager for field tasks
#[derive(Debug)]
pub struct TaskManager {
    api: ApiClient,
    store: LocalStore,
    resource: SyncedResource<Task>,
    records: Vec<Task>,
    mode: DataMode,
    /// In-flight guard; a second submit while one is running is a no-op
    submitting: bool,
}

impl TaskManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let resource = SyncedResource::new("tasks", keys::TASKS);
        let records = resource.load_local(&store);
        Self {
            api,
            store,
            resource,
            records,
            mode: DataMode::Fallback,
            submitting: false,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn records(&self) -> &[Task] {
        &self.records
    }

    pub async fn refresh(&mut self) -> DataMode {
        let (mode, records) = self.resource.refresh(&self.api, &self.store).await;
        self.mode = mode;
        self.records = records;
        mode
    }

    pub fn filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        let today = resources::today();
        self.records
            .iter()
            .filter(|t| filter.matches(t, &today))
            .collect()
    }

    pub fn page(&self, filter: &TaskFilter, page: usize) -> (Vec<&Task>, Pagination) {
        let filtered = self.filtered(filter);
        let paged = paginate(&filtered, page, PAGE_SIZE);
        (paged.items.to_vec(), paged.pagination)
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.records.iter().find(|t| t.id == id)
    }

    /// Count per derived status for the board header.
    pub fn status_counts(&self) -> [(TaskStatus, usize); 4] {
        let today = resources::today();
        let mut counts = [
            (TaskStatus::Pending, 0),
            (TaskStatus::InProgress, 0),
            (TaskStatus::Completed, 0),
            (TaskStatus::Overdue, 0),
        ];
        for task in &self.records {
            let status = task.effective_status(&today);
            if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == status) {
                entry.1 += 1;
            }
        }
        counts
    }

    fn validate(payload: &TaskCreate) -> ClientResult<()> {
        validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&payload.assigned_to, "assignee", MAX_EMAIL_LEN)?;
        validate_required_text(&payload.due_date, "due date", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
        Ok(())
    }

    /// Create a task. Returns `Ok(false)` without doing anything when a
    /// submit is already in flight.
    pub async fn add(&mut self, payload: TaskCreate) -> ClientResult<bool> {
        if self.submitting {
            tracing::debug!("task submit already in flight, ignoring");
            return Ok(false);
        }
        Self::validate(&payload)?;
        self.submitting = true;
        let result = self.add_inner(payload).await;
        self.submitting = false;
        result.map(|_| true)
    }

    async fn add_inner(&mut self, payload: TaskCreate) -> ClientResult<()> {
        if self.mode == DataMode::Api {
            match self.api.post::<Task, _>("tasks", &payload).await {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "task create failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        let id = resources::next_id(self.records.iter().map(|t| t.id));
        self.records
            .push(Task::from_create(id, payload, resources::today()));
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Edit a task in place.
    pub async fn update(&mut self, id: i64, update: TaskUpdate) -> ClientResult<()> {
        if !self.records.iter().any(|t| t.id == id) {
            return Err(DomainError::not_found(format!("task {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self
                .api
                .put::<Task, _>(&format!("tasks/{id}"), &update)
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "task update failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(task) = self.records.iter_mut().find(|t| t.id == id) {
            task.apply(update);
        }
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Set just the workflow status.
    pub async fn set_status(&mut self, id: i64, status: TaskStatus) -> ClientResult<()> {
        let update = TaskUpdate {
            status: Some(status),
            ..Default::default()
        };
        self.update(id, update).await
    }

    /// Remove a task.
    pub async fn delete(&mut self, id: i64) -> ClientResult<()> {
        if !self.records.iter().any(|t| t.id == id) {
            return Err(DomainError::not_found(format!("task {id}")).into());
        }
        if self.mode == DataMode::Api {
            match self.api.delete(&format!("tasks/{id}")).await {
                Ok(()) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "task delete failed, switching to fallback");
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

    fn manager() -> (TempDir, TaskManager) {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::new("http://127.0.0.1:9").with_data_dir(dir.path());
        let api = ApiClient::new(&config).unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        (dir, TaskManager::new(api, store))
    }

    fn payload(title: &str, due: &str) -> TaskCreate {
        TaskCreate {
            title: title.to_string(),
            task_type: Some("Doctor Visit".to_string()),
            assigned_to: "priya@kavya.example".to_string(),
            doctor_name: Some("Dr. Mehta".to_string()),
            clinic_name: None,
            location: None,
            priority: Some("High".to_string()),
            due_date: due.to_string(),
            due_time: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn add_assigns_ids_and_defaults_to_pending() {
        let (_dir, mut manager) = manager();
        assert!(manager.add(payload("Visit City Clinic", "2099-01-01")).await.unwrap());
        let task = manager.get(1).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, "High");
    }

    #[tokio::test]
    async fn in_flight_guard_makes_double_submission_a_no_op() {
        let (_dir, mut manager) = manager();
        manager.submitting = true;
        assert!(!manager.add(payload("t", "2099-01-01")).await.unwrap());
        assert!(manager.records().is_empty());
        manager.submitting = false;
        assert!(manager.add(payload("t", "2099-01-01")).await.unwrap());
        assert_eq!(manager.records().len(), 1);
    }

    #[tokio::test]
    async fn overdue_filter_uses_the_derived_status() {
        let (_dir, mut manager) = manager();
        manager.add(payload("old", "2020-01-01")).await.unwrap();
        manager.add(payload("future", "2099-01-01")).await.unwrap();

        let filter = TaskFilter {
            status: Some(TaskStatus::Overdue),
            ..Default::default()
        };
        let overdue = manager.filtered(&filter);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].title, "old");

        // completion clears the overdue derivation
        manager.set_status(1, TaskStatus::Completed).await.unwrap();
        assert!(manager.filtered(&filter).is_empty());
    }

    #[tokio::test]
    async fn status_counts_cover_the_board_header() {
        let (_dir, mut manager) = manager();
        manager.add(payload("a", "2099-01-01")).await.unwrap();
        manager.add(payload("b", "2020-01-01")).await.unwrap();
        manager.set_status(1, TaskStatus::InProgress).await.unwrap();

        let counts = manager.status_counts();
        assert_eq!(counts[1], (TaskStatus::InProgress, 1));
        assert_eq!(counts[3], (TaskStatus::Overdue, 1));
    }
}
