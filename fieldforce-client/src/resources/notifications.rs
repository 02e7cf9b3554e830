//! Notification inbox manager
//!
//! The one resource that merges instead of overwriting on refresh:
//! server records (IDs like "N001") replace the cached server set,
//! while locally created records (IDs "local-…") survive the sync.

use shared::list::{Pagination, paginate};
use shared::models::{
    Notification, NotificationCreate, NotificationStatus, compare_for_inbox,
};
use shared::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_required_text};
use shared::{DomainError, list};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::{DataMode, SyncedResource};
use crate::{ClientResult, resources};

/// Rows shown per inbox page
pub const PAGE_SIZE: usize = 10;

/// Filters for the inbox
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    /// Substring over title and message
    pub search: String,
    /// Exact type label, empty for all
    pub notification_type: String,
    pub status: Option<NotificationStatus>,
}

impl NotificationFilter {
    fn matches(&self, notification: &Notification) -> bool {
        if !self.notification_type.is_empty()
            && notification.notification_type != self.notification_type
        {
            return false;
        }
        if let Some(status) = self.status
            && notification.status != status
        {
            return false;
        }
        list::matches_search(&self.search, &[&notification.title, &notification.message])
    }
}

/// Manager for the notification inbox
#[derive(Debug)]
pub struct NotificationManager {
    api: ApiClient,
    store: LocalStore,
    resource: SyncedResource<Notification>,
    records: Vec<Notification>,
    mode: DataMode,
}

impl NotificationManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let resource = SyncedResource::new("notifications", keys::NOTIFICATIONS)
            .with_local_merge(Notification::is_server_record);
        let mut records: Vec<Notification> = resource.load_local(&store);
        records.sort_by(compare_for_inbox);
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

    pub fn records(&self) -> &[Notification] {
        &self.records
    }

    pub fn unread_count(&self) -> usize {
        self.records.iter().filter(|n| n.is_unread()).count()
    }

    pub async fn refresh(&mut self) -> DataMode {
        let (mode, mut records) = self.resource.refresh(&self.api, &self.store).await;
        records.sort_by(compare_for_inbox);
        self.mode = mode;
        self.records = records;
        mode
    }

    pub fn filtered(&self, filter: &NotificationFilter) -> Vec<&Notification> {
        self.records.iter().filter(|n| filter.matches(n)).collect()
    }

    pub fn page(&self, filter: &NotificationFilter, page: usize) -> (Vec<&Notification>, Pagination) {
        let filtered = self.filtered(filter);
        let paged = paginate(&filtered, page, PAGE_SIZE);
        (paged.items.to_vec(), paged.pagination)
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.records.iter().find(|n| n.id == id)
    }

    /// Create a local-only notification. These carry `local-<uuid>` IDs
    /// so they can never collide with the server's scheme, and they
    /// survive refreshes through the merge policy.
    pub fn add_local(&mut self, payload: NotificationCreate) -> ClientResult<String> {
        validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
        validate_required_text(&payload.message, "message", MAX_NOTE_LEN)?;
        let id = format!("local-{}", uuid::Uuid::new_v4());
        self.records.push(Notification {
            id: id.clone(),
            title: payload.title,
            message: payload.message,
            notification_type: payload.notification_type.unwrap_or_default(),
            date: resources::today(),
            status: NotificationStatus::Unread,
            priority: payload.priority.unwrap_or_default(),
        });
        self.records.sort_by(compare_for_inbox);
        self.resource.save_local(&self.store, &self.records);
        Ok(id)
    }

    /// Mark one notification read.
    pub async fn mark_read(&mut self, id: &str) -> ClientResult<()> {
        let notification = self
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("notification {id}")))?;

        if self.mode == DataMode::Api && notification.is_server_record() {
            let body = serde_json::json!({ "status": "Read" });
            match self
                .api
                .put::<Notification, _>(&format!("notifications/{id}"), &body)
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "mark-read failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        if let Some(notification) = self.records.iter_mut().find(|n| n.id == id) {
            notification.status = NotificationStatus::Read;
        }
        self.records.sort_by(compare_for_inbox);
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Mark every notification read.
    pub async fn mark_all_read(&mut self) -> ClientResult<()> {
        if self.mode == DataMode::Api {
            match self
                .api
                .post_empty::<serde_json::Value>("notifications/mark-all-read")
                .await
            {
                Ok(_) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "mark-all-read failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        for notification in &mut self.records {
            notification.status = NotificationStatus::Read;
        }
        self.records.sort_by(compare_for_inbox);
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }

    /// Remove one notification.
    pub async fn delete(&mut self, id: &str) -> ClientResult<()> {
        let notification = self
            .get(id)
            .ok_or_else(|| DomainError::not_found(format!("notification {id}")))?;

        if self.mode == DataMode::Api && notification.is_server_record() {
            match self.api.delete(&format!("notifications/{id}")).await {
                Ok(()) => {
                    self.refresh().await;
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "notification delete failed, switching to fallback");
                    self.mode = DataMode::Fallback;
                }
            }
        }
        self.records.retain(|n| n.id != id);
        self.resource.save_local(&self.store, &self.records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientConfig;
    use shared::models::NotificationPriority;
    use tempfile::TempDir;

    fn manager() -> (TempDir, NotificationManager) {
        let dir = TempDir::new().unwrap();
        let config = ClientConfig::new("http://127.0.0.1:9").with_data_dir(dir.path());
        let api = ApiClient::new(&config).unwrap();
        let store = LocalStore::new(dir.path()).unwrap();
        (dir, NotificationManager::new(api, store))
    }

    fn payload(title: &str, priority: NotificationPriority) -> NotificationCreate {
        NotificationCreate {
            title: title.to_string(),
            message: "message".to_string(),
            notification_type: Some("Stock Alert".to_string()),
            priority: Some(priority),
        }
    }

    #[tokio::test]
    async fn local_ids_never_look_like_server_ids() {
        let (_dir, mut manager) = manager();
        let id = manager
            .add_local(payload("Low stock", NotificationPriority::High))
            .unwrap();
        assert!(id.starts_with("local-"));
        assert!(!manager.get(&id).unwrap().is_server_record());
    }

    #[tokio::test]
    async fn mark_read_drops_the_unread_count_and_reorders() {
        let (_dir, mut manager) = manager();
        let high = manager
            .add_local(payload("urgent", NotificationPriority::High))
            .unwrap();
        let low = manager
            .add_local(payload("fyi", NotificationPriority::Low))
            .unwrap();
        assert_eq!(manager.unread_count(), 2);
        assert_eq!(manager.records()[0].id, high);

        manager.mark_read(&high).await.unwrap();
        assert_eq!(manager.unread_count(), 1);
        // read records sink below unread ones
        assert_eq!(manager.records()[0].id, low);
    }

    #[tokio::test]
    async fn mark_all_read_clears_every_record() {
        let (_dir, mut manager) = manager();
        manager
            .add_local(payload("a", NotificationPriority::Normal))
            .unwrap();
        manager
            .add_local(payload("b", NotificationPriority::Normal))
            .unwrap();
        manager.mark_all_read().await.unwrap();
        assert_eq!(manager.unread_count(), 0);
    }

    #[tokio::test]
    async fn filters_cover_type_status_and_search() {
        let (_dir, mut manager) = manager();
        let id = manager
            .add_local(payload("Low stock on Paracetamol", NotificationPriority::High))
            .unwrap();
        manager
            .add_local(NotificationCreate {
                title: "Expense approved".to_string(),
                message: "Travel claim cleared".to_string(),
                notification_type: Some("Expense".to_string()),
                priority: None,
            })
            .unwrap();
        manager.mark_read(&id).await.unwrap();

        let filter = NotificationFilter {
            notification_type: "Stock Alert".to_string(),
            ..Default::default()
        };
        assert_eq!(manager.filtered(&filter).len(), 1);

        let filter = NotificationFilter {
            status: Some(NotificationStatus::Unread),
            ..Default::default()
        };
        assert_eq!(manager.filtered(&filter).len(), 1);

        let filter = NotificationFilter {
            search: "paracetamol".to_string(),
            ..Default::default()
        };
        assert_eq!(manager.filtered(&filter).len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_notification_is_an_error() {
        let (_dir, mut manager) = manager();
        assert!(manager.delete("local-nope").await.is_err());
    }
}
