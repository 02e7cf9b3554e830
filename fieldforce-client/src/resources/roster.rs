//! Medical rep roster
//!
//! The roster is a read-only projection of the users endpoint, filtered
//! by manager and role. Unlike the other resources this one never
//! mutates the backend; it only refreshes and caches.

use shared::models::{MedicalRep, UserRecord};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::DataMode;

/// Manager for the medical rep roster
#[derive(Debug)]
pub struct RosterManager {
    api: ApiClient,
    store: LocalStore,
    /// Display name of the signed-in manager, used as the query key
    manager_name: String,
    /// Fallback query key when the name-keyed query comes back empty
    manager_email: Option<String>,
    reps: Vec<MedicalRep>,
    mode: DataMode,
}

impl RosterManager {
    pub fn new(
        api: ApiClient,
        store: LocalStore,
        manager_name: impl Into<String>,
        manager_email: Option<String>,
    ) -> Self {
        let reps = match store.load_list(keys::MRS) {
            Ok(reps) => reps,
            Err(e) => {
                tracing::warn!(error = %e, "unreadable rep cache, starting empty");
                Vec::new()
            }
        };
        Self {
            api,
            store,
            manager_name: manager_name.into(),
            manager_email,
            reps,
            mode: DataMode::Fallback,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn reps(&self) -> &[MedicalRep] {
        &self.reps
    }

    pub fn find_by_email(&self, email: &str) -> Option<&MedicalRep> {
        self.reps
            .iter()
            .find(|rep| rep.email.eq_ignore_ascii_case(email))
    }

    /// Fetch the roster. The backend is queried by manager name first;
    /// when that returns nothing and an email is known, the query is
    /// retried keyed by email (older deployments stored either).
    pub async fn refresh(&mut self) -> DataMode {
        let mut result = self.fetch_for(&self.manager_name.clone()).await;
        if let Ok(users) = &result
            && users.is_empty()
            && let Some(email) = self.manager_email.clone()
        {
            result = self.fetch_for(&email).await;
        }

        match result {
            Ok(users) => {
                self.reps = project_reps(users);
                if let Err(e) = self.store.save(keys::MRS, &self.reps) {
                    tracing::warn!(error = %e, "failed to cache rep roster");
                }
                self.mode = DataMode::Api;
            }
            Err(e) => {
                tracing::warn!(error = %e, "users API unreachable, serving cached roster");
                self.mode = DataMode::Fallback;
            }
        }
        self.mode
    }

    async fn fetch_for(&self, manager: &str) -> crate::ClientResult<Vec<UserRecord>> {
        self.api
            .get_query("users", &[("manager", manager), ("role", "MR")])
            .await
    }
}

/// Project raw user records into the rep roster: role must read as MR,
/// and duplicate emails (case-insensitive) collapse to the first record.
pub fn project_reps(users: Vec<UserRecord>) -> Vec<MedicalRep> {
    let mut seen: Vec<String> = Vec::new();
    let mut reps = Vec::new();
    for user in users {
        if !user.is_medical_rep() {
            continue;
        }
        let key = user.email.to_lowercase();
        if !key.is_empty() && seen.contains(&key) {
            continue;
        }
        seen.push(key);
        reps.push(MedicalRep::from(user));
    }
    reps
}
