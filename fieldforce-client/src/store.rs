//! Local fallback store
//!
//! One pretty-printed JSON file per key under the configured data
//! directory. This is the client's stand-in for the browser storage it
//! replaces, so the key constants keep their legacy names and cached
//! state written by an earlier deployment can be carried across.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Local store error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Legacy storage keys shared with earlier deployments.
pub mod keys {
    pub const DOCTORS: &str = "kavyaPharmDoctorsData";
    pub const MRS: &str = "kavyaPharmMRs";
    pub const NOTIFICATIONS: &str = "kavyaPharmNotifications";
    pub const EXPENSES: &str = "kavyaPharmExpensesData";
    pub const VISIT_REPORTS: &str = "submittedDCRs";
    pub const STOCK: &str = "mrProductStock";
    pub const DISTRIBUTIONS: &str = "sampleDistributions";
    pub const TARGETS: &str = "kavyaPharmTargets";
    pub const TASKS: &str = "kavyaPharmTasks";
    pub const ZONES: &str = "kavyaPharmZones";
    pub const TERRITORIES: &str = "kavyaPharmTerritories";
    pub const DASHBOARD_STATS: &str = "kavyaPharmDashboardStats";
    pub const DASHBOARD_CHARTS: &str = "kavyaPharmDashboardCharts";
    pub const AUTH_TOKEN: &str = "kavya_auth_token";
    pub const PROFILE_NAME: &str = "signup_name";
    pub const PROFILE_EMAIL: &str = "signup_email";
    pub const THEME: &str = "theme";
}

/// JSON-file-per-key store rooted at a data directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open a store at `dir`, creating the directory when missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Load a value. A missing file reads as `None`; a corrupt file is
    /// an error, not silently empty.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Load a list, treating a missing file as an empty list.
    pub fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        Ok(self.load(key)?.unwrap_or_default())
    }

    /// Persist a value as pretty-printed JSON.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path_for(key), content)?;
        Ok(())
    }

    /// Remove a key; removing an absent key is fine.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    // ========== String convenience accessors ==========

    /// Read the cached auth token, if any.
    pub fn auth_token(&self) -> Option<String> {
        self.load(keys::AUTH_TOKEN).ok().flatten()
    }

    /// Cache the auth token.
    pub fn set_auth_token(&self, token: &str) -> Result<(), StoreError> {
        self.save(keys::AUTH_TOKEN, &token)
    }

    /// Display-only profile fallback: (name, email).
    pub fn profile(&self) -> (Option<String>, Option<String>) {
        (
            self.load(keys::PROFILE_NAME).ok().flatten(),
            self.load(keys::PROFILE_EMAIL).ok().flatten(),
        )
    }
}
