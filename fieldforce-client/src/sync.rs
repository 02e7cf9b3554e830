//! Sync reconciler
//!
//! One generic refresh path for every resource: fetch the server list,
//! persist it locally on success, or fall back to whatever the store
//! already holds. Which mode a manager is in is plain data returned
//! from [`SyncedResource::refresh`], never a process-global flag.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::http::ApiClient;
use crate::store::LocalStore;

/// Where the current record set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataMode {
    /// Records reflect the last successful server fetch
    Api,
    /// Backend unreachable; records come from the local store
    Fallback,
}

impl DataMode {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback)
    }
}

/// How a successful server fetch treats cached records
#[derive(Debug, Clone, Copy)]
pub enum MergePolicy<T> {
    /// Server response overwrites the cache wholesale. Fallback-mode
    /// edits are sacrificed on the next successful sync.
    ReplaceAll,
    /// Keep cached records the predicate does NOT claim for the server
    /// (local-only records), appended after the server set.
    MergeLocalOnly(fn(&T) -> bool),
}

/// A list resource bound to one endpoint and one local store key
#[derive(Debug, Clone)]
pub struct SyncedResource<T> {
    endpoint: String,
    query: Vec<(String, String)>,
    store_key: &'static str,
    merge: MergePolicy<T>,
}

impl<T> SyncedResource<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(endpoint: impl Into<String>, store_key: &'static str) -> Self {
        Self {
            endpoint: endpoint.into(),
            query: Vec::new(),
            store_key,
            merge: MergePolicy::ReplaceAll,
        }
    }

    /// Append a query parameter to the list fetch.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Keep local-only cached records across refreshes. `is_server_record`
    /// decides which cached records the server response supersedes.
    pub fn with_local_merge(mut self, is_server_record: fn(&T) -> bool) -> Self {
        self.merge = MergePolicy::MergeLocalOnly(is_server_record);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn store_key(&self) -> &str {
        self.store_key
    }

    /// Fetch the list from the API; on success persist it (after the
    /// merge policy runs) and report [`DataMode::Api`]. On any error,
    /// log and serve the cached records instead.
    pub async fn refresh(&self, api: &ApiClient, store: &LocalStore) -> (DataMode, Vec<T>) {
        let fetched = if self.query.is_empty() {
            api.get::<Vec<T>>(&self.endpoint).await
        } else {
            api.get_query::<Vec<T>, _>(&self.endpoint, &self.query).await
        };
        match fetched {
            Ok(fetched) => {
                let records = self.merge_with_cache(fetched, store);
                if let Err(e) = store.save(self.store_key, &records) {
                    tracing::warn!(key = self.store_key, error = %e, "failed to cache refreshed records");
                }
                (DataMode::Api, records)
            }
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "API unreachable, serving cached records");
                (DataMode::Fallback, self.load_local(store))
            }
        }
    }

    /// Read the cached records, treating a missing or unreadable cache
    /// as empty.
    pub fn load_local(&self, store: &LocalStore) -> Vec<T> {
        match store.load_list(self.store_key) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(key = self.store_key, error = %e, "unreadable local cache, starting empty");
                Vec::new()
            }
        }
    }

    /// Persist records after a fallback-mode mutation.
    pub fn save_local(&self, store: &LocalStore, records: &[T]) {
        if let Err(e) = store.save(self.store_key, &records) {
            tracing::warn!(key = self.store_key, error = %e, "failed to persist fallback mutation");
        }
    }

    fn merge_with_cache(&self, fetched: Vec<T>, store: &LocalStore) -> Vec<T> {
        match self.merge {
            MergePolicy::ReplaceAll => fetched,
            MergePolicy::MergeLocalOnly(is_server_record) => {
                let mut records = fetched;
                let cached: Vec<T> = self.load_local(store);
                records.extend(cached.into_iter().filter(|r| !is_server_record(r)));
                records
            }
        }
    }
}
