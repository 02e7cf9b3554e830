//! Zone and Territory Models

use serde::{Deserialize, Serialize};

/// Geographic sales zone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

/// Territory inside a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    pub id: i64,
    pub name: String,
    /// Parent zone name
    pub zone: String,
    /// Responsible manager or rep
    pub manager: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "active".to_string()
}

/// Create zone payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneCreate {
    pub name: String,
    pub description: Option<String>,
}

/// Update zone payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Create territory payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryCreate {
    pub name: String,
    pub zone: String,
    pub manager: Option<String>,
}

/// Update territory payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerritoryUpdate {
    pub name: Option<String>,
    pub zone: Option<String>,
    pub manager: Option<String>,
    pub status: Option<String>,
}

impl Zone {
    /// Build a full record from a create payload and an assigned ID.
    pub fn from_create(id: i64, payload: ZoneCreate) -> Self {
        Self {
            id,
            name: payload.name,
            description: payload.description,
            status: default_status(),
        }
    }

    /// Apply an edit-form payload; absent fields keep their value.
    pub fn apply(&mut self, update: ZoneUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
    }
}

impl Territory {
    /// Build a full record from a create payload and an assigned ID.
    pub fn from_create(id: i64, payload: TerritoryCreate) -> Self {
        Self {
            id,
            name: payload.name,
            zone: payload.zone,
            manager: payload.manager,
            status: default_status(),
        }
    }

    /// Apply an edit-form payload; absent fields keep their value.
    pub fn apply(&mut self, update: TerritoryUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.zone {
            self.zone = v;
        }
        if update.manager.is_some() {
            self.manager = update.manager;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
    }
}
