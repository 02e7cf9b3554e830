//! Doctor Model

use serde::{Deserialize, Serialize};

/// Doctor activity status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DoctorStatus {
    #[default]
    Active,
    Inactive,
}

impl DoctorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Doctor or pharmacy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    /// "doctor" or "pharmacy"
    #[serde(rename = "type", default = "default_contact_type")]
    pub contact_type: String,
    pub specialty: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub clinic_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Email of the assigned medical rep
    #[serde(rename = "assignedMR")]
    pub assigned_mr: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub status: DoctorStatus,
}

fn default_contact_type() -> String {
    "doctor".to_string()
}

/// Create doctor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    pub specialty: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub clinic_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "assignedMR")]
    pub assigned_mr: Option<String>,
    pub notes: Option<String>,
}

/// Update doctor payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub clinic_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[serde(rename = "assignedMR")]
    pub assigned_mr: Option<String>,
    pub notes: Option<String>,
    pub status: Option<DoctorStatus>,
}

impl Doctor {
    /// Build a full record from a create payload and an assigned ID.
    pub fn from_create(id: i64, payload: DoctorCreate) -> Self {
        Self {
            id,
            name: payload.name,
            contact_type: payload.contact_type.unwrap_or_else(default_contact_type),
            specialty: payload.specialty,
            phone: payload.phone,
            email: payload.email,
            clinic_name: payload.clinic_name,
            address: payload.address,
            city: payload.city,
            assigned_mr: payload.assigned_mr,
            notes: payload.notes,
            status: DoctorStatus::Active,
        }
    }

    /// Apply an edit-form payload; absent fields keep their value.
    pub fn apply(&mut self, update: DoctorUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.contact_type {
            self.contact_type = v;
        }
        if let Some(v) = update.specialty {
            self.specialty = v;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.clinic_name.is_some() {
            self.clinic_name = update.clinic_name;
        }
        if update.address.is_some() {
            self.address = update.address;
        }
        if update.city.is_some() {
            self.city = update.city;
        }
        if update.assigned_mr.is_some() {
            self.assigned_mr = update.assigned_mr;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
    }
}
