//! User and Medical Rep Models

use serde::{Deserialize, Deserializer, Serialize};

/// Raw user record as served by the users endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Arrives as a number or a string depending on the backend build
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Option<String>,
    pub manager: Option<String>,
}

/// Medical representative projection used by the manager pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalRep {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for MedicalRep {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl UserRecord {
    /// Role check used when projecting the rep roster.
    pub fn is_medical_rep(&self) -> bool {
        self.role
            .as_deref()
            .map(|role| role.contains("MR"))
            .unwrap_or(false)
    }
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(n) => n.to_string(),
        Raw::Text(s) => s,
    })
}
