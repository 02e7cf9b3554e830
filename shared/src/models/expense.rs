//! Expense Models

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Expense review status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ExpenseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expense claim submitted by a medical rep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub mr_name: String,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    /// Date the cost was incurred (YYYY-MM-DD)
    pub date: String,
    pub submitted_date: Option<String>,
    #[serde(default)]
    pub status: ExpenseStatus,
    /// Receipt attachment name or URL
    pub receipt: Option<String>,
    pub approved_by: Option<String>,
    pub approved_date: Option<String>,
    pub rejected_by: Option<String>,
    pub rejection_reason: Option<String>,
}

impl Expense {
    /// Only pending claims accept a review decision.
    pub fn ensure_reviewable(&self, next: ExpenseStatus) -> DomainResult<()> {
        if self.status != ExpenseStatus::Pending {
            return Err(DomainError::InvalidTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        Ok(())
    }
}

/// Submit expense payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCreate {
    pub mr_name: String,
    pub category: String,
    pub amount: f64,
    pub description: Option<String>,
    pub date: String,
    pub receipt: Option<String>,
}

/// Body for the approve endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseApproval {
    pub approved_by: String,
}

/// Body for the reject endpoint; a reason is always required
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRejection {
    pub rejected_by: String,
    pub reason: String,
}
