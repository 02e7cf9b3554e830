//! Sales Target Models

use serde::{Deserialize, Serialize};

/// Attainment band derived from the sales achievement percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementBand {
    Excellent,
    Good,
    Average,
    NeedsImprovement,
}

impl AchievementBand {
    /// Band thresholds: 90 / 75 / 50.
    pub fn for_percentage(pct: u32) -> Self {
        match pct {
            90.. => Self::Excellent,
            75.. => Self::Good,
            50.. => Self::Average,
            _ => Self::NeedsImprovement,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Periodic sales and visit target for one medical rep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: i64,
    pub mr_name: String,
    /// e.g. "Q3 2025" or "August 2025"
    pub period: String,
    pub sales_target: f64,
    #[serde(default)]
    pub sales_achievement: f64,
    #[serde(default)]
    pub visits_target: i64,
    #[serde(default)]
    pub visits_achievement: i64,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

impl Target {
    /// Build a full record from a create payload and an assigned ID.
    pub fn from_create(id: i64, payload: TargetCreate) -> Self {
        Self {
            id,
            mr_name: payload.mr_name,
            period: payload.period,
            sales_target: payload.sales_target,
            sales_achievement: payload.sales_achievement.unwrap_or(0.0),
            visits_target: payload.visits_target.unwrap_or(0),
            visits_achievement: payload.visits_achievement.unwrap_or(0),
            start_date: payload.start_date,
            end_date: payload.end_date,
            notes: payload.notes,
        }
    }

    /// Apply an edit-form payload; absent fields keep their value.
    pub fn apply(&mut self, update: TargetUpdate) {
        if let Some(v) = update.mr_name {
            self.mr_name = v;
        }
        if let Some(v) = update.period {
            self.period = v;
        }
        if let Some(v) = update.sales_target {
            self.sales_target = v;
        }
        if let Some(v) = update.sales_achievement {
            self.sales_achievement = v;
        }
        if let Some(v) = update.visits_target {
            self.visits_target = v;
        }
        if let Some(v) = update.visits_achievement {
            self.visits_achievement = v;
        }
        if update.start_date.is_some() {
            self.start_date = update.start_date;
        }
        if update.end_date.is_some() {
            self.end_date = update.end_date;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
    }

    /// Whole-percent sales attainment; zero when no target is set.
    pub fn achievement_percentage(&self) -> u32 {
        if self.sales_target <= 0.0 {
            return 0;
        }
        ((self.sales_achievement / self.sales_target) * 100.0).round() as u32
    }

    pub fn band(&self) -> AchievementBand {
        AchievementBand::for_percentage(self.achievement_percentage())
    }
}

/// Create target payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCreate {
    pub mr_name: String,
    pub period: String,
    pub sales_target: f64,
    pub sales_achievement: Option<f64>,
    pub visits_target: Option<i64>,
    pub visits_achievement: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}

/// Update target payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetUpdate {
    pub mr_name: Option<String>,
    pub period: Option<String>,
    pub sales_target: Option<f64>,
    pub sales_achievement: Option<f64>,
    pub visits_target: Option<i64>,
    pub visits_achievement: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub notes: Option<String>,
}
