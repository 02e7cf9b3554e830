//! Task Models

use serde::{Deserialize, Serialize};

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Overdue,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field task assigned to a medical rep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    /// e.g. "Doctor Visit", "Sample Delivery", "Collection"
    #[serde(rename = "type", default)]
    pub task_type: String,
    /// Email of the assigned medical rep
    pub assigned_to: String,
    pub doctor_name: Option<String>,
    pub clinic_name: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Due date (YYYY-MM-DD)
    pub due_date: String,
    pub due_time: Option<String>,
    pub description: Option<String>,
    pub created_date: Option<String>,
}

impl Task {
    /// Build a full record from a create payload and an assigned ID.
    pub fn from_create(id: i64, payload: TaskCreate, created_date: String) -> Self {
        Self {
            id,
            title: payload.title,
            task_type: payload.task_type.unwrap_or_default(),
            assigned_to: payload.assigned_to,
            doctor_name: payload.doctor_name,
            clinic_name: payload.clinic_name,
            location: payload.location,
            priority: payload.priority.unwrap_or_else(|| "Medium".to_string()),
            status: TaskStatus::Pending,
            due_date: payload.due_date,
            due_time: payload.due_time,
            description: payload.description,
            created_date: Some(created_date),
        }
    }

    /// Apply an edit-form payload; absent fields keep their value.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(v) = update.title {
            self.title = v;
        }
        if let Some(v) = update.task_type {
            self.task_type = v;
        }
        if let Some(v) = update.assigned_to {
            self.assigned_to = v;
        }
        if update.doctor_name.is_some() {
            self.doctor_name = update.doctor_name;
        }
        if update.clinic_name.is_some() {
            self.clinic_name = update.clinic_name;
        }
        if update.location.is_some() {
            self.location = update.location;
        }
        if let Some(v) = update.priority {
            self.priority = v;
        }
        if let Some(v) = update.status {
            self.status = v;
        }
        if let Some(v) = update.due_date {
            self.due_date = v;
        }
        if update.due_time.is_some() {
            self.due_time = update.due_time;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
    }

    /// Status with the overdue derivation applied: anything not yet
    /// completed whose due date lies before `today` reads as overdue.
    pub fn effective_status(&self, today: &str) -> TaskStatus {
        if self.status != TaskStatus::Completed && self.due_date.as_str() < today {
            TaskStatus::Overdue
        } else {
            self.status
        }
    }
}

/// Create task payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreate {
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    pub assigned_to: String,
    pub doctor_name: Option<String>,
    pub clinic_name: Option<String>,
    pub location: Option<String>,
    pub priority: Option<String>,
    pub due_date: String,
    pub due_time: Option<String>,
    pub description: Option<String>,
}

/// Update task payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    pub assigned_to: Option<String>,
    pub doctor_name: Option<String>,
    pub clinic_name: Option<String>,
    pub location: Option<String>,
    pub priority: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<String>,
    pub due_time: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(status: TaskStatus, due: &str) -> Task {
        Task {
            id: 1,
            title: "Visit City Clinic".to_string(),
            task_type: "Doctor Visit".to_string(),
            assigned_to: "priya@kavya.example".to_string(),
            doctor_name: None,
            clinic_name: None,
            location: None,
            priority: "High".to_string(),
            status,
            due_date: due.to_string(),
            due_time: None,
            description: None,
            created_date: None,
        }
    }

    #[test]
    fn statuses_use_the_kebab_case_wire_form() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }

    #[test]
    fn past_due_open_tasks_read_as_overdue() {
        let task = sample_task(TaskStatus::Pending, "2025-08-01");
        assert_eq!(task.effective_status("2025-08-20"), TaskStatus::Overdue);
        let done = sample_task(TaskStatus::Completed, "2025-08-01");
        assert_eq!(done.effective_status("2025-08-20"), TaskStatus::Completed);
        let future = sample_task(TaskStatus::Pending, "2025-08-25");
        assert_eq!(future.effective_status("2025-08-20"), TaskStatus::Pending);
    }
}
