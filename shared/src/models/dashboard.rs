//! Dashboard Models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw counters returned by the stats endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    #[serde(rename = "totalMRs", default)]
    pub total_mrs: i64,
    #[serde(default)]
    pub total_doctors: i64,
}

/// Headline counters shown on the manager dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(rename = "totalMRs")]
    pub total_mrs: i64,
    pub total_sales: f64,
    /// Doctor count stands in for visits until the backend serves them
    pub total_visits: i64,
    pub pending_tasks: i64,
    pub period: String,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            total_mrs: 0,
            total_sales: 0.0,
            total_visits: 0,
            pending_tasks: 0,
            period: "month".to_string(),
        }
    }
}

impl DashboardStats {
    /// Fold a stats response into the displayed counters.
    pub fn absorb(&mut self, response: DashboardStatsResponse) {
        self.total_mrs = response.total_mrs;
        self.total_visits = response.total_doctors;
        self.total_sales = 0.0;
        self.pending_tasks = 0;
    }
}

/// Chart series for the dashboard graphs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    #[serde(default)]
    pub month_labels: Vec<String>,
    #[serde(default)]
    pub sales_by_month: Vec<f64>,
    #[serde(default)]
    pub visits_by_month: Vec<f64>,
    #[serde(default)]
    pub targets_by_month: Vec<f64>,
    #[serde(default)]
    pub expense_by_category: BTreeMap<String, f64>,
    #[serde(default)]
    pub product_sales_by_month: BTreeMap<String, Vec<f64>>,
}

impl DashboardCharts {
    /// Zeroed six-month placeholder used when the endpoint is down and
    /// nothing is cached.
    pub fn placeholder() -> Self {
        let months = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
        let categories = ["Travel", "Meals", "Samples", "Marketing", "Other"];
        let products = ["Product A", "Product B", "Product C", "Product D"];
        Self {
            month_labels: months.iter().map(|m| m.to_string()).collect(),
            sales_by_month: vec![0.0; months.len()],
            visits_by_month: vec![0.0; months.len()],
            targets_by_month: vec![0.0; months.len()],
            expense_by_category: categories
                .iter()
                .map(|c| (c.to_string(), 0.0))
                .collect(),
            product_sales_by_month: products
                .iter()
                .map(|p| (p.to_string(), vec![0.0; months.len()]))
                .collect(),
        }
    }
}
