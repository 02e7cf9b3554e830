//! Dashboard manager
//!
//! Read-only stats and chart series. Both endpoints are fetched
//! together; each falls back to its cached copy independently, and to a
//! zeroed placeholder when nothing was ever cached.

use shared::models::{DashboardCharts, DashboardStats, DashboardStatsResponse};

use crate::http::ApiClient;
use crate::store::{LocalStore, keys};
use crate::sync::DataMode;
use crate::view::ChartSeries;

/// Manager for the dashboard read models
#[derive(Debug)]
pub struct DashboardManager {
    api: ApiClient,
    store: LocalStore,
    stats: DashboardStats,
    charts: DashboardCharts,
    mode: DataMode,
}

impl DashboardManager {
    pub fn new(api: ApiClient, store: LocalStore) -> Self {
        let stats = store
            .load(keys::DASHBOARD_STATS)
            .ok()
            .flatten()
            .unwrap_or_default();
        let charts = store
            .load(keys::DASHBOARD_CHARTS)
            .ok()
            .flatten()
            .unwrap_or_else(DashboardCharts::placeholder);
        Self {
            api,
            store,
            stats,
            charts,
            mode: DataMode::Fallback,
        }
    }

    pub fn mode(&self) -> DataMode {
        self.mode
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn charts(&self) -> &DashboardCharts {
        &self.charts
    }

    /// Fetch stats and charts together. The stats fetch decides the
    /// mode; a chart failure alone keeps the cached series.
    pub async fn refresh(&mut self) -> DataMode {
        let (stats, charts) = tokio::join!(
            self.api.get::<DashboardStatsResponse>("dashboard/stats"),
            self.api.get::<DashboardCharts>("dashboard/charts"),
        );

        match stats {
            Ok(response) => {
                self.stats.absorb(response);
                if let Err(e) = self.store.save(keys::DASHBOARD_STATS, &self.stats) {
                    tracing::warn!(error = %e, "failed to cache dashboard stats");
                }
                self.mode = DataMode::Api;
            }
            Err(e) => {
                tracing::warn!(error = %e, "stats endpoint unreachable, serving cached stats");
                self.mode = DataMode::Fallback;
            }
        }

        match charts {
            Ok(response) => {
                self.charts = response;
                if let Err(e) = self.store.save(keys::DASHBOARD_CHARTS, &self.charts) {
                    tracing::warn!(error = %e, "failed to cache dashboard charts");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "charts endpoint unreachable, serving cached charts");
            }
        }
        self.mode
    }

    /// Monthly sales as one renderable series.
    pub fn sales_series(&self) -> ChartSeries {
        ChartSeries::new(
            self.charts.month_labels.clone(),
            self.charts.sales_by_month.clone(),
        )
    }

    /// Expense split by category as one renderable series.
    pub fn expense_series(&self) -> ChartSeries {
        ChartSeries::from_pairs(
            self.charts
                .expense_by_category
                .iter()
                .map(|(k, v)| (k.clone(), *v)),
        )
    }
}
