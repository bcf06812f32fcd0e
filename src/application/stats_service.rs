// Stats service - Use case for reading Pi-hole counters and history
use crate::application::stats_api::StatsApi;
use crate::domain::stats::{
    aligned_columns, contains_sentinel, BackendStatus, StatsError, StatsSnapshot,
    TimeSeriesPair, NOT_RUNNING_SENTINEL,
};
use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

const STATUS_QUERY: &str = "status";
const SUMMARY_QUERY: &str = "summaryRaw";
const HISTORY_QUERY: &str = "overTimeData10mins";

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    unique_clients: u64,
    ads_blocked_today: u64,
    ads_percentage_today: f64,
    dns_queries_today: u64,
}

#[derive(Clone)]
pub struct StatsService {
    api: Arc<dyn StatsApi>,
    columns: Option<usize>,
}

impl StatsService {
    pub fn new(api: Arc<dyn StatsApi>) -> Self {
        Self { api, columns: None }
    }

    /// Keep only the most recent `columns` buckets of each history series
    pub fn with_columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Query the daemon status. A payload carrying the not-running marker,
    /// in whatever shape, is reported as `NotRunning`. Any other body that is
    /// not JSON (a login page behind a wrong `api_url`, say) is an error.
    pub async fn get_status(&self) -> anyhow::Result<BackendStatus> {
        let raw = self.api.get_raw(STATUS_QUERY).await?;
        if raw.contains(NOT_RUNNING_SENTINEL) {
            return Ok(BackendStatus::NotRunning);
        }

        let payload: Value =
            serde_json::from_str(&raw).context("Failed to parse Pi-hole status")?;
        if contains_sentinel(&payload) {
            return Ok(BackendStatus::NotRunning);
        }
        Ok(BackendStatus::Running(payload))
    }

    async fn backend_running(&self) -> anyhow::Result<bool> {
        match self.get_status().await? {
            BackendStatus::Running(payload) => {
                tracing::debug!("Backend status: {}", payload);
                Ok(true)
            }
            BackendStatus::NotRunning => Ok(false),
        }
    }

    pub async fn get_current_stats(&self) -> anyhow::Result<StatsSnapshot> {
        if !self.backend_running().await? {
            return Ok(StatsSnapshot::not_running());
        }

        let raw = self.api.get_raw(SUMMARY_QUERY).await?;
        let summary: SummaryResponse =
            serde_json::from_str(&raw).context("Failed to parse Pi-hole summary")?;

        Ok(StatsSnapshot::new(
            summary.unique_clients,
            summary.ads_blocked_today,
            summary.ads_percentage_today,
            summary.dns_queries_today,
        ))
    }

    pub async fn get_history_stats(&self) -> anyhow::Result<TimeSeriesPair> {
        if !self.backend_running().await? {
            return Ok(TimeSeriesPair::not_running());
        }

        let raw = self.api.get_raw(HISTORY_QUERY).await?;
        let data: Value =
            serde_json::from_str(&raw).context("Failed to parse Pi-hole history")?;

        let (domains, ads) = aligned_columns(
            bucket_map(&data, "domains_over_time")?,
            bucket_map(&data, "ads_over_time")?,
            self.columns,
        )?;

        tracing::debug!("History has {} domain and {} ad buckets", domains.len(), ads.len());
        Ok(TimeSeriesPair::new(domains, ads))
    }
}

fn bucket_map<'a>(data: &'a Value, field: &'static str) -> Result<&'a Map<String, Value>, StatsError> {
    match data.get(field) {
        None => Err(StatsError::MissingField(field)),
        Some(Value::Object(map)) => Ok(map),
        // An empty history comes back as `[]` rather than `{}`
        Some(Value::Array(items)) if items.is_empty() => Ok(empty_map()),
        Some(_) => Err(StatsError::NotABucketMap(field)),
    }
}

fn empty_map() -> &'static Map<String, Value> {
    static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
    EMPTY.get_or_init(Map::new)
}
