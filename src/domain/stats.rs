// Pi-hole statistics domain models
use serde_json::{Map, Value};

/// Marker the backend puts in its payload when the FTL daemon is down.
pub const NOT_RUNNING_SENTINEL: &str = "FTLnotrunning";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum StatsError {
    #[error("bucket {key} has a non-numeric value: {value}")]
    NonNumericBucket { key: String, value: String },
    #[error("response is missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` is not an object of buckets")]
    NotABucketMap(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendStatus {
    Running(Value),
    NotRunning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub success: bool,
    pub unique_clients: u64,
    pub ads_blocked_today: u64,
    pub ads_percentage_today: f64,
    pub dns_queries_today: u64,
}

impl StatsSnapshot {
    pub fn new(
        unique_clients: u64,
        ads_blocked_today: u64,
        ads_percentage_today: f64,
        dns_queries_today: u64,
    ) -> Self {
        Self {
            success: true,
            unique_clients,
            ads_blocked_today,
            ads_percentage_today,
            dns_queries_today,
        }
    }

    pub fn not_running() -> Self {
        Self {
            success: false,
            unique_clients: 0,
            ads_blocked_today: 0,
            ads_percentage_today: 0.0,
            dns_queries_today: 0,
        }
    }
}

/// Parallel per-bucket counters, oldest bucket first.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPair {
    pub success: bool,
    pub domains: Vec<u64>,
    pub ads: Vec<u64>,
}

impl TimeSeriesPair {
    pub fn new(domains: Vec<u64>, ads: Vec<u64>) -> Self {
        Self {
            success: true,
            domains,
            ads,
        }
    }

    pub fn not_running() -> Self {
        Self {
            success: false,
            domains: Vec::new(),
            ads: Vec::new(),
        }
    }
}

/// True when the sentinel shows up in any key or string value of the payload.
pub fn contains_sentinel(value: &Value) -> bool {
    match value {
        Value::String(s) => s.contains(NOT_RUNNING_SENTINEL),
        Value::Array(items) => items.iter().any(contains_sentinel),
        Value::Object(map) => map
            .iter()
            .any(|(k, v)| k.contains(NOT_RUNNING_SENTINEL) || contains_sentinel(v)),
        _ => false,
    }
}

/// Bucket entries in display order.
///
/// Keys that all parse as integers are sorted numerically, since Pi-hole keys
/// are unix timestamps. Otherwise the backend's own key order is kept.
fn ordered_entries(buckets: &Map<String, Value>) -> Vec<(&str, &Value)> {
    let entries: Vec<(&str, &Value)> = buckets.iter().map(|(k, v)| (k.as_str(), v)).collect();
    let numeric_keys: Option<Vec<i64>> = entries.iter().map(|(k, _)| k.parse().ok()).collect();
    match numeric_keys {
        Some(keys) => {
            let mut keyed: Vec<(i64, (&str, &Value))> = keys.into_iter().zip(entries).collect();
            keyed.sort_by_key(|(n, _)| *n);
            keyed.into_iter().map(|(_, entry)| entry).collect()
        }
        None => entries,
    }
}

fn keep_recent(columns: &mut Vec<u64>, limit: Option<usize>) {
    if let Some(limit) = limit {
        let excess = columns.len().saturating_sub(limit);
        columns.drain(..excess);
    }
}

/// Flatten a bucket map (`{"<timestamp>": count, ...}`) into an ordered column.
/// `limit` keeps only the most recent `limit` buckets.
pub fn columns_from_buckets(
    buckets: &Map<String, Value>,
    limit: Option<usize>,
) -> Result<Vec<u64>, StatsError> {
    let mut columns = ordered_entries(buckets)
        .into_iter()
        .map(|(key, value)| bucket_value(key, value))
        .collect::<Result<Vec<_>, _>>()?;
    keep_recent(&mut columns, limit);
    Ok(columns)
}

/// Flatten a totals map and a sub map onto the totals' bucket axis, so the
/// two columns line up index for index.
///
/// Totals buckets absent from `sub` count as zero; `sub` buckets absent from
/// `totals` are dropped.
pub fn aligned_columns(
    totals: &Map<String, Value>,
    sub: &Map<String, Value>,
    limit: Option<usize>,
) -> Result<(Vec<u64>, Vec<u64>), StatsError> {
    let mut total_column = columns_from_buckets(totals, None)?;
    let mut sub_column = Vec::with_capacity(total_column.len());
    for (key, _) in ordered_entries(totals) {
        sub_column.push(match sub.get(key) {
            Some(v) => bucket_value(key, v)?,
            None => 0,
        });
    }

    keep_recent(&mut total_column, limit);
    keep_recent(&mut sub_column, limit);
    Ok((total_column, sub_column))
}

fn bucket_value(key: &str, value: &Value) -> Result<u64, StatsError> {
    if let Some(v) = value.as_u64() {
        return Ok(v);
    }
    match value.as_f64() {
        Some(v) if v >= 0.0 => Ok(v.round() as u64),
        _ => Err(StatsError::NonNumericBucket {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
