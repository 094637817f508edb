use std::collections::HashSet;
use std::path::Path;

use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// A check-in is considered fresh for this long. Past it, the device is
/// treated as away even on a home SSID.
pub const FRESHNESS_WINDOW_SECS: i64 = 3600;

#[derive(Error, Debug)]
pub enum CheckInError {
    #[error("Failed to read check-in file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse check-in file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The latest "last seen on network" snapshot, written by an external
/// process. This program only ever reads it.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInRecord {
    #[serde(with = "ts_seconds")]
    pub check_in_time: DateTime<Utc>,
    pub ssid: String,
    pub ip: String,
}

#[derive(Debug, Deserialize)]
struct CheckInFile {
    data: CheckInRecord,
}

pub fn read_check_in(path: impl AsRef<Path>) -> Result<CheckInRecord, CheckInError> {
    let contents = std::fs::read_to_string(path)?;
    let file: CheckInFile = serde_json::from_str(&contents)?;
    Ok(file.data)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresenceVerdict {
    pub is_away: bool,
    /// Minutes since the last check-in, rounded to one decimal. Reporting
    /// only; the away comparison uses whole seconds.
    pub minutes_since_check_in: f64,
    pub ssid: String,
    pub ip: String,
}

/// Pure function of (check-in record, allow list, current time).
pub fn evaluate(
    record: &CheckInRecord,
    allow_list: &HashSet<String>,
    now: DateTime<Utc>,
) -> PresenceVerdict {
    let seconds_since = (now - record.check_in_time).num_seconds();
    let minutes_since = (seconds_since as f64 / 60.0 * 10.0).round() / 10.0;

    info!(
        "Latest check-in at {} ({minutes_since} minutes ago). SSID: \"{}\". IP: \"{}\".",
        record.check_in_time.format("%Y-%m-%dT%H:%M:%S"),
        record.ssid,
        record.ip
    );

    let is_away =
        !(allow_list.contains(&record.ssid) && seconds_since <= FRESHNESS_WINDOW_SECS);

    PresenceVerdict {
        is_away,
        minutes_since_check_in: minutes_since,
        ssid: record.ssid.clone(),
        ip: record.ip.clone(),
    }
}
