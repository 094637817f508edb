use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read secrets file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse secrets file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Secrets/configuration loaded once at startup.
///
/// `HOME_NETWORK_SSID` may be a bare string or an array of strings; either
/// form normalizes to the same allow list before the evaluator ever sees it.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(rename = "API_KEY")]
    pub api_key: String,
    #[serde(rename = "HOME_NETWORK_SSID")]
    home_network_ssid: SsidConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SsidConfig {
    One(String),
    Many(Vec<String>),
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// SSIDs considered "home". Immutable for the process lifetime.
    pub fn allow_list(&self) -> HashSet<String> {
        match &self.home_network_ssid {
            SsidConfig::One(ssid) => HashSet::from([ssid.clone()]),
            SsidConfig::Many(ssids) => ssids.iter().cloned().collect(),
        }
    }
}
