use serde::{Deserialize, Serialize};

/// Power state as reported (and accepted) by the LIFX HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    On,
    Off,
}

/// A single bulb as returned by the list endpoint. The API reports many more
/// fields (group, location, color, ...); only the ones this program acts on
/// are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct Light {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub power: Power,
}

impl Light {
    pub fn is_on(&self) -> bool {
        self.power == Power::On
    }
}

/// Relative state change applied to a selector over a transition duration.
/// Only the fields that are set are sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Power>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl StateDelta {
    /// Relative brightness change (e.g. `-0.3`) over `duration` seconds.
    pub fn brightness(delta: f64, duration: f64) -> Self {
        StateDelta {
            brightness: Some(delta),
            power: None,
            duration: Some(duration),
        }
    }

    /// Power off over `duration` seconds.
    pub fn power_off(duration: f64) -> Self {
        StateDelta {
            brightness: None,
            power: Some(Power::Off),
            duration: Some(duration),
        }
    }
}

/// Acknowledgment returned by the state delta endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeltaResponse {
    pub results: Vec<DeltaResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeltaResult {
    pub id: String,
    pub status: String,
}
