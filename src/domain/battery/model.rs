//! Battery unit domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Battery unit status, carried over the wire as a numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BatteryStatus {
    /// Discharged, waiting for a charger slot
    Empty,
    /// On a charger
    Charging,
    /// Charged and swappable
    Full,
    /// Pulled from rotation for service
    Maintenance,
    /// Handed to a driver, out of the station
    Issued,
}

impl BatteryStatus {
    pub fn code(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Charging => 1,
            Self::Full => 2,
            Self::Maintenance => 3,
            Self::Issued => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Charging => "Charging",
            Self::Full => "Full",
            Self::Maintenance => "Maintenance",
            Self::Issued => "Issued",
        }
    }
}

impl TryFrom<u8> for BatteryStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Charging),
            2 => Ok(Self::Full),
            3 => Ok(Self::Maintenance),
            4 => Ok(Self::Issued),
            other => Err(format!("unknown battery status code {}", other)),
        }
    }
}

impl From<BatteryStatus> for u8 {
    fn from(status: BatteryStatus) -> u8 {
        status.code()
    }
}

impl std::fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical battery pack tracked at a station.
///
/// Telemetry fields (`health_pct`, `voltage`, `temperature_c`,
/// `cycle_count`) feed display and classification only; they carry no
/// persisted invariants and default to zero when the backend omits them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryUnit {
    pub id: String,
    /// Unique manufacturer serial
    pub serial: String,
    pub battery_model_id: String,
    /// Display name of the model, e.g. "VinFast VF-48"
    pub model_name: String,
    pub station_id: String,
    /// Physical rack slot at the station
    #[serde(default)]
    pub slot_number: u32,
    pub status: BatteryStatus,
    #[serde(default)]
    pub is_reserved: bool,
    /// State-of-health percentage (0–100)
    #[serde(default)]
    pub health_pct: f32,
    #[serde(default)]
    pub voltage: f32,
    #[serde(default)]
    pub temperature_c: f32,
    #[serde(default)]
    pub cycle_count: u32,
    pub updated_at: DateTime<Utc>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_roundtrip() {
        for status in [
            BatteryStatus::Empty,
            BatteryStatus::Charging,
            BatteryStatus::Full,
            BatteryStatus::Maintenance,
            BatteryStatus::Issued,
        ] {
            assert_eq!(BatteryStatus::try_from(status.code()).unwrap(), status);
        }
        assert!(BatteryStatus::try_from(5).is_err());
    }

    #[test]
    fn decodes_unit_with_missing_telemetry() {
        let raw = serde_json::json!({
            "id": "u-1",
            "serial": "VF-000101",
            "batteryModelId": "BM-48",
            "modelName": "VinFast VF-48",
            "stationId": "ST-01",
            "status": 2,
            "updatedAt": "2025-06-01T10:00:00Z"
        });
        let unit: BatteryUnit = serde_json::from_value(raw).unwrap();
        assert_eq!(unit.status, BatteryStatus::Full);
        assert_eq!(unit.health_pct, 0.0);
        assert_eq!(unit.cycle_count, 0);
        assert!(!unit.is_reserved);
    }
}
