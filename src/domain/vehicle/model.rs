//! Vehicle domain entities

use serde::{Deserialize, Serialize};

/// OCR fields below this confidence are not prefilled.
pub const SCAN_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// A registered driver vehicle. The VIN is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub vin: String,
    pub plate: String,
    pub vehicle_model_id: String,
    /// Display name of the vehicle model
    #[serde(default)]
    pub model_name: String,
    /// Battery model this vehicle takes
    pub compatible_battery_model_id: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub registration_photo_url: Option<String>,
}

impl Vehicle {
    pub fn accepts_battery_model(&self, battery_model_id: &str) -> bool {
        self.compatible_battery_model_id == battery_model_id
    }
}

/// Registration form state, prefilled from an OCR scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleDraft {
    pub vin: String,
    pub plate: String,
    pub brand: String,
    pub vehicle_model: String,
}

/// OCR result for an uploaded registration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationScan {
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub vehicle_model: Option<String>,
    /// Overall OCR confidence (0–1)
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub raw_data: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl RegistrationScan {
    /// Prefill a draft from the scan. Only fires at or above the
    /// confidence threshold, and never overwrites what the operator
    /// already typed.
    pub fn apply_to(&self, draft: &mut VehicleDraft) {
        if self.confidence < SCAN_CONFIDENCE_THRESHOLD {
            return;
        }
        let fill = |target: &mut String, scanned: &Option<String>| {
            if target.is_empty() {
                if let Some(value) = scanned {
                    *target = value.clone();
                }
            }
        };
        fill(&mut draft.vin, &self.vin);
        fill(&mut draft.plate, &self.plate);
        fill(&mut draft.brand, &self.brand);
        fill(&mut draft.vehicle_model, &self.vehicle_model);
    }
}

// ── Tests ──────────────────────────────────────────────────────
