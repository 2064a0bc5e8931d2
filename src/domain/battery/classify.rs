//! Battery classification rules
//!
//! Three independent axes over a unit's telemetry: capacity band,
//! model family and condition. Each axis is total — every unit maps to
//! exactly one category.

use super::model::{BatteryStatus, BatteryUnit};

/// State-of-health band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityBand {
    /// ≥ 90 %
    High,
    /// 70–89 %
    Medium,
    /// 50–69 %
    Low,
    /// < 50 %
    Critical,
}

/// Manufacturer family, matched on the model display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Tesla,
    Byd,
    Vinfast,
    Other,
}

/// Operational condition. Categories are checked in declaration order
/// and the first match wins, so a unit in maintenance is always
/// `Maintenance` whatever its telemetry says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionCategory {
    Maintenance,
    /// Health below 50 %
    Critical,
    /// Above 45 °C
    Overheated,
    /// More than 1000 charge cycles
    Aged,
    Good,
}

impl BatteryUnit {
    pub fn capacity_band(&self) -> CapacityBand {
        match self.health_pct {
            h if h >= 90.0 => CapacityBand::High,
            h if h >= 70.0 => CapacityBand::Medium,
            h if h >= 50.0 => CapacityBand::Low,
            _ => CapacityBand::Critical,
        }
    }

    pub fn model_family(&self) -> ModelFamily {
        let name = self.model_name.to_lowercase();
        if name.contains("tesla") {
            ModelFamily::Tesla
        } else if name.contains("byd") {
            ModelFamily::Byd
        } else if name.contains("vinfast") {
            ModelFamily::Vinfast
        } else {
            ModelFamily::Other
        }
    }

    pub fn condition_category(&self) -> ConditionCategory {
        if self.status == BatteryStatus::Maintenance {
            ConditionCategory::Maintenance
        } else if self.health_pct < 50.0 {
            ConditionCategory::Critical
        } else if self.temperature_c > 45.0 {
            ConditionCategory::Overheated
        } else if self.cycle_count > 1000 {
            ConditionCategory::Aged
        } else {
            ConditionCategory::Good
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
