//! Inventory aggregation over battery units
//!
//! Pure computation: per-category counts for the stock dashboard and
//! the filter/sort used by the battery list screen. Station inventories
//! are tens to low hundreds of units, so each category is counted with
//! an independent pass over the full set.

use serde::Serialize;

use super::classify::{CapacityBand, ConditionCategory, ModelFamily};
use super::model::{BatteryStatus, BatteryUnit};
use crate::domain::error::{DomainError, DomainResult};

/// Counts per state-of-health band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapacityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub critical: usize,
}

/// Counts per manufacturer family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyCounts {
    pub tesla: usize,
    pub byd: usize,
    pub vinfast: usize,
    pub other: usize,
}

/// Counts per operational condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConditionCounts {
    pub maintenance: usize,
    pub critical: usize,
    pub overheated: usize,
    pub aged: usize,
    pub good: usize,
}

/// Counts per battery status bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub empty: usize,
    pub charging: usize,
    pub full: usize,
    pub maintenance: usize,
    pub issued: usize,
}

/// Aggregated inventory view for one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryStats {
    pub total: usize,
    pub capacity: CapacityCounts,
    pub family: FamilyCounts,
    pub condition: ConditionCounts,
    pub status: StatusCounts,
}

impl InventoryStats {
    /// Count every classification axis over the full unit set. Each
    /// axis partitions the set, so its counts sum to `total`.
    pub fn summarize(units: &[BatteryUnit]) -> Self {
        let band = |b: CapacityBand| units.iter().filter(|u| u.capacity_band() == b).count();
        let family = |f: ModelFamily| units.iter().filter(|u| u.model_family() == f).count();
        let cond =
            |c: ConditionCategory| units.iter().filter(|u| u.condition_category() == c).count();
        let status = |s: BatteryStatus| units.iter().filter(|u| u.status == s).count();

        Self {
            total: units.len(),
            capacity: CapacityCounts {
                high: band(CapacityBand::High),
                medium: band(CapacityBand::Medium),
                low: band(CapacityBand::Low),
                critical: band(CapacityBand::Critical),
            },
            family: FamilyCounts {
                tesla: family(ModelFamily::Tesla),
                byd: family(ModelFamily::Byd),
                vinfast: family(ModelFamily::Vinfast),
                other: family(ModelFamily::Other),
            },
            condition: ConditionCounts {
                maintenance: cond(ConditionCategory::Maintenance),
                critical: cond(ConditionCategory::Critical),
                overheated: cond(ConditionCategory::Overheated),
                aged: cond(ConditionCategory::Aged),
                good: cond(ConditionCategory::Good),
            },
            status: StatusCounts {
                empty: status(BatteryStatus::Empty),
                charging: status(BatteryStatus::Charging),
                full: status(BatteryStatus::Full),
                maintenance: status(BatteryStatus::Maintenance),
                issued: status(BatteryStatus::Issued),
            },
        }
    }

    /// Cross-check a backend-reported total against the local counts.
    /// The status buckets must also partition the set; a divergence
    /// means the station view and the backend disagree about stock.
    pub fn reconcile(&self, reported_total: usize) -> DomainResult<()> {
        let status_sum = self.status.empty
            + self.status.charging
            + self.status.full
            + self.status.maintenance
            + self.status.issued;
        if status_sum != self.total {
            return Err(DomainError::DataInconsistency(format!(
                "status buckets sum to {} but {} units are present",
                status_sum, self.total
            )));
        }
        if reported_total != self.total {
            return Err(DomainError::DataInconsistency(format!(
                "backend reports {} units, station view has {}",
                reported_total, self.total
            )));
        }
        Ok(())
    }
}

/// Filter applied before sorting the battery list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFilter {
    All,
    Band(CapacityBand),
    Family(ModelFamily),
    Condition(ConditionCategory),
    Status(BatteryStatus),
}

/// Sort order for the battery list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InventorySort {
    /// Rack slot order
    #[default]
    SlotAsc,
    HealthDesc,
    CyclesDesc,
    TemperatureDesc,
    VoltageDesc,
    ModelNameAsc,
    StatusAsc,
}

/// Apply a category filter, then order the survivors.
pub fn filter_and_sort(
    units: &[BatteryUnit],
    filter: InventoryFilter,
    sort: InventorySort,
) -> Vec<BatteryUnit> {
    let mut selected: Vec<BatteryUnit> = units
        .iter()
        .filter(|u| match filter {
            InventoryFilter::All => true,
            InventoryFilter::Band(b) => u.capacity_band() == b,
            InventoryFilter::Family(f) => u.model_family() == f,
            InventoryFilter::Condition(c) => u.condition_category() == c,
            InventoryFilter::Status(s) => u.status == s,
        })
        .cloned()
        .collect();

    match sort {
        InventorySort::SlotAsc => selected.sort_by_key(|u| u.slot_number),
        InventorySort::HealthDesc => {
            selected.sort_by(|a, b| b.health_pct.total_cmp(&a.health_pct))
        }
        InventorySort::CyclesDesc => selected.sort_by(|a, b| b.cycle_count.cmp(&a.cycle_count)),
        InventorySort::TemperatureDesc => {
            selected.sort_by(|a, b| b.temperature_c.total_cmp(&a.temperature_c))
        }
        InventorySort::VoltageDesc => selected.sort_by(|a, b| b.voltage.total_cmp(&a.voltage)),
        InventorySort::ModelNameAsc => selected.sort_by(|a, b| a.model_name.cmp(&b.model_name)),
        InventorySort::StatusAsc => selected.sort_by_key(|u| u.status.code()),
    }

    selected
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn unit(id: &str, health: f32, status: BatteryStatus) -> BatteryUnit {
        BatteryUnit {
            id: id.into(),
            serial: format!("SN-{id}"),
            battery_model_id: "BM-1".into(),
            model_name: "VinFast VF-48".into(),
            station_id: "ST-01".into(),
            slot_number: 0,
            status,
            is_reserved: false,
            health_pct: health,
            voltage: 52.0,
            temperature_c: 25.0,
            cycle_count: 10,
            updated_at: Utc::now(),
        }
    }

    fn sample_inventory() -> Vec<BatteryUnit> {
        vec![
            unit("1", 95.0, BatteryStatus::Full),
            unit("2", 75.0, BatteryStatus::Charging),
            unit("3", 40.0, BatteryStatus::Empty),
        ]
    }

    #[test]
    fn capacity_counts_for_known_healths() {
        // 95 / 75 / 40 → one high, one medium, one critical
        let stats = InventoryStats::summarize(&sample_inventory());
        assert_eq!(stats.capacity.high, 1);
        assert_eq!(stats.capacity.medium, 1);
        assert_eq!(stats.capacity.low, 0);
        assert_eq!(stats.capacity.critical, 1);
    }

    #[test]
    fn every_axis_partitions_the_set() {
        let mut units = sample_inventory();
        units.push(unit("4", 60.0, BatteryStatus::Maintenance));
        units.push(unit("5", 88.0, BatteryStatus::Issued));
        let stats = InventoryStats::summarize(&units);
        let n = units.len();

        let c = &stats.capacity;
        assert_eq!(c.high + c.medium + c.low + c.critical, n);
        let f = &stats.family;
        assert_eq!(f.tesla + f.byd + f.vinfast + f.other, n);
        let d = &stats.condition;
        assert_eq!(d.maintenance + d.critical + d.overheated + d.aged + d.good, n);
        let s = &stats.status;
        assert_eq!(s.empty + s.charging + s.full + s.maintenance + s.issued, n);
    }

    #[test]
    fn summarize_empty_inventory() {
        let stats = InventoryStats::summarize(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.capacity, CapacityCounts::default());
        stats.reconcile(0).unwrap();
    }

    #[test]
    fn reconcile_flags_diverging_total() {
        let stats = InventoryStats::summarize(&sample_inventory());
        stats.reconcile(3).unwrap();
        let err = stats.reconcile(5).unwrap_err();
        assert!(matches!(err, DomainError::DataInconsistency(_)));
    }

    #[test]
    fn filter_by_status_and_band() {
        let units = sample_inventory();
        let full = filter_and_sort(
            &units,
            InventoryFilter::Status(BatteryStatus::Full),
            InventorySort::default(),
        );
        assert_eq!(full.len(), 1);
        assert_eq!(full[0].id, "1");

        let critical = filter_and_sort(
            &units,
            InventoryFilter::Band(CapacityBand::Critical),
            InventorySort::default(),
        );
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].id, "3");
    }

    #[test]
    fn sort_health_desc() {
        let sorted = filter_and_sort(
            &sample_inventory(),
            InventoryFilter::All,
            InventorySort::HealthDesc,
        );
        let healths: Vec<f32> = sorted.iter().map(|u| u.health_pct).collect();
        assert_eq!(healths, vec![95.0, 75.0, 40.0]);
    }

    #[test]
    fn default_sort_is_slot_order() {
        let mut units = sample_inventory();
        units[0].slot_number = 9;
        units[1].slot_number = 2;
        units[2].slot_number = 5;
        let sorted = filter_and_sort(&units, InventoryFilter::All, InventorySort::default());
        let slots: Vec<u32> = sorted.iter().map(|u| u.slot_number).collect();
        assert_eq!(slots, vec![2, 5, 9]);
    }
}
