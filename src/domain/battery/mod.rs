mod classify;
mod model;
mod stats;

pub use classify::{CapacityBand, ConditionCategory, ModelFamily};
pub use model::{BatteryStatus, BatteryUnit};
pub use stats::{
    filter_and_sort, CapacityCounts, ConditionCounts, FamilyCounts, InventoryFilter,
    InventorySort, InventoryStats, StatusCounts,
};
