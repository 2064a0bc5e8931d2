//! Battery stock operations
//!
//! Listing and aggregation for the stock dashboard plus the three bulk
//! mutations (add, remove, status move). Mutation quantities are
//! confirmed by the backend response; the dashboard view reconciles the
//! backend-reported total against the local counts.

use std::sync::Arc;

use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::domain::battery::{BatteryStatus, BatteryUnit, InventoryStats};
use crate::domain::ports::ApiGateway;
use crate::domain::{ApiError, DomainError, DomainResult};
use crate::shared::wire;

/// Add freshly delivered units to a station's stock. Serials are
/// generated server-side (`PREFIX-001, PREFIX-002, …`) when a prefix
/// is given.
#[derive(Debug, Clone, Validate)]
pub struct AddStockRequest {
    pub battery_model_id: String,
    pub station_id: String,
    pub status: BatteryStatus,
    #[validate(range(min = 1, max = 500, message = "quantity must be 1–500"))]
    pub quantity: u32,
    #[validate(length(min = 2, max = 12, message = "serial prefix must be 2–12 characters"))]
    pub serial_prefix: Option<String>,
}

/// Retire units from a station's stock.
#[derive(Debug, Clone, Validate)]
pub struct RemoveStockRequest {
    pub battery_model_id: String,
    pub station_id: String,
    pub status: BatteryStatus,
    #[validate(range(min = 1, max = 500, message = "quantity must be 1–500"))]
    pub quantity: u32,
    #[validate(length(max = 200, message = "reason must stay under 200 characters"))]
    pub reason: Option<String>,
}

/// Bulk status move, e.g. Charging → Full when a charge cycle ends.
#[derive(Debug, Clone, Validate)]
pub struct ChangeStatusRequest {
    pub battery_model_id: String,
    pub station_id: String,
    pub from: BatteryStatus,
    pub to: BatteryStatus,
    #[validate(range(min = 1, max = 500, message = "quantity must be 1–500"))]
    pub quantity: u32,
}

/// Serials are generated as `PREFIX-001…`, so the prefix is limited to
/// the charset the label printers handle.
fn valid_serial_prefix(prefix: &str) -> bool {
    prefix
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

pub struct InventoryService {
    gateway: Arc<dyn ApiGateway>,
}

impl InventoryService {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Units at a station, optionally narrowed to one model.
    pub async fn list_units(
        &self,
        station_id: &str,
        battery_model_id: Option<&str>,
    ) -> DomainResult<Vec<BatteryUnit>> {
        let (units, _) = self.fetch_units(station_id, battery_model_id).await?;
        Ok(units)
    }

    /// Units plus aggregated counts for the dashboard. When the backend
    /// reports its own total it is reconciled against the local counts
    /// and a divergence surfaces as a data inconsistency.
    pub async fn overview(
        &self,
        station_id: &str,
    ) -> DomainResult<(Vec<BatteryUnit>, InventoryStats)> {
        let (units, reported_total) = self.fetch_units(station_id, None).await?;
        let stats = InventoryStats::summarize(&units);
        if let Some(total) = reported_total {
            stats.reconcile(total as usize)?;
        }
        Ok((units, stats))
    }

    async fn fetch_units(
        &self,
        station_id: &str,
        battery_model_id: Option<&str>,
    ) -> DomainResult<(Vec<BatteryUnit>, Option<u64>)> {
        let mut path = format!("api/BatteryUnits?stationId={station_id}");
        if let Some(model) = battery_model_id {
            path.push_str(&format!("&modelId={model}"));
        }
        let value = self.gateway.get(&path).await?;
        Ok(wire::decode_list(value)?)
    }

    pub async fn add_stock(&self, request: AddStockRequest) -> DomainResult<u32> {
        request.validate()?;
        if let Some(prefix) = &request.serial_prefix {
            if !valid_serial_prefix(prefix) {
                return Err(DomainError::Validation(
                    "serial prefix may only use A–Z, 0–9 and dashes".to_string(),
                ));
            }
        }
        let value = self
            .gateway
            .post(
                "api/BatteryUnits",
                json!({
                    "batteryModelId": request.battery_model_id,
                    "stationId": request.station_id,
                    "status": request.status.code(),
                    "quantity": request.quantity,
                    "serialPrefix": request.serial_prefix,
                }),
            )
            .await?;
        let added = confirmed_quantity(&value, &["quantityAdded", "added", "quantity"])?;
        info!(
            model = %request.battery_model_id,
            station = %request.station_id,
            status = request.status.as_str(),
            added,
            "Stock added"
        );
        Ok(added)
    }

    pub async fn remove_stock(&self, request: RemoveStockRequest) -> DomainResult<u32> {
        request.validate()?;
        let value = self
            .gateway
            .post(
                "api/BatteryUnits/remove",
                json!({
                    "batteryModelId": request.battery_model_id,
                    "stationId": request.station_id,
                    "status": request.status.code(),
                    "quantity": request.quantity,
                    "reason": request.reason,
                }),
            )
            .await?;
        let removed = confirmed_quantity(&value, &["quantityRemoved", "removed", "quantity"])?;
        info!(
            model = %request.battery_model_id,
            station = %request.station_id,
            removed,
            "Stock retired"
        );
        Ok(removed)
    }

    pub async fn change_status(&self, request: ChangeStatusRequest) -> DomainResult<u32> {
        request.validate()?;
        if request.from == request.to {
            return Err(DomainError::Validation(
                "status move requires two different buckets".to_string(),
            ));
        }
        let value = self
            .gateway
            .patch(
                "api/BatteryUnits/status",
                json!({
                    "batteryModelId": request.battery_model_id,
                    "stationId": request.station_id,
                    "fromStatus": request.from.code(),
                    "toStatus": request.to.code(),
                    "quantity": request.quantity,
                }),
            )
            .await?;
        let changed = confirmed_quantity(&value, &["quantityChanged", "changed", "quantity"])?;
        info!(
            model = %request.battery_model_id,
            from = request.from.as_str(),
            to = request.to.as_str(),
            changed,
            "Stock moved between buckets"
        );
        Ok(changed)
    }
}

fn confirmed_quantity(value: &serde_json::Value, keys: &[&str]) -> DomainResult<u32> {
    wire::first_u64(value, keys)
        .map(|n| n as u32)
        .ok_or_else(|| {
            DomainError::Api(ApiError::InvalidResponse(
                "stock response carries no quantity".to_string(),
            ))
        })
}

// ── Tests ──────────────────────────────────────────────────────
