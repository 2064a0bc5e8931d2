//! Swap workflow engine
//!
//! Drives a reservation through check-in, battery handover, payment and
//! completion. The finalize step carries a deliberate contract
//! negotiation: the backend's field name for the returned battery's
//! serial has never been pinned down, so the same value is offered
//! under a fixed sequence of key names until one is accepted. The
//! sequence is logged per attempt; once the contract stabilises the
//! list shrinks to a single entry.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use super::inventory::{ChangeStatusRequest, InventoryService};
use super::payments::PaymentsService;
use crate::domain::battery::{BatteryStatus, BatteryUnit};
use crate::domain::ports::ApiGateway;
use crate::domain::swap::{SwapResult, SwapTransaction};
use crate::domain::vehicle::Vehicle;
use crate::domain::{ApiError, DomainError, DomainResult};
use crate::shared::types::pagination::PaginatedResult;
use crate::shared::wire;

/// Field names tried for the old battery serial, in order. At most one
/// request per entry; the first 2xx wins.
pub const SERIAL_FIELD_VARIANTS: [&str; 6] = [
    "oldBatterySerial",
    "oldSerial",
    "serial",
    "oldBatteryCode",
    "oldBatterySn",
    "batterySerial",
];

pub struct SwapWorkflowEngine {
    gateway: Arc<dyn ApiGateway>,
    payments: Arc<PaymentsService>,
    inventory: Arc<InventoryService>,
}

impl SwapWorkflowEngine {
    pub fn new(
        gateway: Arc<dyn ApiGateway>,
        payments: Arc<PaymentsService>,
        inventory: Arc<InventoryService>,
    ) -> Self {
        Self {
            gateway,
            payments,
            inventory,
        }
    }

    /// Open a swap transaction for a checked-in reservation.
    pub async fn start_swap(
        &self,
        reservation_id: &str,
        staff_id: &str,
        station_id: &str,
    ) -> DomainResult<SwapTransaction> {
        let value = self
            .gateway
            .post(
                "api/v1/swaps",
                json!({
                    "reservationId": reservation_id,
                    "staffId": staff_id,
                    "stationId": station_id,
                }),
            )
            .await?;
        let swap: SwapTransaction = wire::decode(value)?;
        swap.verify_totals()?;
        info!(
            swap = %swap.transaction_number,
            reservation_id,
            station_id,
            "Swap started"
        );
        Ok(swap)
    }

    /// Pre-issue guard: the unit must match the vehicle's battery
    /// model. Raised locally so the mismatch is caught before the
    /// handover, not after the backend rejects it.
    pub fn ensure_compatible(&self, vehicle: &Vehicle, unit: &BatteryUnit) -> DomainResult<()> {
        if vehicle.accepts_battery_model(&unit.battery_model_id) {
            return Ok(());
        }
        Err(DomainError::IncompatibleBattery {
            serial: unit.serial.clone(),
            detail: format!(
                "vehicle takes {}, unit is {}",
                vehicle.compatible_battery_model_id, unit.battery_model_id
            ),
        })
    }

    /// Finalize the swap for a reservation, negotiating the payload
    /// shape. A 400/422 means "wrong shape, try the next variant";
    /// any other failure aborts immediately. A validation rejection
    /// that talks about compatibility is a real business refusal, not
    /// a shape mismatch, and aborts as [`DomainError::IncompatibleBattery`].
    pub async fn finalize_from_reservation(
        &self,
        reservation_id: &str,
        old_battery_serial: &str,
        station_id: Option<&str>,
    ) -> DomainResult<SwapResult> {
        let mut last_rejection = String::new();

        for (attempt, field) in SERIAL_FIELD_VARIANTS.iter().enumerate() {
            let mut body = json!({ "reservationId": reservation_id });
            body[*field] = json!(old_battery_serial);
            if let Some(station) = station_id {
                body["stationId"] = json!(station);
            }

            debug!(attempt = attempt + 1, field, "Finalize attempt");
            match self
                .gateway
                .post("api/v1/swaps/finalize-from-reservation", body)
                .await
            {
                Ok(value) => {
                    let result: SwapResult = wire::decode(value)?;
                    info!(
                        swap_id = %result.swap_id,
                        accepted_field = field,
                        attempts = attempt + 1,
                        old = %result.old_battery.serial,
                        new = %result.new_battery.serial,
                        "Swap finalized"
                    );
                    self.sync_inventory_buckets(&result, station_id).await;
                    return Ok(result);
                }
                Err(ApiError::ValidationRejected(message)) => {
                    if mentions_compatibility(&message) {
                        return Err(DomainError::IncompatibleBattery {
                            serial: old_battery_serial.to_string(),
                            detail: message,
                        });
                    }
                    warn!(
                        attempt = attempt + 1,
                        field,
                        %message,
                        "Finalize payload shape rejected, trying next variant"
                    );
                    last_rejection = message;
                }
                Err(err) => {
                    warn!(attempt = attempt + 1, field, error = %err, "Finalize aborted");
                    return Err(err.into());
                }
            }
        }

        Err(ApiError::ValidationRejected(last_rejection).into())
    }

    /// Move the handed-over units between stock buckets: the issued
    /// unit leaves Full for Issued, the returned one goes on charge.
    /// The handover already happened, so a failed move is logged and
    /// left for the stock reconciliation to flag.
    async fn sync_inventory_buckets(&self, result: &SwapResult, station_id: Option<&str>) {
        let station = match station_id {
            Some(station) => station,
            None => {
                debug!(swap_id = %result.swap_id, "No station scope, skipping bucket sync");
                return;
            }
        };

        let moves = [
            (&result.new_battery, BatteryStatus::Full, BatteryStatus::Issued),
            (&result.old_battery, BatteryStatus::Issued, BatteryStatus::Charging),
        ];
        for (battery, from, to) in moves {
            let request = ChangeStatusRequest {
                battery_model_id: battery.battery_model_id.clone(),
                station_id: station.to_string(),
                from,
                to,
                quantity: 1,
            };
            if let Err(err) = self.inventory.change_status(request).await {
                warn!(
                    swap_id = %result.swap_id,
                    serial = %battery.serial,
                    error = %err,
                    "Bucket move failed after finalize"
                );
            }
        }
    }

    /// Close a swap. Only allowed once its payment is settled.
    pub async fn complete_swap(&self, swap_id: &str) -> DomainResult<SwapTransaction> {
        match self.payments.payment_for_swap(swap_id).await? {
            Some(payment) if payment.is_settled() => {}
            _ => {
                return Err(DomainError::PaymentRequired {
                    swap_id: swap_id.to_string(),
                })
            }
        }

        let value = self
            .gateway
            .put(&format!("api/v1/swaps/{swap_id}/complete"), json!({}))
            .await?;
        let swap: SwapTransaction = wire::decode(value)?;
        info!(swap = %swap.transaction_number, "Swap completed");
        Ok(swap)
    }

    /// Abort a swap in progress.
    pub async fn cancel_swap(&self, swap_id: &str, reason: Option<&str>) -> DomainResult<SwapTransaction> {
        let value = self
            .gateway
            .post(
                &format!("api/v1/swaps/{swap_id}/cancel"),
                json!({ "reason": reason }),
            )
            .await?;
        let swap: SwapTransaction = wire::decode(value)?;
        info!(swap = %swap.transaction_number, "Swap cancelled");
        Ok(swap)
    }

    /// The terminal's in-progress swap, if any.
    pub async fn current_swap(&self) -> DomainResult<Option<SwapTransaction>> {
        match self.gateway.get("api/v1/swaps/current").await {
            Ok(value) => Ok(Some(wire::decode(value)?)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Completed and in-flight swaps, newest first.
    pub async fn history(
        &self,
        page: u32,
        page_size: u32,
    ) -> DomainResult<PaginatedResult<SwapTransaction>> {
        let value = self
            .gateway
            .get(&format!("api/v1/swaps/history?page={page}&pageSize={page_size}"))
            .await?;
        let (items, total) = wire::decode_list::<SwapTransaction>(value)?;
        let total = total.unwrap_or(items.len() as u64);
        Ok(PaginatedResult::new(items, total, page, page_size))
    }
}

/// A rejection that talks about model fit is a business refusal.
fn mentions_compatibility(message: &str) -> bool {
    message.to_lowercase().contains("compatib")
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_order_is_fixed() {
        assert_eq!(
            SERIAL_FIELD_VARIANTS,
            [
                "oldBatterySerial",
                "oldSerial",
                "serial",
                "oldBatteryCode",
                "oldBatterySn",
                "batterySerial",
            ]
        );
    }

    #[test]
    fn compatibility_rejections_are_detected() {
        assert!(mentions_compatibility("Battery model is not compatible with vehicle"));
        assert!(mentions_compatibility("INCOMPATIBLE battery model"));
        assert!(!mentions_compatibility("oldBatterySerial is required"));
    }
}
