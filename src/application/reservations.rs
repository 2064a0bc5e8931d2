//! Reservation queue operations
//!
//! Staff-side view of the day's slot reservations: listing with
//! filters, QR check-in and cancellation.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::domain::ports::{ApiGateway, SessionContext};
use crate::domain::reservation::{CancelReason, ReservationStatus, SlotReservation};
use crate::domain::{DomainError, DomainResult};
use crate::shared::wire;

/// Filters accepted by the queue listing.
#[derive(Debug, Clone)]
pub struct ReservationFilter {
    pub station_id: String,
    pub date: Option<NaiveDate>,
    pub status: Option<ReservationStatus>,
    pub user_id: Option<String>,
}

impl ReservationFilter {
    pub fn for_station(station_id: impl Into<String>) -> Self {
        Self {
            station_id: station_id.into(),
            date: None,
            status: None,
            user_id: None,
        }
    }
}

/// Cancellation request body.
#[derive(Debug, Clone, Validate)]
pub struct CancelRequest {
    pub reason: CancelReason,
    #[validate(length(max = 500, message = "note must stay under 500 characters"))]
    pub note: Option<String>,
}

pub struct ReservationQueue {
    gateway: Arc<dyn ApiGateway>,
    session: Arc<dyn SessionContext>,
}

impl ReservationQueue {
    pub fn new(gateway: Arc<dyn ApiGateway>, session: Arc<dyn SessionContext>) -> Self {
        Self { gateway, session }
    }

    /// List reservations matching the filter. Status travels as its
    /// numeric backend code.
    pub async fn list(&self, filter: &ReservationFilter) -> DomainResult<Vec<SlotReservation>> {
        if !self.session.is_authenticated() {
            return Err(DomainError::Unauthenticated);
        }

        let value = self.gateway.get(&list_path(filter)).await?;
        let (reservations, _) = wire::decode_list(value)?;
        Ok(reservations)
    }

    /// Post the scanned QR payload as-is; the backend verifies it and
    /// assigns a battery unit. "Already checked in" comes back as a
    /// conflict the caller can present, not a crash.
    pub async fn check_in(
        &self,
        reservation_id: &str,
        qr_payload: &str,
    ) -> DomainResult<SlotReservation> {
        if !self.session.is_authenticated() {
            return Err(DomainError::Unauthenticated);
        }

        let value = self
            .gateway
            .post(
                &format!("api/v1/slot-reservations/{reservation_id}/check-in"),
                json!({ "qrPayload": qr_payload }),
            )
            .await
            .map_err(|err| match err {
                // Arriving outside the slot is a rule, not a bad payload
                crate::domain::ApiError::ValidationRejected(message)
                    if message.to_lowercase().contains("window") =>
                {
                    DomainError::BusinessRule(message)
                }
                other => other.into(),
            })?;
        let reservation: SlotReservation = wire::decode(value)?;
        info!(
            reservation = %reservation.reservation_code,
            station = %reservation.station_id,
            "Reservation checked in"
        );
        Ok(reservation)
    }

    /// Cancel a reservation that is still pending.
    pub async fn cancel(
        &self,
        reservation: &SlotReservation,
        request: CancelRequest,
    ) -> DomainResult<()> {
        request.validate()?;
        if reservation.status != ReservationStatus::Pending {
            return Err(DomainError::BusinessRule(format!(
                "reservation {} is {}, only pending reservations can be cancelled here",
                reservation.reservation_code, reservation.status
            )));
        }

        self.gateway
            .delete(
                &format!("api/v1/slot-reservations/{}", reservation.id),
                Some(json!({
                    "reason": request.reason.as_str(),
                    "note": request.note,
                })),
            )
            .await?;
        info!(
            reservation = %reservation.reservation_code,
            reason = request.reason.as_str(),
            "Reservation cancelled"
        );
        Ok(())
    }
}

fn list_path(filter: &ReservationFilter) -> String {
    let mut query = vec![format!("stationId={}", filter.station_id)];
    if let Some(date) = filter.date {
        query.push(format!("date={}", date.format("%Y-%m-%d")));
    }
    if let Some(status) = filter.status {
        query.push(format!("status={}", status.code()));
    }
    if let Some(user_id) = &filter.user_id {
        query.push(format!("userId={}", user_id));
    }
    format!("api/v1/slot-reservations?{}", query.join("&"))
}

// ── Tests ──────────────────────────────────────────────────────
