//! Slot reservation domain entity

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// How early a driver may check in before the slot start.
pub const EARLY_CHECK_IN_MARGIN_MINUTES: i64 = 15;

/// Reservation status, carried over the wire as a numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReservationStatus {
    /// Booked, driver not yet at the station
    Pending,
    /// Driver arrived and was verified by staff
    CheckedIn,
    /// Swap finished
    Completed,
    /// Cancelled by the driver or staff
    Cancelled,
    /// Slot passed without a check-in
    Expired,
}

impl ReservationStatus {
    /// Backend numeric code for this status.
    pub fn code(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::CheckedIn => 1,
            Self::Completed => 2,
            Self::Cancelled => 3,
            Self::Expired => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::CheckedIn => "CheckedIn",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Expired => "Expired",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }

    /// Allowed forward transitions. Cancel is reachable from Pending and
    /// CheckedIn only; terminal states allow nothing.
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, CheckedIn) | (Pending, Cancelled) | (Pending, Expired)
                | (CheckedIn, Completed)
                | (CheckedIn, Cancelled)
        )
    }
}

impl TryFrom<u8> for ReservationStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::CheckedIn),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Cancelled),
            4 => Ok(Self::Expired),
            other => Err(format!("unknown reservation status code {}", other)),
        }
    }
}

impl From<ReservationStatus> for u8 {
    fn from(status: ReservationStatus) -> u8 {
        status.code()
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a reservation was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelReason {
    UserCancelled,
    NoShow,
    SystemError,
    Other,
}

impl CancelReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserCancelled => "UserCancelled",
            Self::NoShow => "NoShow",
            Self::SystemError => "SystemError",
            Self::Other => "Other",
        }
    }
}

/// A driver's booked battery-swap slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotReservation {
    /// Unique reservation ID
    pub id: String,
    /// Human-facing reservation code
    pub reservation_code: String,
    /// Station the slot belongs to
    pub station_id: String,
    /// Battery model the driver's vehicle takes
    pub battery_model_id: String,
    /// Unit assigned at check-in, if any
    #[serde(default)]
    pub battery_unit_id: Option<String>,
    /// Slot date
    pub slot_date: NaiveDate,
    /// Slot window start
    pub slot_start: NaiveTime,
    /// Slot window end
    pub slot_end: NaiveTime,
    /// QR payload the driver presents at the station
    pub qr_code: String,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
    /// Staff member who verified the check-in
    #[serde(default)]
    pub verified_by_staff_id: Option<String>,
    pub status: ReservationStatus,
    #[serde(default)]
    pub cancel_reason: Option<CancelReason>,
    #[serde(default)]
    pub cancel_note: Option<String>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SlotReservation {
    fn transition(&mut self, next: ReservationStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                entity: "Reservation",
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Record a staff-verified check-in.
    pub fn check_in(&mut self, staff_id: impl Into<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(ReservationStatus::CheckedIn)?;
        self.checked_in_at = Some(now);
        self.verified_by_staff_id = Some(staff_id.into());
        Ok(())
    }

    /// Cancel with one of the enumerated causes.
    pub fn cancel(
        &mut self,
        reason: CancelReason,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        self.transition(ReservationStatus::Cancelled)?;
        self.cancel_reason = Some(reason);
        self.cancel_note = note;
        self.cancelled_at = Some(now);
        Ok(())
    }

    /// Mark the reservation completed after the swap finishes.
    pub fn complete(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::Completed)
    }

    /// Mark as expired (slot passed without check-in).
    pub fn expire(&mut self) -> DomainResult<()> {
        self.transition(ReservationStatus::Expired)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether `now` falls inside the check-in window: the slot day,
    /// from `EARLY_CHECK_IN_MARGIN_MINUTES` before the start until the
    /// slot end.
    pub fn is_within_slot(&self, now: DateTime<Utc>) -> bool {
        if now.date_naive() != self.slot_date {
            return false;
        }
        let earliest = self.slot_start - Duration::minutes(EARLY_CHECK_IN_MARGIN_MINUTES);
        let time = now.time();
        time >= earliest && time <= self.slot_end
    }
}

// ── Tests ──────────────────────────────────────────────────────
