//! Swap transaction domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Swap transaction status, carried over the wire as a numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SwapStatus {
    /// Driver verified at the counter
    CheckedIn,
    /// Fresh battery handed over
    BatteryIssued,
    /// Depleted battery received back
    BatteryReturned,
    Completed,
    Cancelled,
}

impl SwapStatus {
    pub fn code(&self) -> u8 {
        match self {
            Self::CheckedIn => 0,
            Self::BatteryIssued => 1,
            Self::BatteryReturned => 2,
            Self::Completed => 3,
            Self::Cancelled => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckedIn => "CheckedIn",
            Self::BatteryIssued => "BatteryIssued",
            Self::BatteryReturned => "BatteryReturned",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl TryFrom<u8> for SwapStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::CheckedIn),
            1 => Ok(Self::BatteryIssued),
            2 => Ok(Self::BatteryReturned),
            3 => Ok(Self::Completed),
            4 => Ok(Self::Cancelled),
            other => Err(format!("unknown swap status code {}", other)),
        }
    }
}

impl From<SwapStatus> for u8 {
    fn from(status: SwapStatus) -> u8 {
        status.code()
    }
}

impl std::fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the driver pays for the swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PaymentType {
    /// Covered by the driver's subscription plan
    Subscription,
    Card,
    Cash,
}

impl PaymentType {
    pub fn code(&self) -> u8 {
        match self {
            Self::Subscription => 0,
            Self::Card => 1,
            Self::Cash => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "Subscription",
            Self::Card => "Card",
            Self::Cash => "Cash",
        }
    }

    /// Cash is taken at the counter; card and subscription settle
    /// through the payment gateway.
    pub fn is_counter(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl TryFrom<u8> for PaymentType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Subscription),
            1 => Ok(Self::Card),
            2 => Ok(Self::Cash),
            other => Err(format!("unknown payment type code {}", other)),
        }
    }
}

impl From<PaymentType> for u8 {
    fn from(payment_type: PaymentType) -> u8 {
        payment_type.code()
    }
}

/// One battery handover from check-in to completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTransaction {
    pub id: String,
    /// Human-facing transaction number
    pub transaction_number: String,
    pub user_id: String,
    /// Reservation this swap fulfils; walk-ins have none
    #[serde(default)]
    pub reservation_id: Option<String>,
    pub station_id: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub issued_battery_serial: Option<String>,
    #[serde(default)]
    pub returned_battery_serial: Option<String>,
    pub status: SwapStatus,
    pub payment_type: PaymentType,
    pub swap_fee: Decimal,
    /// Distance-based surcharge
    pub km_charge_amount: Decimal,
    pub total_amount: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub checked_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub battery_issued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub battery_returned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl SwapTransaction {
    fn transition(&mut self, next: SwapStatus) -> DomainResult<()> {
        let allowed = match (self.status, next) {
            (SwapStatus::CheckedIn, SwapStatus::BatteryIssued)
            | (SwapStatus::BatteryIssued, SwapStatus::BatteryReturned)
            | (SwapStatus::BatteryReturned, SwapStatus::Completed) => true,
            (from, SwapStatus::Cancelled) if !from.is_terminal() => true,
            _ => false,
        };
        if !allowed {
            return Err(DomainError::InvalidTransition {
                entity: "Swap",
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }
        self.status = next;
        Ok(())
    }

    /// Hand a charged battery to the driver.
    pub fn issue_battery(&mut self, serial: impl Into<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(SwapStatus::BatteryIssued)?;
        self.issued_battery_serial = Some(serial.into());
        self.battery_issued_at = Some(now);
        Ok(())
    }

    /// Take the depleted battery back.
    pub fn return_battery(&mut self, serial: impl Into<String>, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(SwapStatus::BatteryReturned)?;
        self.returned_battery_serial = Some(serial.into());
        self.battery_returned_at = Some(now);
        Ok(())
    }

    /// Record payment. Only allowed once the old battery is back.
    pub fn mark_paid(&mut self) -> DomainResult<()> {
        if self.status < SwapStatus::BatteryReturned || self.status == SwapStatus::Cancelled {
            return Err(DomainError::BusinessRule(format!(
                "swap {} cannot be paid while {}",
                self.id, self.status
            )));
        }
        self.is_paid = true;
        Ok(())
    }

    /// Close the swap. Requires a recorded payment.
    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_paid {
            return Err(DomainError::PaymentRequired {
                swap_id: self.id.clone(),
            });
        }
        self.transition(SwapStatus::Completed)?;
        self.completed_at = Some(now);
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(SwapStatus::Cancelled)?;
        self.cancelled_at = Some(now);
        Ok(())
    }

    /// The backend is expected to keep `total = fee + km charge`; a
    /// record that violates it is reported, not silently displayed.
    pub fn verify_totals(&self) -> DomainResult<()> {
        if self.total_amount != self.swap_fee + self.km_charge_amount {
            return Err(DomainError::DataInconsistency(format!(
                "swap {}: total {} != fee {} + km charge {}",
                self.id, self.total_amount, self.swap_fee, self.km_charge_amount
            )));
        }
        Ok(())
    }
}

/// Battery as reported by the swap finalize response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryDescriptor {
    pub serial: String,
    pub battery_model_id: String,
    pub model_name: String,
    pub status: String,
}

/// Outcome of finalizing a swap from a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResult {
    pub swap_id: String,
    pub old_battery: BatteryDescriptor,
    pub new_battery: BatteryDescriptor,
}

// ── Tests ──────────────────────────────────────────────────────
