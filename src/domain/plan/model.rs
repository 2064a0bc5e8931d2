//! Subscription plan domain entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A swap plan as served by the backend. Pricing fields are loosely
/// populated, which is why [`Pricing::from_plan`] exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-text benefits blurb, split into a feature list client-side
    #[serde(default)]
    pub benefits: Option<String>,
    #[serde(default)]
    pub max_swaps_per_month: Option<u32>,
    #[serde(default)]
    pub deposit: Option<Decimal>,
    #[serde(default)]
    pub price_per_swap: Option<Decimal>,
    #[serde(default)]
    pub monthly_fee: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub is_popular: Option<bool>,
}

/// Billing cadence derived from the plan's price fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    PerSwap,
    Monthly,
    Custom,
}

/// Normalized price view for a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pricing {
    pub price: Decimal,
    pub currency: String,
    pub billing_period: BillingPeriod,
}

/// An active plan enrolment for a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub plan_id: String,
    pub vehicle_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub swaps_used_this_month: u32,
}
