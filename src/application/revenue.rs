//! Revenue reporting over swap transactions
//!
//! Pure aggregation: the caller supplies the transaction set (or the
//! reporter pulls history pages) and the split is computed
//! deterministically from `payment_type` and `is_paid`. Cancelled
//! transactions never count towards revenue.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::swap::SwapWorkflowEngine;
use crate::domain::swap::{PaymentType, SwapStatus, SwapTransaction};
use crate::domain::DomainResult;

/// Revenue split by settlement channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelRevenue {
    /// Card and subscription settlements
    pub online: Decimal,
    /// Cash taken at the counter
    pub counter: Decimal,
}

/// Revenue split by payment type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentTypeBreakdown {
    pub subscription: Decimal,
    pub card: Decimal,
    pub cash: Decimal,
}

/// Aggregated revenue view for a reporting period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueStats {
    /// Sum of totals for every counted transaction
    pub total_revenue: Decimal,
    /// Settled revenue
    pub paid_revenue: Decimal,
    /// Unpaid on completed swaps: service delivered, money outstanding
    pub outstanding_revenue: Decimal,
    /// Unpaid on swaps still in progress
    pub pending_revenue: Decimal,
    pub swap_count: usize,
    pub paid_count: usize,
    /// paid_count / swap_count, 0 when the period is empty
    pub paid_rate: f64,
    pub channel: ChannelRevenue,
    pub by_payment_type: PaymentTypeBreakdown,
}

/// Aggregate transactions started at or after `period_start`.
pub fn compute_revenue_stats(
    transactions: &[SwapTransaction],
    period_start: DateTime<Utc>,
) -> RevenueStats {
    let mut stats = RevenueStats::default();

    for tx in transactions {
        if tx.started_at < period_start || tx.status == SwapStatus::Cancelled {
            continue;
        }

        stats.swap_count += 1;
        stats.total_revenue += tx.total_amount;

        if tx.is_paid {
            stats.paid_count += 1;
            stats.paid_revenue += tx.total_amount;
        } else if tx.status == SwapStatus::Completed {
            stats.outstanding_revenue += tx.total_amount;
        } else {
            stats.pending_revenue += tx.total_amount;
        }

        match tx.payment_type {
            PaymentType::Subscription => stats.by_payment_type.subscription += tx.total_amount,
            PaymentType::Card => stats.by_payment_type.card += tx.total_amount,
            PaymentType::Cash => stats.by_payment_type.cash += tx.total_amount,
        }
        if tx.payment_type.is_counter() {
            stats.channel.counter += tx.total_amount;
        } else {
            stats.channel.online += tx.total_amount;
        }
    }

    if stats.swap_count > 0 {
        stats.paid_rate = stats.paid_count as f64 / stats.swap_count as f64;
    }
    stats
}

/// Pulls swap history and folds it through [`compute_revenue_stats`].
pub struct RevenueReporter {
    engine: Arc<SwapWorkflowEngine>,
}

/// History pages pulled per report; a runaway backend total stops here.
const MAX_HISTORY_PAGES: u32 = 50;
const HISTORY_PAGE_SIZE: u32 = 100;

impl RevenueReporter {
    pub fn new(engine: Arc<SwapWorkflowEngine>) -> Self {
        Self { engine }
    }

    pub async fn report(&self, period_start: DateTime<Utc>) -> DomainResult<RevenueStats> {
        let mut transactions = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.engine.history(page, HISTORY_PAGE_SIZE).await?;
            let has_more = batch.has_more();
            transactions.extend(batch.items);
            if !has_more || page >= MAX_HISTORY_PAGES {
                break;
            }
            page += 1;
        }
        Ok(compute_revenue_stats(&transactions, period_start))
    }
}

// ── Tests ──────────────────────────────────────────────────────
