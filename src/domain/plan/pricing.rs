//! Plan pricing and presentation normalization
//!
//! The backend has no dedicated pricing endpoint, so the price view is
//! synthesized from the plan record. Precedence: an explicit per-swap
//! price wins, then a monthly fee, otherwise the plan is custom-priced
//! at zero and the UI shows "contact us".

use rust_decimal::Decimal;

use super::model::{BillingPeriod, Pricing, SubscriptionPlan};

const DEFAULT_CURRENCY: &str = "VND";

/// Shown when a plan has no benefits text at all.
const DEFAULT_FEATURES: [&str; 3] = [
    "Battery swaps at any station",
    "Battery health guarantee",
    "In-app reservation",
];

/// Plan names that read as the highlighted tier when the backend does
/// not flag one explicitly.
const POPULAR_NAME_HINTS: [&str; 3] = ["plus", "pro", "premium"];

impl Pricing {
    /// Derive the price view from a plan record.
    pub fn from_plan(plan: &SubscriptionPlan) -> Self {
        let currency = plan
            .currency
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        if let Some(price) = plan.price_per_swap {
            return Self {
                price,
                currency,
                billing_period: BillingPeriod::PerSwap,
            };
        }
        if let Some(fee) = plan.monthly_fee {
            return Self {
                price: fee,
                currency,
                billing_period: BillingPeriod::Monthly,
            };
        }
        Self {
            price: Decimal::ZERO,
            currency,
            billing_period: BillingPeriod::Custom,
        }
    }
}

/// Split the benefits blurb into display lines (newlines and
/// semicolons both act as separators), falling back to the stock list.
pub fn feature_list(plan: &SubscriptionPlan) -> Vec<String> {
    let parsed: Vec<String> = plan
        .benefits
        .as_deref()
        .unwrap_or_default()
        .split(['\n', ';'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if parsed.is_empty() {
        DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect()
    } else {
        parsed
    }
}

/// An explicit backend flag wins; otherwise fall back to name keywords.
pub fn is_popular(plan: &SubscriptionPlan) -> bool {
    if let Some(flag) = plan.is_popular {
        return flag;
    }
    let name = plan.name.to_lowercase();
    POPULAR_NAME_HINTS.iter().any(|hint| name.contains(hint))
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> SubscriptionPlan {
        SubscriptionPlan {
            id: "plan-1".into(),
            name: "City Rider".into(),
            description: None,
            benefits: None,
            max_swaps_per_month: Some(30),
            deposit: None,
            price_per_swap: None,
            monthly_fee: None,
            currency: None,
            is_popular: None,
        }
    }

    #[test]
    fn per_swap_price_wins_over_monthly_fee() {
        let mut plan = sample_plan();
        plan.price_per_swap = Some(Decimal::new(25_000, 0));
        plan.monthly_fee = Some(Decimal::new(500_000, 0));
        let pricing = Pricing::from_plan(&plan);
        assert_eq!(pricing.billing_period, BillingPeriod::PerSwap);
        assert_eq!(pricing.price, Decimal::new(25_000, 0));
        assert_eq!(pricing.currency, "VND");
    }

    #[test]
    fn monthly_fee_when_no_per_swap_price() {
        let mut plan = sample_plan();
        plan.monthly_fee = Some(Decimal::new(500_000, 0));
        plan.currency = Some("USD".into());
        let pricing = Pricing::from_plan(&plan);
        assert_eq!(pricing.billing_period, BillingPeriod::Monthly);
        assert_eq!(pricing.currency, "USD");
    }

    #[test]
    fn custom_pricing_when_no_price_fields() {
        let pricing = Pricing::from_plan(&sample_plan());
        assert_eq!(pricing.billing_period, BillingPeriod::Custom);
        assert_eq!(pricing.price, Decimal::ZERO);
    }

    #[test]
    fn benefits_split_on_newlines_and_semicolons() {
        let mut plan = sample_plan();
        plan.benefits = Some("Unlimited swaps\nPriority queue; Roadside assist\n  ".into());
        assert_eq!(
            feature_list(&plan),
            vec!["Unlimited swaps", "Priority queue", "Roadside assist"]
        );
    }

    #[test]
    fn empty_benefits_fall_back_to_defaults() {
        let features = feature_list(&sample_plan());
        assert_eq!(features.len(), DEFAULT_FEATURES.len());
        assert!(features[0].contains("Battery swaps"));
    }

    #[test]
    fn popular_flag_beats_name_heuristic() {
        let mut plan = sample_plan();
        plan.name = "Swap Plus".into();
        assert!(is_popular(&plan));
        plan.is_popular = Some(false);
        assert!(!is_popular(&plan));
        plan.is_popular = None;
        plan.name = "Economy".into();
        assert!(!is_popular(&plan));
    }
}
