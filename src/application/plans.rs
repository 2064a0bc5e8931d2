//! Subscription plan browsing and enrolment

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::plan::{feature_list, is_popular, Pricing, Subscription, SubscriptionPlan};
use crate::domain::ports::ApiGateway;
use crate::domain::DomainResult;
use crate::shared::wire;

/// Plan ready for display: normalized pricing and feature list.
#[derive(Debug, Clone)]
pub struct PlanView {
    pub plan: SubscriptionPlan,
    pub pricing: Pricing,
    pub features: Vec<String>,
    pub is_popular: bool,
}

pub struct PlanService {
    gateway: Arc<dyn ApiGateway>,
}

impl PlanService {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch plans and run the pricing/presentation normalization. A
    /// backend failure is an error; there is no baked-in fallback
    /// catalogue.
    pub async fn list_plans(&self) -> DomainResult<Vec<PlanView>> {
        let value = self.gateway.get("api/v1/subscription-plans").await?;
        let (plans, _): (Vec<SubscriptionPlan>, _) = wire::decode_list(value)?;
        Ok(plans
            .into_iter()
            .map(|plan| PlanView {
                pricing: Pricing::from_plan(&plan),
                features: feature_list(&plan),
                is_popular: is_popular(&plan),
                plan,
            })
            .collect())
    }

    pub async fn subscribe(&self, plan_id: &str, vehicle_id: &str) -> DomainResult<Subscription> {
        let value = self
            .gateway
            .post(
                "api/v1/subscriptions",
                json!({ "planId": plan_id, "vehicleId": vehicle_id }),
            )
            .await?;
        let subscription: Subscription = wire::decode(value)?;
        info!(plan_id, vehicle_id, "Subscription created");
        Ok(subscription)
    }
}
