//! Payment operations
//!
//! VNPay checkout creation and return handling, plus counter payments
//! captured by staff and the payment lookup used by the swap completion
//! gate.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::domain::payment::{parse_return, Payment, PaymentMethod, VnpayOutcome};
use crate::domain::ports::ApiGateway;
use crate::domain::{ApiError, DomainError, DomainResult};
use crate::shared::wire;

/// A created VNPay checkout: send the driver to `payment_url`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub payment_url: String,
    pub txn_ref: String,
}

pub struct PaymentsService {
    gateway: Arc<dyn ApiGateway>,
}

impl PaymentsService {
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Open a VNPay checkout for a swap.
    pub async fn create_vnpay_payment(
        &self,
        swap_id: &str,
        amount: Decimal,
    ) -> DomainResult<PaymentIntent> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "payment amount must be positive".to_string(),
            ));
        }
        let value = self
            .gateway
            .post(
                "api/v1/payments/vnpay/create",
                json!({ "swapId": swap_id, "amount": amount }),
            )
            .await?;
        let intent: PaymentIntent = wire::decode(value)?;
        info!(swap_id, txn_ref = %intent.txn_ref, "VNPay checkout created");
        Ok(intent)
    }

    /// Decode the gateway's return redirect and let the backend verify
    /// the signature and record the result. The parsed outcome is
    /// returned either way; a failed verification propagates as an
    /// error.
    pub async fn verify_vnpay_return(
        &self,
        pairs: &[(String, String)],
    ) -> DomainResult<VnpayOutcome> {
        let outcome = parse_return(pairs)?;
        let query: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        self.gateway
            .get(&format!("api/v1/payments/vnpay/return?{}", query.join("&")))
            .await?;
        info!(
            txn_ref = %outcome.txn_ref,
            success = outcome.success,
            code = %outcome.response_code,
            "VNPay return processed"
        );
        Ok(outcome)
    }

    /// The payment recorded against a swap, if any.
    pub async fn payment_for_swap(&self, swap_id: &str) -> DomainResult<Option<Payment>> {
        let value = match self
            .gateway
            .get(&format!("api/v1/payments?swapId={swap_id}"))
            .await
        {
            Ok(value) => value,
            Err(ApiError::NotFound(_)) => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let (mut payments, _): (Vec<Payment>, _) = wire::decode_list(value)?;
        Ok(if payments.is_empty() {
            None
        } else {
            Some(payments.remove(0))
        })
    }

    /// Record a cash or card payment taken at the counter.
    pub async fn record_counter_payment(
        &self,
        swap_id: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> DomainResult<Payment> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::Validation(
                "payment amount must be positive".to_string(),
            ));
        }
        let value = self
            .gateway
            .post(
                "api/v1/payments",
                json!({
                    "swapId": swap_id,
                    "amount": amount,
                    "method": method.as_str(),
                }),
            )
            .await?;
        let payment: Payment = wire::decode(value)?;
        info!(swap_id, method = method.as_str(), %amount, "Counter payment recorded");
        Ok(payment)
    }
}

// ── Tests ──────────────────────────────────────────────────────
