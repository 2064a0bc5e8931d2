//! VNPay return-URL decoding
//!
//! The gateway redirects back with the result in query-string fields.
//! `vnp_Amount` is expressed in minor units (amount × 100) and
//! `vnp_ResponseCode == "00"` is the only success code; every other
//! code is a failure that still carries the transaction reference.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::domain::error::{DomainError, DomainResult};

const SUCCESS_CODE: &str = "00";

/// Parsed VNPay return parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VnpayOutcome {
    pub success: bool,
    /// Our transaction reference (`vnp_TxnRef`)
    pub txn_ref: String,
    /// Amount in major units
    pub amount: Decimal,
    pub response_code: String,
    pub bank_code: Option<String>,
    /// Gateway timestamp (`vnp_PayDate`, yyyyMMddHHmmss)
    pub paid_at: Option<NaiveDateTime>,
}

/// Decode the query pairs of a VNPay return/callback URL.
pub fn parse_return(pairs: &[(String, String)]) -> DomainResult<VnpayOutcome> {
    let field = |name: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };
    let required = |name: &str| {
        field(name).ok_or_else(|| DomainError::Validation(format!("missing {name} field")))
    };

    let txn_ref = required("vnp_TxnRef")?.to_string();
    let response_code = required("vnp_ResponseCode")?.to_string();

    let minor_units: i64 = required("vnp_Amount")?
        .parse()
        .map_err(|_| DomainError::Validation("vnp_Amount is not numeric".to_string()))?;
    // Minor units carry two implied decimal places
    let amount = Decimal::new(minor_units, 2);

    let paid_at = field("vnp_PayDate")
        .and_then(|raw| NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M%S").ok());

    Ok(VnpayOutcome {
        success: response_code == SUCCESS_CODE,
        txn_ref,
        amount,
        response_code,
        bank_code: field("vnp_BankCode").map(str::to_string),
        paid_at,
    })
}

// ── Tests ──────────────────────────────────────────────────────
