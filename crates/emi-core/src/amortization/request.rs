//! Wire boundary between loosely-typed JSON requests and the calculator.
//!
//! Request: `{"loan_amount", "interest_rate", "loan_tenure"}` with missing
//! fields defaulting to 0. Response: `{"monthly_emi",
//! "total_amount_payable", "total_interest"}` as JSON numbers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::str::FromStr;

use super::emi::{AmortizationResult, LoanRequest};
use crate::{EmiError, EmiResult};

pub const FIELD_LOAN_AMOUNT: &str = "loan_amount";
pub const FIELD_INTEREST_RATE: &str = "interest_rate";
pub const FIELD_LOAN_TENURE: &str = "loan_tenure";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_emi: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount_payable: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_interest: Decimal,
}

impl From<&AmortizationResult> for EmiResponse {
    fn from(r: &AmortizationResult) -> Self {
        EmiResponse {
            monthly_emi: r.emi.round_dp(2),
            total_amount_payable: r.total_paid.round_dp(2),
            total_interest: r.total_interest.round_dp(2),
        }
    }
}

/// Parse a raw request body. `null` means "all defaults"; anything that is
/// not JSON, or not an object, is invalid input.
pub fn parse_request_body(body: &[u8]) -> EmiResult<LoanRequest> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| EmiError::invalid("body", format!("malformed JSON: {e}")))?;
    parse_request(&value)
}

pub fn parse_request(value: &Value) -> EmiResult<LoanRequest> {
    let empty = Map::new();
    let fields = match value {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err(EmiError::invalid("body", "expected a JSON object")),
    };

    Ok(LoanRequest {
        principal: decimal_field(fields, FIELD_LOAN_AMOUNT)?,
        annual_rate_percent: decimal_field(fields, FIELD_INTEREST_RATE)?,
        tenure_months: integer_field(fields, FIELD_LOAN_TENURE)?,
    })
}

fn decimal_field(fields: &Map<String, Value>, field: &str) -> EmiResult<Decimal> {
    match fields.get(field) {
        None => Ok(Decimal::ZERO),
        Some(Value::Number(n)) => decimal_from_number(n, field),
        Some(Value::String(s)) => parse_decimal(s.trim(), field),
        Some(other) => Err(EmiError::invalid(field, format!("expected a number, got {other}"))),
    }
}

fn integer_field(fields: &Map<String, Value>, field: &str) -> EmiResult<i64> {
    match fields.get(field) {
        None => Ok(0),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                // Fractional months truncate toward zero.
                Some(f) if f.is_finite() && f.trunc().abs() < i64::MAX as f64 => Ok(f.trunc() as i64),
                _ => Err(EmiError::invalid(field, "out of range")),
            }
        }
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| EmiError::invalid(field, format!("'{s}' is not an integer"))),
        Some(other) => Err(EmiError::invalid(field, format!("expected an integer, got {other}"))),
    }
}

fn decimal_from_number(n: &Number, field: &str) -> EmiResult<Decimal> {
    if let Some(i) = n.as_i64() {
        return Ok(Decimal::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Decimal::from(u));
    }
    match n.as_f64() {
        // Shortest round-trip text of the float, not its binary expansion.
        Some(f) if f.is_finite() => parse_decimal(&f.to_string(), field),
        _ => Err(EmiError::invalid(field, "not a finite number")),
    }
}

fn parse_decimal(s: &str, field: &str) -> EmiResult<Decimal> {
    if s.is_empty() {
        return Err(EmiError::invalid(field, "empty value"));
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| EmiError::invalid(field, format!("'{s}' is not a number")))
}
