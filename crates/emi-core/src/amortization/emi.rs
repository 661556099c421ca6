use bigdecimal::{BigDecimal, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::context::{to_big, to_money, Precision};
use super::schedule::ScheduleWalker;
use crate::{types::*, EmiError, EmiResult};

const MONTHS_PER_YEAR: u32 = 12;
const PERCENT: u32 = 100;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: Money,
    /// Annual nominal rate in percent (10 = 10% p.a.)
    pub annual_rate_percent: Decimal,
    pub tenure_months: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub emi: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

impl AmortizationResult {
    pub fn zero(precision: &Precision) -> Self {
        AmortizationResult {
            emi: precision.zero_money(),
            total_paid: precision.zero_money(),
            total_interest: precision.zero_money(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.emi.is_zero() && self.total_paid.is_zero() && self.total_interest.is_zero()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// EMI, total paid and total interest for a fixed-rate loan, rounded to cents.
///
/// Non-positive principal or tenure yields the all-zero result rather than an
/// error. Totals come from walking the full schedule, not from `EMI × N`.
pub fn compute(
    principal: Money,
    annual_rate_percent: Decimal,
    tenure_months: i64,
) -> EmiResult<AmortizationResult> {
    compute_with(principal, annual_rate_percent, tenure_months, &Precision::CURRENCY)
}

/// [`compute`] with an explicit working precision and currency rounding.
pub fn compute_with(
    principal: Money,
    annual_rate_percent: Decimal,
    tenure_months: i64,
    precision: &Precision,
) -> EmiResult<AmortizationResult> {
    let mut walker = match ScheduleWalker::new(principal, annual_rate_percent, tenure_months, *precision)? {
        Some(w) => w,
        None => return Ok(AmortizationResult::zero(precision)),
    };

    for row in walker.by_ref() {
        row?;
    }
    walker.result()
}

/// Envelope-wrapped [`compute`] for callers that report methodology and warnings.
pub fn calculate_emi(input: &LoanRequest) -> EmiResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let warnings = request_warnings(input);

    let result = compute(input.principal, input.annual_rate_percent, input.tenure_months)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance EMI with monthly amortization (2dp, round-half-up)",
        input,
        warnings,
        elapsed,
        result,
    ))
}

/// Monthly periodic rate from an annual percentage: `annual / 12 / 100`,
/// each division rounded to the working precision.
pub(crate) fn monthly_rate(annual_rate_percent: &BigDecimal, precision: &Precision) -> EmiResult<BigDecimal> {
    let monthly = precision.div(
        annual_rate_percent,
        &BigDecimal::from(MONTHS_PER_YEAR),
        "monthly rate",
    )?;
    precision.div(&monthly, &BigDecimal::from(PERCENT), "monthly rate")
}

/// Level installment for `tenure_months` payments at `annual_rate_percent`.
pub fn installment(
    principal: Money,
    annual_rate_percent: Decimal,
    tenure_months: u64,
    precision: &Precision,
) -> EmiResult<Money> {
    let rate = monthly_rate(&to_big(annual_rate_percent), precision)?;
    let emi = level_payment(&to_big(principal), &rate, tenure_months, precision)?;
    to_money(&emi)
}

/// `P × r × (1+r)^n / ((1+r)^n − 1)`, or `P / n` at a zero rate, quantized.
///
/// A rate too small to move `1 + r` at working precision leaves a zero
/// denominator and is reported as [`EmiError::DivisionByZero`].
pub(crate) fn level_payment(
    principal: &BigDecimal,
    rate: &BigDecimal,
    tenure_months: u64,
    precision: &Precision,
) -> EmiResult<BigDecimal> {
    if tenure_months == 0 {
        return Err(EmiError::invalid("tenure_months", "must be > 0"));
    }
    let periods = BigDecimal::from(tenure_months);

    if rate.is_zero() {
        let raw = precision.div(principal, &periods, "EMI principal / tenure")?;
        return Ok(precision.quantize(&raw));
    }

    let one = BigDecimal::from(1u32);
    let factor = precision.powu(&precision.add(&one, rate), tenure_months);
    let numerator = precision.mul(&precision.mul(principal, rate), &factor);
    let denominator = precision.sub(&factor, &one);
    let raw = precision.div(&numerator, &denominator, "EMI annuity factor")?;
    Ok(precision.quantize(&raw))
}

pub(crate) fn request_warnings(input: &LoanRequest) -> Vec<String> {
    let mut warnings = Vec::new();
    if input.principal <= Decimal::ZERO {
        warnings.push("Principal is non-positive; all figures are zero.".into());
    }
    if input.tenure_months <= 0 {
        warnings.push("Tenure is non-positive; all figures are zero.".into());
    }
    if input.annual_rate_percent.is_zero() && input.principal > Decimal::ZERO && input.tenure_months > 0 {
        warnings.push("Interest-free loan; EMI is principal / tenure.".into());
    }
    if input.annual_rate_percent < Decimal::ZERO {
        warnings.push("Negative interest rate supplied.".into());
    }
    warnings
}
