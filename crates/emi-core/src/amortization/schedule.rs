use bigdecimal::{BigDecimal, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::context::{to_big, to_money, Precision};
use super::emi::{level_payment, monthly_rate, request_warnings, AmortizationResult, LoanRequest};
use crate::{types::*, EmiResult};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u64,
    pub payment: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    /// Outstanding balance after this month's payment
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub emi: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub rows: Vec<ScheduleRow>,
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Month-by-month walk of a reducing-balance loan.
///
/// Interest is charged on the outstanding balance and rounded each month.
/// The principal part is `EMI - interest`, except that on the final month, or
/// whenever it would exceed what is still owed, it is forced to the balance
/// and that month's payment becomes `balance + interest`. The balance after
/// the last row is therefore exactly zero. Once the balance is cleared early,
/// every remaining month pays zero.
#[derive(Debug, Clone)]
pub struct ScheduleWalker {
    precision: Precision,
    rate: BigDecimal,
    emi: BigDecimal,
    balance: BigDecimal,
    total_paid: BigDecimal,
    total_interest: BigDecimal,
    month: u64,
    tenure: u64,
    failed: bool,
}

impl ScheduleWalker {
    /// Returns `None` for the degenerate cases (non-positive principal or
    /// tenure), which have no schedule at all.
    pub fn new(
        principal: Money,
        annual_rate_percent: Decimal,
        tenure_months: i64,
        precision: Precision,
    ) -> EmiResult<Option<Self>> {
        if tenure_months <= 0 || principal <= Decimal::ZERO {
            return Ok(None);
        }

        let tenure = tenure_months as u64;
        let rate = monthly_rate(&to_big(annual_rate_percent), &precision)?;
        let balance = to_big(principal);
        let emi = level_payment(&balance, &rate, tenure, &precision)?;
        let zero = precision.quantize(&BigDecimal::zero());

        Ok(Some(ScheduleWalker {
            precision,
            rate,
            emi,
            balance,
            total_paid: zero.clone(),
            total_interest: zero,
            month: 0,
            tenure,
            failed: false,
        }))
    }

    pub fn emi(&self) -> EmiResult<Money> {
        to_money(&self.emi)
    }

    /// True once the outstanding balance has reached zero.
    pub fn is_settled(&self) -> bool {
        self.balance.is_zero()
    }

    /// EMI and the totals of the months walked so far.
    pub fn result(&self) -> EmiResult<AmortizationResult> {
        let q = &self.precision;
        Ok(AmortizationResult {
            emi: to_money(&q.quantize(&self.emi))?,
            total_paid: to_money(&q.quantize(&self.total_paid))?,
            total_interest: to_money(&q.quantize(&self.total_interest))?,
        })
    }

    fn step(&mut self) -> EmiResult<ScheduleRow> {
        let q = self.precision;

        let interest = q.quantize(&q.mul(&self.balance, &self.rate));
        let mut principal_part = q.quantize(&q.sub(&self.emi, &interest));

        let payment = if principal_part > self.balance || self.month == self.tenure {
            principal_part = self.balance.clone();
            q.quantize(&q.add(&principal_part, &interest))
        } else {
            self.emi.clone()
        };

        self.balance = q.quantize(&q.sub(&self.balance, &principal_part));
        self.total_interest = q.add(&self.total_interest, &interest);
        self.total_paid = q.add(&self.total_paid, &payment);

        Ok(ScheduleRow {
            month: self.month,
            payment: to_money(&payment)?,
            principal_component: to_money(&q.quantize(&principal_part))?,
            interest_component: to_money(&interest)?,
            balance: to_money(&self.balance)?,
        })
    }
}

impl Iterator for ScheduleWalker {
    type Item = EmiResult<ScheduleRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.month >= self.tenure {
            return None;
        }
        self.month += 1;
        let row = self.step();
        self.failed = row.is_err();
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.tenure - self.month).unwrap_or(usize::MAX);
        (0, Some(remaining))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Full month-by-month schedule with totals.
///
/// Degenerate inputs give an empty schedule with zero EMI and totals.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_percent: Decimal,
    tenure_months: i64,
) -> EmiResult<AmortizationSchedule> {
    amortization_schedule_with(principal, annual_rate_percent, tenure_months, &Precision::CURRENCY)
}

pub fn amortization_schedule_with(
    principal: Money,
    annual_rate_percent: Decimal,
    tenure_months: i64,
    precision: &Precision,
) -> EmiResult<AmortizationSchedule> {
    let mut walker = match ScheduleWalker::new(principal, annual_rate_percent, tenure_months, *precision)? {
        Some(w) => w,
        None => {
            return Ok(AmortizationSchedule {
                emi: precision.zero_money(),
                total_paid: precision.zero_money(),
                total_interest: precision.zero_money(),
                rows: Vec::new(),
            })
        }
    };

    let rows = walker.by_ref().collect::<EmiResult<Vec<_>>>()?;
    let summary = walker.result()?;

    Ok(AmortizationSchedule {
        emi: summary.emi,
        total_paid: summary.total_paid,
        total_interest: summary.total_interest,
        rows,
    })
}

/// Envelope-wrapped [`amortization_schedule`].
pub fn build_schedule(input: &LoanRequest) -> EmiResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings = request_warnings(input);

    let schedule = amortization_schedule(input.principal, input.annual_rate_percent, input.tenure_months)?;

    if let Some(paid_off) = schedule.rows.iter().position(|r| r.balance.is_zero()) {
        let idle = schedule.rows.len() - paid_off - 1;
        if idle > 0 {
            warnings.push(format!(
                "Loan is repaid after month {}; the remaining {} month(s) carry no payment.",
                schedule.rows[paid_off].month, idle
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance amortization schedule (2dp, round-half-up, closing-payment correction)",
        input,
        warnings,
        elapsed,
        schedule,
    ))
}
