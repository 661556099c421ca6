use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use emi_core::amortization::{self, request, LoanRequest};

use crate::input;

/// Loan terms shared by `calculate` and `schedule`
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON request file with loan_amount / interest_rate / loan_tenure
    #[arg(long)]
    pub input: Option<String>,

    /// Principal borrowed
    #[arg(long, allow_hyphen_values = true)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 10 for 10% p.a.)
    #[arg(long, allow_hyphen_values = true)]
    pub interest_rate: Option<Decimal>,

    /// Tenure in months
    #[arg(long, allow_hyphen_values = true)]
    pub loan_tenure: Option<i64>,
}

/// Arguments for EMI calculation
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_request(args.loan)?;
    let result = amortization::calculate_emi(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_request(args.loan)?;
    let result = amortization::build_schedule(&loan)?;
    Ok(serde_json::to_value(result)?)
}

fn resolve_request(args: LoanArgs) -> Result<LoanRequest, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        let data = input::file::read_json_value(path)?;
        return Ok(request::parse_request(&data)?);
    }
    if args.loan_amount.is_none() && args.loan_tenure.is_none() {
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(request::parse_request(&data)?);
        }
    }

    let principal = args
        .loan_amount
        .ok_or("--loan-amount is required (or provide --input)")?;
    let tenure_months = args
        .loan_tenure
        .ok_or("--loan-tenure is required (or provide --input)")?;

    Ok(LoanRequest {
        principal,
        annual_rate_percent: args.interest_rate.unwrap_or(Decimal::ZERO),
        tenure_months,
    })
}
