pub mod context;
pub mod emi;
pub mod request;
pub mod schedule;

pub use context::Precision;
pub use emi::{calculate_emi, compute, compute_with, installment, AmortizationResult, LoanRequest};
pub use request::{parse_request, parse_request_body, EmiResponse};
pub use schedule::{amortization_schedule, build_schedule, AmortizationSchedule, ScheduleRow, ScheduleWalker};
