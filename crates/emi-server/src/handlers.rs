//! Request handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error, warn};

use emi_core::amortization::{self, request, EmiResponse};
use emi_core::EmiError;

use crate::config::ServerConfig;

/// Application state.
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Error response.
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

fn invalid_input() -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new("Invalid input"))).into_response()
}

/// Compute EMI, total payable and total interest.
///
/// The body is read as JSON whatever the declared content type. Fields that
/// fail to parse as numbers never reach the calculator.
pub async fn calculate(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let loan = match request::parse_request_body(&body) {
        Ok(loan) => loan,
        Err(e) => {
            warn!(error = %e, "rejected calculate request");
            return invalid_input();
        }
    };

    let max_tenure = i64::from(state.config.max_tenure_months);
    if loan.tenure_months > max_tenure {
        warn!(
            tenure_months = loan.tenure_months,
            max_tenure, "rejected calculate request: tenure above limit"
        );
        return invalid_input();
    }

    match amortization::compute(loan.principal, loan.annual_rate_percent, loan.tenure_months) {
        Ok(result) => {
            debug!(
                principal = %loan.principal,
                annual_rate_percent = %loan.annual_rate_percent,
                tenure_months = loan.tenure_months,
                emi = %result.emi,
                total_paid = %result.total_paid,
                "computed EMI"
            );
            (StatusCode::OK, Json(EmiResponse::from(&result))).into_response()
        }
        Err(e @ EmiError::InvalidInput { .. }) => {
            warn!(error = %e, "rejected calculate request");
            invalid_input()
        }
        Err(e) => {
            error!(error = %e, "EMI calculation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}
