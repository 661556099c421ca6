use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmiError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Decimal overflow in {context}")]
    Overflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl EmiError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        EmiError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn overflow(context: &str) -> Self {
        EmiError::Overflow {
            context: context.to_string(),
        }
    }
}

impl From<serde_json::Error> for EmiError {
    fn from(e: serde_json::Error) -> Self {
        EmiError::SerializationError(e.to_string())
    }
}
