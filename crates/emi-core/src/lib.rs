pub mod error;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

pub use error::EmiError;
pub use types::*;

/// Standard result type for all emi-core operations
pub type EmiResult<T> = Result<T, EmiError>;
