//! Error types for the amortization engine and its loaders

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AmortizationError>;

#[derive(Debug, Error)]
pub enum AmortizationError {
    /// Structural precondition violation, detected before any period is computed
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// Combined contributions do not cover the interest accrued in a period
    #[error(
        "Monthly contributions are insufficient to cover interest: period {period} accrues \
         {interest_due:.2} but contributions total {total_contribution:.2}"
    )]
    InsufficientPayment {
        period: u32,
        interest_due: f64,
        total_contribution: f64,
    },

    /// The configured period cap was reached before the balance was paid off
    #[error("Loan not paid off after {periods} periods")]
    IterationLimit { periods: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AmortizationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AmortizationError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
