//! Shared Mortgage - amortization engine for loans shared by several borrowers
//!
//! This library provides:
//! - Month-by-month amortization driven by per-borrower contributions
//! - Interest proration across borrowers by contribution size
//! - Per-borrower equity tracking from down payments and principal paid
//! - Yearly roll-up of equity into ownership shares
//! - CSV export and batch scenario comparison

pub mod error;
pub mod loan;
pub mod amortization;
pub mod export;
pub mod scenario;

// Re-export commonly used types
pub use error::{AmortizationError, Result};
pub use loan::{BorrowerSet, LoanTerms, ScheduleRequest};
pub use amortization::{
    AmortizationConfig, AmortizationEngine, AmortizationResult, PaymentRow, Schedule, YearRow,
    YearlyRollup, compute_schedule,
};
pub use scenario::ScenarioRunner;
