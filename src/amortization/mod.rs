//! Amortization engine: schedule construction and yearly ownership roll-up

pub mod annuity;
mod state;
mod engine;
mod schedule;

pub use state::{AmortizationState, year_of_payment};
pub use engine::{
    AmortizationEngine, AmortizationConfig, RoundingMode, PeriodAllocation,
    allocate_period, compute_schedule, DEFAULT_BALANCE_TOLERANCE, MAX_ROUNDING_DIGITS,
};
pub use schedule::{
    AmortizationResult, PaymentRow, Schedule, ScheduleSummary, YearRow, YearlyRollup,
};
