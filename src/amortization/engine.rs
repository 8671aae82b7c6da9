//! Core amortization engine for shared-contribution mortgages

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationResult, PaymentRow, Schedule, YearlyRollup};
use super::state::AmortizationState;
use crate::error::{AmortizationError, Result};
use crate::loan::{BorrowerSet, LoanTerms, ScheduleRequest};

/// Balance below which the loan counts as paid off (absorbs floating-point residue)
pub const DEFAULT_BALANCE_TOLERANCE: f64 = 1e-6;

/// Largest supported number of decimal places
pub const MAX_ROUNDING_DIGITS: u32 = 12;

/// How displayed values are rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum RoundingMode {
    /// Ties go to the even digit
    #[default]
    HalfEven,
    /// Ties go away from zero
    HalfAwayFromZero,
}

impl RoundingMode {
    /// Round `value` to `digits` decimal places
    ///
    /// Rounds the exact stored value, so a double sitting just above a tie rounds up
    /// even when `value * 10^digits` would land on the tie.
    pub fn round(self, value: f64, digits: u32) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let places = digits as usize;
        // Formatting rounds the exact binary value, ties to even
        let nearest = format!("{:.*}", places, value).parse::<f64>().unwrap_or(value);

        match self {
            RoundingMode::HalfEven => nearest,
            RoundingMode::HalfAwayFromZero => {
                if nearest.abs() >= value.abs() || !is_exact_tie(value, places) {
                    return nearest;
                }
                let step = 10f64.powi(-(digits as i32));
                let away = nearest + value.signum() * step;
                format!("{:.*}", places, away).parse::<f64>().unwrap_or(away)
            }
        }
    }
}

/// Whether the exact decimal expansion of `value` is a `5` followed only by zeros past `places`
fn is_exact_tie(value: f64, places: usize) -> bool {
    // 1100 fractional digits cover every finite double exactly
    let expansion = format!("{:.*}", 1100, value.abs());
    let fraction = match expansion.split_once('.') {
        Some((_, fraction)) => fraction,
        None => return false,
    };
    let tail = &fraction[places..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}

/// Configuration for an amortization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationConfig {
    /// Decimal places for every displayed amount
    pub rounding_digits: u32,

    pub rounding_mode: RoundingMode,

    /// Loop runs while the balance exceeds this
    pub balance_tolerance: f64,

    /// Cap on periods as a multiple of the scheduled term; `None` runs until paid off
    pub max_period_multiple: Option<u32>,
}

impl Default for AmortizationConfig {
    fn default() -> Self {
        Self {
            rounding_digits: 2,
            rounding_mode: RoundingMode::HalfEven,
            balance_tolerance: DEFAULT_BALANCE_TOLERANCE,
            max_period_multiple: Some(10),
        }
    }
}

impl AmortizationConfig {
    pub fn with_rounding_digits(rounding_digits: u32) -> Self {
        Self {
            rounding_digits,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rounding_digits > MAX_ROUNDING_DIGITS {
            return Err(AmortizationError::invalid(
                "rounding_digits",
                format!("must be at most {}, got {}", MAX_ROUNDING_DIGITS, self.rounding_digits),
            ));
        }
        if !self.balance_tolerance.is_finite() || self.balance_tolerance <= 0.0 {
            return Err(AmortizationError::invalid(
                "balance_tolerance",
                format!("must be a positive finite value, got {}", self.balance_tolerance),
            ));
        }
        if self.max_period_multiple == Some(0) {
            return Err(AmortizationError::invalid("max_period_multiple", "must be at least 1"));
        }
        Ok(())
    }

    fn round(&self, value: f64) -> f64 {
        self.rounding_mode.round(value, self.rounding_digits)
    }
}

/// Split of one period's payments between interest and principal
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAllocation {
    /// Interest accrued on the opening balance
    pub interest_due: f64,

    /// Interest carried by each borrower, in proportion to their contribution
    pub interest_parts: Vec<f64>,

    /// Principal paid by each borrower, after final-period trimming
    pub principal_parts: Vec<f64>,

    /// Total principal paid; never exceeds the opening balance
    pub principal_paid: f64,
}

/// Allocate a single period's contributions against `balance`
///
/// Interest is prorated by contribution size, not by equity. Fails with
/// `InsufficientPayment` when contributions do not cover the interest due.
pub fn allocate_period(
    contributions: &[f64],
    balance: f64,
    monthly_rate: f64,
    period: u32,
) -> Result<PeriodAllocation> {
    let interest_due = balance * monthly_rate;
    let total_contribution: f64 = contributions.iter().sum();

    if total_contribution < interest_due {
        return Err(AmortizationError::InsufficientPayment {
            period,
            interest_due,
            total_contribution,
        });
    }

    let interest_parts: Vec<f64> = contributions
        .iter()
        .map(|c| c / total_contribution * interest_due)
        .collect();
    let mut principal_parts: Vec<f64> = contributions
        .iter()
        .zip(&interest_parts)
        .map(|(c, i)| c - i)
        .collect();
    let mut principal_paid: f64 = principal_parts.iter().sum();

    // Final month: trim so the balance never goes negative
    if principal_paid > balance {
        let scale = balance / principal_paid;
        for part in &mut principal_parts {
            *part *= scale;
        }
        principal_paid = balance;
    }

    Ok(PeriodAllocation {
        interest_due,
        interest_parts,
        principal_parts,
        principal_paid,
    })
}

/// Main amortization engine
#[derive(Debug, Clone, Default)]
pub struct AmortizationEngine {
    config: AmortizationConfig,
}

impl AmortizationEngine {
    /// Create a new engine with the given config
    pub fn new(config: AmortizationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AmortizationConfig {
        &self.config
    }

    /// Build the full schedule and yearly roll-up for a request
    ///
    /// All-or-nothing: any failure discards the rows built so far.
    pub fn amortize(&self, request: &ScheduleRequest) -> Result<AmortizationResult> {
        self.config.validate()?;
        request.validate()?;

        let terms = &request.terms;
        let borrowers = &request.borrowers;
        let monthly_rate = terms.monthly_rate();
        let scheduled_payment = terms.scheduled_payment();
        let period_cap = self
            .config
            .max_period_multiple
            .map(|multiple| terms.term_months().saturating_mul(multiple));

        debug!(
            "Amortizing {:.2} at {:.4}% over {} years for {} borrowers (contributions {:.2}, scheduled {:.2})",
            terms.principal,
            terms.annual_rate * 100.0,
            terms.term_years,
            borrowers.len(),
            borrowers.total_contribution(),
            scheduled_payment,
        );
        if borrowers.total_contribution() < scheduled_payment {
            warn!(
                "Contributions {:.2} are below the scheduled payment {:.2}; payoff will run past the term",
                borrowers.total_contribution(),
                scheduled_payment,
            );
        }

        let mut schedule = Schedule::new();
        let mut state = AmortizationState::from_request(request);

        while state.is_outstanding(self.config.balance_tolerance) {
            if let Some(cap) = period_cap {
                if state.payment_number >= cap {
                    warn!(
                        "Stopping after {} periods with {:.6} still outstanding",
                        cap, state.balance
                    );
                    return Err(AmortizationError::IterationLimit { periods: cap });
                }
            }

            state.advance_period();
            let row = self.calculate_period(borrowers, monthly_rate, &mut state)?;
            schedule.add_row(row);
        }

        let yearly = YearlyRollup::from_schedule(&schedule);
        info!(
            "Loan retired after {} payments ({} years)",
            schedule.len(),
            yearly.len()
        );

        Ok(AmortizationResult {
            scheduled_payment,
            schedule,
            yearly,
        })
    }

    /// Allocate one period and record it
    fn calculate_period(
        &self,
        borrowers: &BorrowerSet,
        monthly_rate: f64,
        state: &mut AmortizationState,
    ) -> Result<PaymentRow> {
        let allocation = allocate_period(
            &borrowers.monthly_contribution,
            state.balance,
            monthly_rate,
            state.payment_number,
        )?;

        state.apply_principal(&allocation.principal_parts, allocation.principal_paid);

        if state.payment_number % 12 == 0 {
            debug!(
                "Year {} closes with balance {:.2}",
                state.loan_year(),
                state.balance
            );
        }

        // Aggregate interest is rounded on its own, not as a sum of rounded parts
        Ok(PaymentRow {
            payment_number: state.payment_number,
            principal_paid: self.config.round(allocation.principal_paid),
            interest_paid: self.config.round(allocation.interest_due),
            loan_balance: self.config.round(state.balance),
            cumulative_equity: state
                .cumulative_equity
                .iter()
                .map(|&e| self.config.round(e))
                .collect(),
        })
    }
}

/// Compute the schedule and yearly roll-up with default settings and the given rounding
pub fn compute_schedule(
    terms: LoanTerms,
    borrowers: BorrowerSet,
    rounding_digits: u32,
) -> Result<(Schedule, YearlyRollup)> {
    let engine = AmortizationEngine::new(AmortizationConfig::with_rounding_digits(rounding_digits));
    let request = ScheduleRequest::new(terms, borrowers);
    engine.amortize(&request).map(AmortizationResult::into_parts)
}
