//! Loan terms and borrower contribution data

use serde::{Deserialize, Serialize};

use crate::amortization::annuity;
use crate::error::{AmortizationError, Result};

/// Fixed-rate loan terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount financed
    pub principal: f64,

    /// Nominal annual rate as a fraction (0.06125 = 6.125%)
    pub annual_rate: f64,

    /// Loan term in years
    pub term_years: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate: f64, term_years: u32) -> Result<Self> {
        let terms = Self {
            principal,
            annual_rate,
            term_years,
        };
        terms.validate()?;
        Ok(terms)
    }

    /// Check the terms are usable. Deserialized terms bypass `new`, so the engine calls this too.
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(AmortizationError::invalid(
                "principal",
                format!("must be a positive finite amount, got {}", self.principal),
            ));
        }
        // A zero rate leaves the scheduled payment formula undefined (0/0)
        if !self.annual_rate.is_finite() || self.annual_rate <= 0.0 {
            return Err(AmortizationError::invalid(
                "annual_rate",
                format!("must be a positive finite rate, got {}", self.annual_rate),
            ));
        }
        if self.term_years == 0 {
            return Err(AmortizationError::invalid("term_years", "must be at least 1"));
        }
        // Term months feed integer exponents, so they must fit an i32
        let fits = self
            .term_years
            .checked_mul(12)
            .is_some_and(|months| months <= i32::MAX as u32);
        if !fits {
            return Err(AmortizationError::invalid(
                "term_years",
                format!("term of {} years is too long", self.term_years),
            ));
        }
        Ok(())
    }

    /// Periodic (monthly) rate
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }

    /// Number of scheduled monthly payments
    pub fn term_months(&self) -> u32 {
        self.term_years * 12
    }

    /// Nominal level payment that retires the loan over its full term
    pub fn scheduled_payment(&self) -> f64 {
        annuity::scheduled_payment(self.principal, self.monthly_rate(), self.term_months())
    }
}

/// Borrowers sharing the loan, index-aligned across contributions, down payments and labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerSet {
    /// Fixed monthly payment each borrower puts toward principal and interest
    pub monthly_contribution: Vec<f64>,

    /// Initial equity each borrower brings in (not financed)
    pub down_payment: Vec<f64>,

    /// Display names; empty means `Borrower 1..N`
    #[serde(default)]
    pub labels: Vec<String>,
}

impl BorrowerSet {
    pub fn new(monthly_contribution: Vec<f64>, down_payment: Vec<f64>) -> Result<Self> {
        let set = Self {
            monthly_contribution,
            down_payment,
            labels: Vec::new(),
        };
        set.validate()?;
        Ok(set)
    }

    /// Attach display names, one per borrower
    pub fn with_labels(mut self, labels: Vec<String>) -> Result<Self> {
        if labels.len() != self.len() {
            return Err(AmortizationError::invalid(
                "labels",
                format!("expected {} labels, got {}", self.len(), labels.len()),
            ));
        }
        self.labels = labels;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let n = self.monthly_contribution.len();
        if self.down_payment.len() != n {
            return Err(AmortizationError::invalid(
                "down_payment",
                format!(
                    "monthly_contribution and down_payment must have the same length ({} vs {})",
                    n,
                    self.down_payment.len()
                ),
            ));
        }
        if n == 0 {
            return Err(AmortizationError::invalid("borrowers", "at least one borrower is required"));
        }
        if !self.labels.is_empty() && self.labels.len() != n {
            return Err(AmortizationError::invalid(
                "labels",
                format!("expected {} labels, got {}", n, self.labels.len()),
            ));
        }
        check_amounts("monthly_contribution", &self.monthly_contribution)?;
        check_amounts("down_payment", &self.down_payment)?;
        Ok(())
    }

    /// Number of borrowers
    pub fn len(&self) -> usize {
        self.monthly_contribution.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monthly_contribution.is_empty()
    }

    pub fn total_contribution(&self) -> f64 {
        self.monthly_contribution.iter().sum()
    }

    pub fn total_down_payment(&self) -> f64 {
        self.down_payment.iter().sum()
    }

    /// Display name for borrower `i` (0-indexed)
    pub fn label(&self, i: usize) -> String {
        self.labels
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("Borrower {}", i + 1))
    }
}

fn check_amounts(field: &str, amounts: &[f64]) -> Result<()> {
    for (i, &amount) in amounts.iter().enumerate() {
        if !amount.is_finite() || amount < 0.0 {
            return Err(AmortizationError::invalid(
                format!("{}[{}]", field, i),
                format!("must be a non-negative finite amount, got {}", amount),
            ));
        }
    }
    Ok(())
}

/// Everything one engine invocation needs, built once per user action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub terms: LoanTerms,
    pub borrowers: BorrowerSet,
}

impl ScheduleRequest {
    pub fn new(terms: LoanTerms, borrowers: BorrowerSet) -> Self {
        Self { terms, borrowers }
    }

    pub fn validate(&self) -> Result<()> {
        self.terms.validate()?;
        self.borrowers.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_terms_reject_zero_rate() {
        let err = LoanTerms::new(100_000.0, 0.0, 30).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidInput { ref field, .. } if field == "annual_rate"));
    }

    #[test]
    fn test_terms_reject_non_positive_principal_and_term() {
        assert!(LoanTerms::new(0.0, 0.05, 30).is_err());
        assert!(LoanTerms::new(-5.0, 0.05, 30).is_err());
        assert!(LoanTerms::new(f64::NAN, 0.05, 30).is_err());
        assert!(LoanTerms::new(100_000.0, 0.05, 0).is_err());
        assert!(LoanTerms::new(100_000.0, f64::INFINITY, 30).is_err());
    }

    #[test]
    fn test_terms_reject_overlong_term() {
        let err = LoanTerms::new(100_000.0, 0.05, 400_000_000).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidInput { ref field, .. } if field == "term_years"));

        let longest = i32::MAX as u32 / 12;
        assert!(LoanTerms::new(100_000.0, 0.05, longest).is_ok());
        assert!(LoanTerms::new(100_000.0, 0.05, longest + 1).is_err());
    }

    #[test]
    fn test_scheduled_payment_matches_known_value() {
        // 200k at 6% over 30 years: standard 1199.10 payment
        let terms = LoanTerms::new(200_000.0, 0.06, 30).unwrap();
        assert_eq!(terms.term_months(), 360);
        assert_relative_eq!(terms.monthly_rate(), 0.005);
        assert_relative_eq!(terms.scheduled_payment(), 1199.10, epsilon = 0.005);
    }

    #[test]
    fn test_borrowers_length_mismatch() {
        let err = BorrowerSet::new(vec![700.0, 2100.0], vec![13_000.0]).unwrap_err();
        assert!(matches!(err, AmortizationError::InvalidInput { .. }));
    }

    #[test]
    fn test_borrowers_reject_empty_and_negative() {
        assert!(BorrowerSet::new(vec![], vec![]).is_err());
        assert!(BorrowerSet::new(vec![-1.0], vec![0.0]).is_err());
        assert!(BorrowerSet::new(vec![100.0], vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_borrower_totals_and_labels() {
        let set = BorrowerSet::new(vec![700.0, 2100.0], vec![13_000.0, 0.0]).unwrap();
        assert_eq!(set.len(), 2);
        assert_relative_eq!(set.total_contribution(), 2800.0);
        assert_relative_eq!(set.total_down_payment(), 13_000.0);
        assert_eq!(set.label(1), "Borrower 2");

        let named = set.with_labels(vec!["A".into(), "B".into()]).unwrap();
        assert_eq!(named.label(0), "A");
        assert!(named.clone().with_labels(vec!["only one".into()]).is_err());
    }
}
