//! Running state of the amortization loop

use crate::loan::ScheduleRequest;

/// Unrounded loan state between periods
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Last completed payment number (0 before the first payment)
    pub payment_number: u32,

    /// Outstanding balance after the last payment
    pub balance: f64,

    /// Down payment plus all principal paid so far, per borrower
    pub cumulative_equity: Vec<f64>,
}

impl AmortizationState {
    /// Initialize state at loan origination
    pub fn from_request(request: &ScheduleRequest) -> Self {
        Self {
            payment_number: 0,
            balance: request.terms.principal,
            cumulative_equity: request.borrowers.down_payment.clone(),
        }
    }

    /// Advance to the next payment period
    pub fn advance_period(&mut self) {
        self.payment_number += 1;
    }

    /// Calendar year (1-indexed) of the current payment
    pub fn loan_year(&self) -> u32 {
        year_of_payment(self.payment_number)
    }

    /// Apply one period's principal split
    pub fn apply_principal(&mut self, principal_parts: &[f64], principal_paid: f64) {
        self.balance -= principal_paid;
        for (equity, part) in self.cumulative_equity.iter_mut().zip(principal_parts) {
            *equity += part;
        }
    }

    /// Whether any balance remains above `tolerance`
    pub fn is_outstanding(&self, tolerance: f64) -> bool {
        self.balance > tolerance
    }
}

/// Year bucket for a 1-indexed payment number
pub fn year_of_payment(payment_number: u32) -> u32 {
    (payment_number - 1) / 12 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_of_payment() {
        assert_eq!(year_of_payment(1), 1);
        assert_eq!(year_of_payment(12), 1);
        assert_eq!(year_of_payment(13), 2);
        assert_eq!(year_of_payment(213), 18);
    }
}
