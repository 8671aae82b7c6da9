//! Closed-form fixed-rate annuity formulas
//!
//! Used for the nominal scheduled payment and as a reference for checking the
//! period-by-period engine against the textbook balance.

/// Level payment that retires `principal` over `periods` at `monthly_rate`
///
/// `P * r(1+r)^T / ((1+r)^T - 1)`. Undefined at a zero rate; callers validate the rate first.
pub fn scheduled_payment(principal: f64, monthly_rate: f64, periods: u32) -> f64 {
    let growth = (1.0 + monthly_rate).powi(periods as i32);
    principal * (monthly_rate * growth) / (growth - 1.0)
}

/// Outstanding balance after `periods_elapsed` level payments of `payment`
///
/// `P(1+r)^k - A((1+r)^k - 1)/r`, floored at zero once the loan is retired.
pub fn remaining_balance(principal: f64, monthly_rate: f64, payment: f64, periods_elapsed: u32) -> f64 {
    let growth = (1.0 + monthly_rate).powi(periods_elapsed as i32);
    (principal * growth - payment * (growth - 1.0) / monthly_rate).max(0.0)
}

/// Fractional number of level payments needed to retire the loan
///
/// Returns `None` when the payment never covers the first period's interest.
pub fn periods_to_payoff(principal: f64, monthly_rate: f64, payment: f64) -> Option<f64> {
    let interest_share = principal * monthly_rate / payment;
    if payment <= 0.0 || interest_share >= 1.0 {
        return None;
    }
    Some(-(1.0 - interest_share).ln() / (1.0 + monthly_rate).ln())
}
