//! Schedule and yearly roll-up output structures

use serde::{Deserialize, Serialize};

use super::state::year_of_payment;

/// One amortization period, values rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRow {
    /// 1-indexed payment number
    pub payment_number: u32,

    /// Principal paid this period, all borrowers combined
    pub principal_paid: f64,

    /// Interest accrued this period (aggregate before proration)
    pub interest_paid: f64,

    /// Balance after this payment
    pub loan_balance: f64,

    /// Down payment plus principal paid to date, per borrower
    pub cumulative_equity: Vec<f64>,
}

/// Full payment-by-payment schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub rows: Vec<PaymentRow>,
}

impl Schedule {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, row: PaymentRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&PaymentRow> {
        self.rows.last()
    }

    /// Number of equity columns
    pub fn borrower_count(&self) -> usize {
        self.rows.first().map(|r| r.cumulative_equity.len()).unwrap_or(0)
    }

    /// Sum of the displayed interest column
    pub fn total_interest(&self) -> f64 {
        self.rows.iter().map(|r| r.interest_paid).sum()
    }

    /// Sum of the displayed principal column
    pub fn total_principal(&self) -> f64 {
        self.rows.iter().map(|r| r.principal_paid).sum()
    }
}

/// Year-end snapshot derived from the last payment of the year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    /// 1-indexed loan year
    pub year: u32,

    /// Per-borrower equity at the last payment of the year
    pub equity: Vec<f64>,

    /// Balance at the last payment of the year
    pub loan_balance: f64,

    /// Sum of all borrowers' equity
    pub total_equity: f64,

    /// Per-borrower fraction of total equity
    pub share: Vec<f64>,
}

/// One row per calendar year of the loan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyRollup {
    pub rows: Vec<YearRow>,
}

impl YearlyRollup {
    /// Group schedule rows into 12-payment years, keeping the last observation of each year
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let mut rows: Vec<YearRow> = Vec::new();

        for payment in &schedule.rows {
            let year = year_of_payment(payment.payment_number);
            match rows.last_mut() {
                Some(last) if last.year == year => {
                    last.equity.clone_from(&payment.cumulative_equity);
                    last.loan_balance = payment.loan_balance;
                }
                _ => rows.push(YearRow {
                    year,
                    equity: payment.cumulative_equity.clone(),
                    loan_balance: payment.loan_balance,
                    total_equity: 0.0,
                    share: Vec::new(),
                }),
            }
        }

        for row in &mut rows {
            row.total_equity = row.equity.iter().sum();
            row.share = ownership_shares(&row.equity, row.total_equity);
        }

        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&YearRow> {
        self.rows.last()
    }
}

/// Split ownership by equity; with no equity at all, borrowers own equal shares
fn ownership_shares(equity: &[f64], total_equity: f64) -> Vec<f64> {
    if total_equity > 0.0 {
        equity.iter().map(|e| e / total_equity).collect()
    } else {
        vec![1.0 / equity.len() as f64; equity.len()]
    }
}

/// Complete engine output for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Nominal level payment for the full term (reference only)
    pub scheduled_payment: f64,

    pub schedule: Schedule,

    pub yearly: YearlyRollup,
}

impl AmortizationResult {
    pub fn into_parts(self) -> (Schedule, YearlyRollup) {
        (self.schedule, self.yearly)
    }

    /// Headline figures for the run
    pub fn summary(&self) -> ScheduleSummary {
        let months_to_payoff = self.schedule.last().map(|r| r.payment_number).unwrap_or(0);
        let final_shares = self.yearly.last().map(|r| r.share.clone()).unwrap_or_default();
        let final_equity = self.yearly.last().map(|r| r.equity.clone()).unwrap_or_default();

        ScheduleSummary {
            months_to_payoff,
            years_to_payoff: months_to_payoff as f64 / 12.0,
            scheduled_payment: self.scheduled_payment,
            total_interest: self.schedule.total_interest(),
            total_principal: self.schedule.total_principal(),
            final_equity,
            final_shares,
        }
    }
}

/// Summary statistics for a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub months_to_payoff: u32,
    pub years_to_payoff: f64,
    pub scheduled_payment: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub final_equity: Vec<f64>,
    pub final_shares: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn row(payment_number: u32, balance: f64, equity: Vec<f64>) -> PaymentRow {
        PaymentRow {
            payment_number,
            principal_paid: 10.0,
            interest_paid: 1.0,
            loan_balance: balance,
            cumulative_equity: equity,
        }
    }

    #[test]
    fn test_rollup_takes_last_row_of_each_year() {
        let mut schedule = Schedule::new();
        for n in 1..=25 {
            let paid = n as f64 * 10.0;
            schedule.add_row(row(n, 1000.0 - paid, vec![paid * 0.25, paid * 0.75]));
        }

        let yearly = YearlyRollup::from_schedule(&schedule);
        assert_eq!(yearly.len(), 3);
        assert_eq!(yearly.rows[0].year, 1);
        assert_abs_diff_eq!(yearly.rows[0].loan_balance, 880.0);
        assert_abs_diff_eq!(yearly.rows[1].equity[1], 180.0);
        // Partial final year holds a single payment
        assert_eq!(yearly.rows[2].year, 3);
        assert_abs_diff_eq!(yearly.rows[2].loan_balance, 750.0);
        assert_abs_diff_eq!(yearly.rows[2].total_equity, 250.0);
        assert_abs_diff_eq!(yearly.rows[2].share[0], 0.25);
        assert_abs_diff_eq!(yearly.rows[2].share[1], 0.75);
    }

    #[test]
    fn test_zero_equity_splits_evenly() {
        let mut schedule = Schedule::new();
        schedule.add_row(row(1, 100.0, vec![0.0, 0.0, 0.0, 0.0]));

        let yearly = YearlyRollup::from_schedule(&schedule);
        assert_eq!(yearly.rows[0].share, vec![0.25; 4]);
    }

    #[test]
    fn test_summary_totals() {
        let mut schedule = Schedule::new();
        for n in 1..=14 {
            schedule.add_row(row(n, 0.0, vec![n as f64]));
        }
        let result = AmortizationResult {
            scheduled_payment: 11.0,
            yearly: YearlyRollup::from_schedule(&schedule),
            schedule,
        };

        let summary = result.summary();
        assert_eq!(summary.months_to_payoff, 14);
        assert_abs_diff_eq!(summary.years_to_payoff, 14.0 / 12.0);
        assert_abs_diff_eq!(summary.total_interest, 14.0);
        assert_abs_diff_eq!(summary.total_principal, 140.0);
        assert_eq!(summary.final_shares, vec![1.0]);
        assert_eq!(summary.final_equity, vec![14.0]);
    }
}
