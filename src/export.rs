//! Delimited-text export of schedules and yearly roll-ups
//!
//! Amounts are written with exactly `rounding_digits` decimals; shares are fractions
//! and keep six decimals regardless.

use csv::Writer;
use std::io::Write;

use crate::amortization::{Schedule, YearlyRollup};
use crate::error::Result;

const SHARE_DIGITS: usize = 6;

fn amount(value: f64, digits: u32) -> String {
    format!("{:.*}", digits as usize, value)
}

/// Header for the payment-by-payment schedule
pub fn schedule_header(borrowers: usize) -> Vec<String> {
    let mut header: Vec<String> = ["PaymentNumber", "PrincipalPaid", "InterestPaid", "LoanBalance"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend((1..=borrowers).map(|i| format!("Equity_{}", i)));
    header
}

/// Header for the yearly roll-up
pub fn yearly_header(borrowers: usize) -> Vec<String> {
    let mut header = vec!["Year".to_string()];
    header.extend((1..=borrowers).map(|i| format!("Equity_{}", i)));
    header.push("LoanBalance".to_string());
    header.push("TotalEquity".to_string());
    header.extend((1..=borrowers).map(|i| format!("Share_{}", i)));
    header
}

/// Write the schedule as CSV with a header row
pub fn write_schedule_csv<W: Write>(out: W, schedule: &Schedule, rounding_digits: u32) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    writer.write_record(schedule_header(schedule.borrower_count()))?;

    for row in &schedule.rows {
        let mut record = vec![
            row.payment_number.to_string(),
            amount(row.principal_paid, rounding_digits),
            amount(row.interest_paid, rounding_digits),
            amount(row.loan_balance, rounding_digits),
        ];
        record.extend(row.cumulative_equity.iter().map(|&e| amount(e, rounding_digits)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the yearly roll-up as CSV with a header row
pub fn write_yearly_csv<W: Write>(out: W, yearly: &YearlyRollup, rounding_digits: u32) -> Result<()> {
    let borrowers = yearly.rows.first().map(|r| r.equity.len()).unwrap_or(0);
    let mut writer = Writer::from_writer(out);
    writer.write_record(yearly_header(borrowers))?;

    for row in &yearly.rows {
        let mut record = vec![row.year.to_string()];
        record.extend(row.equity.iter().map(|&e| amount(e, rounding_digits)));
        record.push(amount(row.loan_balance, rounding_digits));
        record.push(amount(row.total_equity, rounding_digits));
        record.extend(row.share.iter().map(|s| format!("{:.*}", SHARE_DIGITS, s)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Render the schedule as an in-memory CSV string (download payload)
pub fn schedule_to_csv_string(schedule: &Schedule, rounding_digits: u32) -> Result<String> {
    let mut buffer = Vec::new();
    write_schedule_csv(&mut buffer, schedule, rounding_digits)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::compute_schedule;
    use crate::loan::{BorrowerSet, LoanTerms};

    fn example() -> (Schedule, YearlyRollup) {
        let terms = LoanTerms::new(362_316.0, 0.06125, 30).unwrap();
        let borrowers = BorrowerSet::new(vec![700.0, 2100.0], vec![13_000.0, 0.0]).unwrap();
        compute_schedule(terms, borrowers, 2).unwrap()
    }

    #[test]
    fn test_schedule_csv_layout() {
        let (schedule, _) = example();
        let csv = schedule_to_csv_string(&schedule, 2).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), schedule.len() + 1);
        assert_eq!(
            lines[0],
            "PaymentNumber,PrincipalPaid,InterestPaid,LoanBalance,Equity_1,Equity_2"
        );
        assert!(lines[1].starts_with("1,950.68,1849.32,361365.32,"));
        assert!(lines.last().unwrap().contains(",0.00,"));
    }

    #[test]
    fn test_yearly_csv_layout() {
        let (_, yearly) = example();
        let mut buffer = Vec::new();
        write_yearly_csv(&mut buffer, &yearly, 2).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Year,Equity_1,Equity_2,LoanBalance,TotalEquity,Share_1,Share_2"
        );
        let first: Vec<&str> = lines.next().unwrap().split(',').collect();
        assert_eq!(first.len(), 7);
        assert_eq!(first[0], "1");
        assert_eq!(first[5].split('.').nth(1).unwrap().len(), 6);
        assert_eq!(text.lines().count(), yearly.len() + 1);
    }

    #[test]
    fn test_amounts_follow_rounding_digits() {
        assert_eq!(amount(12.26, 1), "12.3");
        assert_eq!(amount(3.0, 3), "3.000");
        assert_eq!(schedule_header(1).len(), 5);
        assert_eq!(yearly_header(3).len(), 1 + 3 + 2 + 3);
    }
}
