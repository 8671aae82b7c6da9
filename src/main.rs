//! Shared Mortgage CLI
//!
//! Builds the amortization schedule for a shared loan, prints the headline numbers
//! and optionally writes the schedule and yearly roll-up as CSV.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use shared_mortgage::{
    amortization::{AmortizationConfig, AmortizationEngine, RoundingMode, ScheduleSummary},
    export::{write_schedule_csv, write_yearly_csv},
    loan::{load_borrowers, load_request, BorrowerSet, LoanTerms, ScheduleRequest},
    AmortizationResult,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Amortize a mortgage shared by borrowers with unequal contributions
#[derive(Debug, Parser)]
#[command(name = "shared_mortgage", version)]
struct Cli {
    /// Loan amount
    #[arg(long, default_value_t = 362_316.0)]
    principal: f64,

    /// Nominal annual rate as a fraction (0.06125 = 6.125%)
    #[arg(long, default_value_t = 0.06125)]
    annual_rate: f64,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    term_years: u32,

    /// Monthly contribution, one per borrower (repeat the flag)
    #[arg(long = "contribution", default_values_t = [700.0, 2100.0])]
    contributions: Vec<f64>,

    /// Down payment, one per borrower (repeat the flag)
    #[arg(long = "down-payment", default_values_t = [13_000.0, 0.0])]
    down_payments: Vec<f64>,

    /// CSV of borrowers (Borrower,MonthlyContribution,DownPayment); replaces the vectors above
    #[arg(long)]
    borrowers: Option<PathBuf>,

    /// JSON request with terms and borrowers; replaces all loan inputs
    #[arg(long)]
    request: Option<PathBuf>,

    /// Decimal places for displayed amounts
    #[arg(long, default_value_t = 2)]
    rounding: u32,

    #[arg(long, value_enum, default_value_t = RoundingMode::HalfEven)]
    rounding_mode: RoundingMode,

    /// Balance treated as fully paid
    #[arg(long, default_value_t = shared_mortgage::amortization::DEFAULT_BALANCE_TOLERANCE)]
    tolerance: f64,

    /// Give up after this many multiples of the scheduled term (0 disables the cap)
    #[arg(long, default_value_t = 10)]
    max_period_multiple: u32,

    /// Write the full schedule here
    #[arg(long)]
    schedule_csv: Option<PathBuf>,

    /// Write the yearly roll-up here
    #[arg(long)]
    yearly_csv: Option<PathBuf>,

    /// Print summary and tables as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> AmortizationConfig {
        AmortizationConfig {
            rounding_digits: self.rounding,
            rounding_mode: self.rounding_mode,
            balance_tolerance: self.tolerance,
            max_period_multiple: (self.max_period_multiple > 0).then_some(self.max_period_multiple),
        }
    }

    fn request(&self) -> Result<ScheduleRequest> {
        if let Some(path) = &self.request {
            return load_request(path)
                .with_context(|| format!("Failed to load request from {}", path.display()));
        }

        let terms = LoanTerms::new(self.principal, self.annual_rate, self.term_years)?;
        let borrowers = match &self.borrowers {
            Some(path) => load_borrowers(path)
                .with_context(|| format!("Failed to load borrowers from {}", path.display()))?,
            None => BorrowerSet::new(self.contributions.clone(), self.down_payments.clone())?,
        };
        Ok(ScheduleRequest::new(terms, borrowers))
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: ScheduleSummary,
    labels: Vec<String>,
    #[serde(flatten)]
    result: &'a AmortizationResult,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let request = cli.request()?;
    let config = cli.config();
    let digits = config.rounding_digits;

    let engine = AmortizationEngine::new(config);
    let result = engine
        .amortize(&request)
        .context("Amortization failed")?;
    let summary = result.summary();
    let labels: Vec<String> = (0..request.borrowers.len())
        .map(|i| request.borrowers.label(i))
        .collect();

    if let Some(path) = &cli.schedule_csv {
        let file = File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        write_schedule_csv(BufWriter::new(file), &result.schedule, digits)?;
    }
    if let Some(path) = &cli.yearly_csv {
        let file = File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        write_yearly_csv(BufWriter::new(file), &result.yearly, digits)?;
    }

    if cli.json {
        let output = JsonOutput {
            summary,
            labels,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_report(&request, &result, &summary, &labels, digits as usize);

    if let Some(path) = &cli.schedule_csv {
        println!("\nFull schedule written to: {}", path.display());
    }
    if let Some(path) = &cli.yearly_csv {
        println!("Yearly roll-up written to: {}", path.display());
    }

    Ok(())
}

fn print_report(
    request: &ScheduleRequest,
    result: &AmortizationResult,
    summary: &ScheduleSummary,
    labels: &[String],
    digits: usize,
) {
    let terms = &request.terms;
    println!("Shared Mortgage Amortization");
    println!("============================\n");
    println!(
        "Loan: ${:.2} at {:.3}% over {} years",
        terms.principal,
        terms.annual_rate * 100.0,
        terms.term_years
    );
    for (i, label) in labels.iter().enumerate() {
        println!(
            "  {:<12} contributes ${:.2}/month, down payment ${:.2}",
            label, request.borrowers.monthly_contribution[i], request.borrowers.down_payment[i]
        );
    }
    println!();

    println!("{:>5} {:>14} {:>14} {:>16}", "Year", "Balance", "Total Equity", "Shares");
    println!("{}", "-".repeat(60));
    for year in &result.yearly.rows {
        let shares: Vec<String> = year.share.iter().map(|s| format!("{:.1}%", s * 100.0)).collect();
        println!(
            "{:>5} {:>14.*} {:>14.*} {:>16}",
            year.year,
            digits,
            year.loan_balance,
            digits,
            year.total_equity,
            shares.join(" / ")
        );
    }

    println!("\nSummary:");
    println!("  Scheduled payment: ${:.2}", summary.scheduled_payment);
    println!(
        "  Months to payoff: {} (~{:.2} years)",
        summary.months_to_payoff, summary.years_to_payoff
    );
    println!("  Total interest paid: ${:.2}", summary.total_interest);
    let ownership: Vec<String> = labels
        .iter()
        .zip(&summary.final_shares)
        .map(|(label, share)| format!("{} {:.1}%", label, share * 100.0))
        .collect();
    println!("  Final ownership: {}", ownership.join(" / "));
}
