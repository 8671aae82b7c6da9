//! Compare payoff and ownership across scaled contribution scenarios
//!
//! Usage: cargo run --bin compare_scenarios -- --factor 1.0 --factor 1.25 --output sweep.csv

use anyhow::{Context, Result};
use clap::Parser;
use shared_mortgage::{
    AmortizationConfig, AmortizationResult, BorrowerSet, LoanTerms, ScenarioRunner,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
struct Args {
    #[arg(long, default_value_t = 362_316.0)]
    principal: f64,

    #[arg(long, default_value_t = 0.06125)]
    annual_rate: f64,

    #[arg(long, default_value_t = 30)]
    term_years: u32,

    #[arg(long = "contribution", default_values_t = [700.0, 2100.0])]
    contributions: Vec<f64>,

    #[arg(long = "down-payment", default_values_t = [13_000.0, 0.0])]
    down_payments: Vec<f64>,

    /// Contribution multipliers to evaluate
    #[arg(long = "factor", default_values_t = [0.75, 1.0, 1.25, 1.5, 2.0])]
    factors: Vec<f64>,

    #[arg(long, default_value = "scenario_comparison.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let terms = LoanTerms::new(args.principal, args.annual_rate, args.term_years)?;
    let base = BorrowerSet::new(args.contributions.clone(), args.down_payments.clone())?;
    let runner = ScenarioRunner::new(terms, AmortizationConfig::default());

    let start = Instant::now();
    let results = runner.sweep_contributions(&base, &args.factors);
    println!("Ran {} scenarios in {:?}", results.len(), start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("Unable to create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);

    let share_cols: Vec<String> = (1..=base.len()).map(|i| format!("Share_{}", i)).collect();
    writeln!(
        out,
        "Factor,TotalContribution,MonthsToPayoff,TotalInterest,{},Error",
        share_cols.join(",")
    )?;

    for (factor, result) in args.factors.iter().zip(&results) {
        let total = base.total_contribution() * factor;
        writeln!(out, "{}", comparison_row(*factor, total, result, base.len()))?;
        match result {
            Ok(result) => {
                let summary = result.summary();
                println!(
                    "  x{:<5} ${:>9.2}/month -> {:>3} months, interest ${:.2}",
                    factor, total, summary.months_to_payoff, summary.total_interest
                );
            }
            Err(e) => println!("  x{:<5} ${:>9.2}/month -> {}", factor, total, e),
        }
    }

    out.flush()?;
    println!("Comparison written to {}", args.output.display());
    Ok(())
}

/// One CSV line per factor; failed scenarios keep their row with empty metrics and the error
fn comparison_row(
    factor: f64,
    total: f64,
    result: &shared_mortgage::Result<AmortizationResult>,
    borrowers: usize,
) -> String {
    match result {
        Ok(result) => {
            let summary = result.summary();
            let shares: Vec<String> =
                summary.final_shares.iter().map(|s| format!("{:.6}", s)).collect();
            format!(
                "{:.4},{:.2},{},{:.2},{},",
                factor,
                total,
                summary.months_to_payoff,
                summary.total_interest,
                shares.join(",")
            )
        }
        Err(e) => {
            let blanks = ",".repeat(2 + borrowers);
            let reason = e.to_string().replace(['"', ','], " ");
            format!("{:.4},{:.2}{},{}", factor, total, blanks, reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_scenario_keeps_its_row() {
        let terms = LoanTerms::new(362_316.0, 0.06125, 30).unwrap();
        let base = BorrowerSet::new(vec![700.0, 2100.0], vec![13_000.0, 0.0]).unwrap();
        let runner = ScenarioRunner::new(terms, AmortizationConfig::default());
        let factors = [0.5, 1.0];
        let results = runner.sweep_contributions(&base, &factors);

        let rows: Vec<String> = factors
            .iter()
            .zip(&results)
            .map(|(f, r)| comparison_row(*f, base.total_contribution() * f, r, base.len()))
            .collect();

        // Header has Factor, TotalContribution, MonthsToPayoff, TotalInterest, 2 shares, Error
        for row in &rows {
            assert_eq!(row.split(',').count(), 7);
        }
        let failed: Vec<&str> = rows[0].split(',').collect();
        assert_eq!(failed[0], "0.5000");
        assert_eq!(failed[1], "1400.00");
        assert!(failed[2..6].iter().all(|f| f.is_empty()));
        assert!(failed[6].contains("insufficient"));

        let ok: Vec<&str> = rows[1].split(',').collect();
        assert_eq!(ok[2], "213");
        assert!(ok[6].is_empty());
    }
}
