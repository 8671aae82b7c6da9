//! Load borrowers from CSV and full requests from JSON

use super::{BorrowerSet, ScheduleRequest};
use crate::error::Result;
use csv::Reader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Raw CSV row: one borrower per line
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Borrower")]
    borrower: String,
    #[serde(rename = "MonthlyContribution")]
    monthly_contribution: f64,
    #[serde(rename = "DownPayment", default)]
    down_payment: f64,
}

/// Load borrowers from a CSV file with `Borrower,MonthlyContribution,DownPayment` columns
pub fn load_borrowers<P: AsRef<Path>>(path: P) -> Result<BorrowerSet> {
    let reader = Reader::from_path(path)?;
    collect_borrowers(reader)
}

/// Load borrowers from any reader (e.g., string buffer, stdin)
pub fn load_borrowers_from_reader<R: std::io::Read>(reader: R) -> Result<BorrowerSet> {
    collect_borrowers(Reader::from_reader(reader))
}

fn collect_borrowers<R: std::io::Read>(mut reader: Reader<R>) -> Result<BorrowerSet> {
    let mut labels = Vec::new();
    let mut contributions = Vec::new();
    let mut down_payments = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        labels.push(row.borrower.trim().to_string());
        contributions.push(row.monthly_contribution);
        down_payments.push(row.down_payment);
    }

    BorrowerSet::new(contributions, down_payments)?.with_labels(labels)
}

/// Load a complete request (terms and borrowers) from a JSON file
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<ScheduleRequest> {
    let file = File::open(path)?;
    let request: ScheduleRequest = serde_json::from_reader(BufReader::new(file))?;
    request.validate()?;
    Ok(request)
}
