//! Loan terms, borrower data and request loading

mod data;
pub mod loader;

pub use data::{BorrowerSet, LoanTerms, ScheduleRequest};
pub use loader::{load_borrowers, load_borrowers_from_reader, load_request};
