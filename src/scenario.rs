//! Scenario runner for comparing contribution splits
//!
//! Holds one set of loan terms and an engine config, then evaluates any number of
//! borrower scenarios against them. Runs are independent, so batches fan out on rayon.

use rayon::prelude::*;

use crate::amortization::{AmortizationConfig, AmortizationEngine, AmortizationResult};
use crate::error::Result;
use crate::loan::{BorrowerSet, LoanTerms, ScheduleRequest};

/// Pre-configured runner for batch amortizations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(terms, AmortizationConfig::default());
///
/// for extra in [0.0, 250.0, 500.0] {
///     let borrowers = BorrowerSet::new(vec![700.0 + extra, 2100.0], vec![13_000.0, 0.0])?;
///     let result = runner.run(&borrowers)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    terms: LoanTerms,
    engine: AmortizationEngine,
}

impl ScenarioRunner {
    pub fn new(terms: LoanTerms, config: AmortizationConfig) -> Self {
        Self {
            terms,
            engine: AmortizationEngine::new(config),
        }
    }

    /// Run a single scenario
    pub fn run(&self, borrowers: &BorrowerSet) -> Result<AmortizationResult> {
        let request = ScheduleRequest::new(self.terms, borrowers.clone());
        self.engine.amortize(&request)
    }

    /// Run several scenarios in parallel; results keep the input order
    pub fn run_scenarios(&self, scenarios: &[BorrowerSet]) -> Vec<Result<AmortizationResult>> {
        scenarios.par_iter().map(|borrowers| self.run(borrowers)).collect()
    }

    /// Scale every borrower's contribution by each factor and run the results
    pub fn sweep_contributions(
        &self,
        base: &BorrowerSet,
        factors: &[f64],
    ) -> Vec<Result<AmortizationResult>> {
        let scenarios: Vec<BorrowerSet> = factors
            .iter()
            .map(|factor| BorrowerSet {
                monthly_contribution: base.monthly_contribution.iter().map(|c| c * factor).collect(),
                ..base.clone()
            })
            .collect();
        self.run_scenarios(&scenarios)
    }

    pub fn terms(&self) -> &LoanTerms {
        &self.terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AmortizationError;

    fn runner() -> ScenarioRunner {
        let terms = LoanTerms::new(362_316.0, 0.06125, 30).unwrap();
        ScenarioRunner::new(terms, AmortizationConfig::default())
    }

    fn base() -> BorrowerSet {
        BorrowerSet::new(vec![700.0, 2100.0], vec![13_000.0, 0.0]).unwrap()
    }

    #[test]
    fn test_scenarios_keep_order_and_match_single_runs() {
        let runner = runner();
        let scenarios = vec![
            base(),
            BorrowerSet::new(vec![1400.0, 1400.0], vec![13_000.0, 0.0]).unwrap(),
            BorrowerSet::new(vec![2100.0, 700.0], vec![0.0, 13_000.0]).unwrap(),
        ];

        let results = runner.run_scenarios(&scenarios);
        assert_eq!(results.len(), 3);
        for (scenario, result) in scenarios.iter().zip(&results) {
            let single = runner.run(scenario).unwrap();
            assert_eq!(result.as_ref().unwrap(), &single);
        }

        // Same total payment, so payoff timing is identical across splits
        let months: Vec<u32> = results
            .iter()
            .map(|r| r.as_ref().unwrap().summary().months_to_payoff)
            .collect();
        assert!(months.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_sweep_higher_contributions_pay_off_sooner() {
        let results = runner().sweep_contributions(&base(), &[1.0, 1.25, 1.5]);
        let months: Vec<u32> = results
            .iter()
            .map(|r| r.as_ref().unwrap().summary().months_to_payoff)
            .collect();

        assert!(months[0] > months[1]);
        assert!(months[1] > months[2]);
    }

    #[test]
    fn test_failures_stay_per_scenario() {
        let results = runner().sweep_contributions(&base(), &[0.5, 1.0]);
        assert!(matches!(results[0], Err(AmortizationError::InsufficientPayment { .. })));
        assert!(results[1].is_ok());
    }
}
