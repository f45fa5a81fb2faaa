use super::*;
use crate::aggregator::*;
use crate::error::*;
use rayon::prelude::*;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

/// A batch of independent problems solved side by side.
///
/// Each entry is solved on its own task in a bounded rayon pool. Results
/// come back in input order, and a failing or panicking entry only
/// poisons its own slot.
#[derive(Debug, Clone)]
pub struct Scenario {
    aggregators: Vec<Aggregator>,
    threads: Option<usize>,
}

impl Scenario {
    pub fn new(aggregators: Vec<Aggregator>) -> RaceResult<Self> {
        if aggregators.is_empty() {
            return Err(RaceError::config("Scenario: no aggregators given"));
        }
        Ok(Self {
            aggregators,
            threads: None,
        })
    }

    /// Override the pool size (defaults to one thread per core).
    pub fn with_threads(self, threads: usize) -> Self {
        Self {
            threads: Some(threads.max(1)),
            ..self
        }
    }

    pub fn len(&self) -> usize {
        self.aggregators.len()
    }
    pub fn is_empty(&self) -> bool {
        self.aggregators.is_empty()
    }
    pub fn aggregators(&self) -> &[Aggregator] {
        &self.aggregators
    }

    fn threads(&self) -> usize {
        self.threads
            .unwrap_or_else(num_cpus::get)
            .min(self.len())
            .max(1)
    }

    pub fn solve(&self, t: usize) -> RaceResult<Batch> {
        self.solve_with(t, &SolverOptions::default())
    }

    /// Solve every entry over `t` periods. Only pool construction fails the
    /// whole call; per-entry errors land in their slots.
    pub fn solve_with(&self, t: usize, options: &SolverOptions) -> RaceResult<Batch> {
        let threads = self.threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| RaceError::Backend(e.to_string()))?;
        log::info!(
            "scenario of {} problems over {} periods on {} threads",
            self.len(),
            t,
            threads
        );
        let start = Instant::now();
        let slots = pool.install(|| {
            self.aggregators
                .par_iter()
                .map(|agg| Self::isolated(|| agg.solve_with(t, options)))
                .collect::<Vec<_>>()
        });
        let batch = Batch::new(slots);
        log::info!(
            "scenario finished in {:.2?} ({} failed)",
            start.elapsed(),
            batch.failures().len()
        );
        Ok(batch)
    }

    fn isolated<F>(solve: F) -> RaceResult<SolverResult>
    where
        F: FnOnce() -> RaceResult<SolverResult>,
    {
        std::panic::catch_unwind(AssertUnwindSafe(solve)).unwrap_or_else(
            |panic| {
                let msg = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "solver panicked".to_string());
                Err(RaceError::Backend(msg))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::*;
    use crate::functions::*;
    use crate::payoff::*;

    fn aggregator(theta: f64) -> Aggregator {
        let payoff = PayoffFunc::new(
            Production::symmetric(2, 10., 0.5, 1., 0.5).unwrap(),
            Risk::winner_only(vec![theta; 2]).unwrap(),
            Csf::default(),
            Reward::default_for(2).unwrap(),
            Cost::fixed(vec![0.1; 2]).unwrap(),
        )
        .unwrap();
        Aggregator::new(payoff, vec![0.9, 1.]).unwrap()
    }

    fn quick() -> SolverOptions {
        SolverOptions::default()
            .with_max_iters(3)
            .with_best_effort(true)
    }

    #[test]
    fn copies_match_standalone_solve() {
        let agg = aggregator(0.5);
        let alone = agg.solve_with(3, &quick()).unwrap();
        let batch = Scenario::new(vec![agg; 4])
            .unwrap()
            .solve_with(3, &quick())
            .unwrap();
        assert_eq!(batch.len(), 4);
        for res in batch.into_results().unwrap() {
            assert_eq!(res, alone);
        }
    }

    #[test]
    fn preserves_input_order() {
        let aggs = vec![aggregator(0.25), aggregator(0.5), aggregator(1.), aggregator(2.)];
        let expected = aggs
            .iter()
            .map(|a| a.solve_with(2, &quick()).unwrap())
            .collect::<Vec<_>>();
        let batch = Scenario::new(aggs)
            .unwrap()
            .with_threads(2)
            .solve_with(2, &quick())
            .unwrap();
        assert_eq!(batch.into_results().unwrap(), expected);
    }

    #[test]
    fn failing_slot_does_not_spread() {
        let three = PayoffFunc::new(
            Production::symmetric(3, 10., 0.5, 1., 0.5).unwrap(),
            Risk::winner_only(vec![0.5; 3]).unwrap(),
            Csf::default(),
            Reward::default_for(3).unwrap(),
            Cost::fixed(vec![0.1; 3]).unwrap(),
        )
        .unwrap();
        let aggs = vec![
            aggregator(0.5),
            Aggregator::new(three, vec![0.9; 3]).unwrap(),
            aggregator(1.),
        ];
        let guess = vec![Actions::uniform(Form::Basic, 2, 0.5).unwrap(); 2];
        let options = quick().with_init(InitGuess::Fixed(guess));
        let batch = Scenario::new(aggs).unwrap().solve_with(2, &options).unwrap();
        assert_eq!(batch.len(), 3);
        assert!(batch.get(0).unwrap().is_ok());
        assert!(matches!(batch.get(1), Some(Err(RaceError::Configuration(_)))));
        assert!(batch.get(2).unwrap().is_ok());
        assert!(matches!(
            batch.into_results(),
            Err(RaceError::BatchPartialFailure { total: 3, .. })
        ));
    }

    #[test]
    fn panics_become_backend_errors() {
        let agg = aggregator(0.5);
        assert!(Scenario::isolated(|| agg.solve_with(1, &quick())).is_ok());
        let caught = Scenario::isolated(|| panic!("boom"));
        assert_eq!(caught, Err(RaceError::Backend("boom".to_string())));
    }

    #[test]
    fn empty_scenario_is_rejected() {
        assert!(Scenario::new(vec![]).is_err());
    }

    #[test]
    fn pool_never_exceeds_entries() {
        let scenario = Scenario::new(vec![aggregator(0.5); 2]).unwrap();
        assert!(scenario.threads() <= 2);
        assert_eq!(scenario.with_threads(0).threads(), 1);
    }
}
