use crate::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Where the best-response iteration starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InitGuess {
    /// every component of every period set to this value
    Constant(f64),
    /// components drawn log-uniformly from `exp(INIT_MU ± INIT_SIGMA)`
    Random { seed: u64 },
    /// an explicit starting trajectory, one profile per period
    Fixed(Vec<Actions>),
}

impl Default for InitGuess {
    fn default() -> Self {
        Self::Constant(INIT_MU.exp())
    }
}

impl InitGuess {
    pub fn random() -> Self {
        Self::Random { seed: INIT_SEED }
    }

    /// Materialize a `t`-period trajectory for `n` players.
    pub fn trajectory(&self, form: Form, t: usize, n: usize) -> RaceResult<Vec<Actions>> {
        match self {
            Self::Constant(x) => (0..t).map(|_| Actions::uniform(form, n, *x)).collect(),
            Self::Random { seed } => Self::scatter(&mut SmallRng::seed_from_u64(*seed), form, t, n),
            Self::Fixed(seq) => {
                if seq.len() != t {
                    return Err(RaceError::config(format!(
                        "initial guess covers {} periods, solving for {}",
                        seq.len(),
                        t
                    )));
                }
                if let Some(bad) = seq.iter().find(|a| a.n() != n || a.form() != form) {
                    return Err(RaceError::config(format!(
                        "initial guess period is {} for {} players, expected {} for {}",
                        bad.form(),
                        bad.n(),
                        form,
                        n
                    )));
                }
                Ok(seq.clone())
            }
        }
    }

    /// Seed for any draw made on behalf of this guess.
    pub fn seed(&self) -> u64 {
        match self {
            Self::Random { seed } => *seed,
            _ => INIT_SEED,
        }
    }

    /// A `t`-period trajectory drawn log-uniformly around `exp(INIT_MU)`.
    pub(crate) fn scatter(rng: &mut SmallRng, form: Form, t: usize, n: usize) -> RaceResult<Vec<Actions>> {
        (0..t)
            .map(|_| {
                let data = (0..n * form.width())
                    .map(|_| rng.random_range(INIT_MU - INIT_SIGMA..INIT_MU + INIT_SIGMA).exp())
                    .collect();
                Actions::from_rows(form, data)
            })
            .collect()
    }
}

/// Inner Nelder-Mead settings for one best response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplexOptions {
    pub size: f64,
    pub iters: u64,
    pub tol: f64,
}

impl Default for SimplexOptions {
    fn default() -> Self {
        Self {
            size: SIMPLEX_SIZE,
            iters: SIMPLEX_ITERS,
            tol: SIMPLEX_TOLERANCE,
        }
    }
}

/// Everything `solve_with` can be told. Defaults come from the crate constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    pub init: InitGuess,
    pub form: Form,
    pub max_iters: usize,
    pub tol: f64,
    pub simplex: SimplexOptions,
    pub parallel: bool,
    pub best_effort: bool,
    pub time_limit: Option<Duration>,
    /// profiles kept by the mixed-strategy solver
    pub hist_size: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            init: InitGuess::default(),
            form: Form::default(),
            max_iters: SOLVER_MAX_ITERS,
            tol: SOLVER_TOLERANCE,
            simplex: SimplexOptions::default(),
            parallel: false,
            best_effort: false,
            time_limit: None,
            hist_size: MIXED_HIST_SIZE,
        }
    }
}

impl SolverOptions {
    pub fn with_init(self, init: InitGuess) -> Self {
        Self { init, ..self }
    }
    pub fn with_form(self, form: Form) -> Self {
        Self { form, ..self }
    }
    pub fn with_max_iters(self, max_iters: usize) -> Self {
        Self { max_iters, ..self }
    }
    pub fn with_tol(self, tol: f64) -> Self {
        Self { tol, ..self }
    }
    pub fn with_simplex(self, simplex: SimplexOptions) -> Self {
        Self { simplex, ..self }
    }
    pub fn with_parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }
    pub fn with_best_effort(self, best_effort: bool) -> Self {
        Self {
            best_effort,
            ..self
        }
    }
    pub fn with_time_limit(self, time_limit: Duration) -> Self {
        Self {
            time_limit: Some(time_limit),
            ..self
        }
    }
    pub fn with_hist_size(self, hist_size: usize) -> Self {
        Self { hist_size, ..self }
    }

    /// Reject settings that would make the iteration meaningless.
    pub fn validate(&self) -> RaceResult<()> {
        if !(self.tol.is_finite() && self.tol >= 0.) {
            return Err(RaceError::config(format!("solver tolerance {} is invalid", self.tol)));
        }
        if !(self.simplex.size.is_finite() && self.simplex.size > 0.) {
            return Err(RaceError::config(format!(
                "simplex size {} must be positive",
                self.simplex.size
            )));
        }
        if !(self.simplex.tol.is_finite() && self.simplex.tol >= 0.) {
            return Err(RaceError::config(format!(
                "simplex tolerance {} is invalid",
                self.simplex.tol
            )));
        }
        if self.hist_size == 0 {
            return Err(RaceError::config("mixed-strategy history needs at least one profile"));
        }
        if let InitGuess::Constant(x) = self.init {
            if !(x.is_finite() && x > 0.) {
                return Err(RaceError::config(format!(
                    "constant initial guess {} must be positive",
                    x
                )));
            }
        }
        Ok(())
    }
}
