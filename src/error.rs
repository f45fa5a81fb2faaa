/// Errors surfaced while building components, evaluating payoffs or solving.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RaceError {
    /// Malformed parameters, caught at construction time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A pure function was evaluated outside its valid domain.
    #[error("domain error: {0}")]
    Domain(String),

    /// The best-response iteration ran out of rounds (or time).
    #[error("no equilibrium after {iterations} rounds (last relative change {delta:.3e})")]
    Convergence { iterations: usize, delta: f64 },

    /// Some scenario entries failed; the failing slots are listed with their errors.
    #[error("{} of {total} scenario entries failed: {}", .failures.len(), summarize(.failures))]
    BatchPartialFailure {
        failures: Vec<(usize, String)>,
        total: usize,
    },

    /// The optimization backend or a worker failed outside the cases above.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Shorthand for results carrying a [`RaceError`].
pub type RaceResult<T> = Result<T, RaceError>;

impl RaceError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }
}

/// Recover our own error from the optimizer, otherwise keep the backend message.
impl From<argmin::core::Error> for RaceError {
    fn from(e: argmin::core::Error) -> Self {
        match e.downcast::<RaceError>() {
            Ok(inner) => inner,
            Err(other) => Self::Backend(other.to_string()),
        }
    }
}

fn summarize(failures: &[(usize, String)]) -> String {
    failures
        .iter()
        .map(|(i, e)| format!("[{}] {}", i, e))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Ensure every per-player vector has the same, non-zero length.
pub(crate) fn check_lengths(what: &str, lens: &[usize]) -> RaceResult<usize> {
    match lens.first() {
        None | Some(0) => Err(RaceError::config(format!("{}: empty parameter vector", what))),
        Some(&n) if lens.iter().all(|&l| l == n) => Ok(n),
        Some(_) => Err(RaceError::config(format!(
            "{}: per-player vectors disagree in length {:?}",
            what, lens
        ))),
    }
}

/// Ensure every entry is finite and non-negative.
pub(crate) fn check_rates(what: &str, values: &[f64]) -> RaceResult<()> {
    match values.iter().find(|x| !x.is_finite() || **x < 0.) {
        Some(x) => Err(RaceError::config(format!(
            "{}: expected finite non-negative values, found {}",
            what, x
        ))),
        None => Ok(()),
    }
}
