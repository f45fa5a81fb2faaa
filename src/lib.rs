//! Equilibrium strategies for dynamic safety/performance races.
//!
//! N players split effort (and optionally investment) between a safety track
//! and a performance track over T periods. A contest success function picks a
//! winner from relative performance, a risk function turns the winner's safety
//! into a probability of catastrophe, and a reward/cost pair closes the
//! single-period payoff. The [`Aggregator`] discounts and chains periods and
//! searches for an equilibrium; the [`Scenario`] solves many independent
//! configurations in parallel.
pub mod actions;
pub mod aggregator;
pub mod error;
pub mod functions;
pub mod payoff;
pub mod scenario;

pub use actions::*;
pub use aggregator::*;
pub use error::*;
pub use functions::*;
pub use payoff::*;
pub use scenario::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Expected payoffs, rewards, costs and discounted sums.
pub type Utility = f64;
/// Win, survival and running probabilities.
pub type Probability = f64;

// ============================================================================
// BEST-RESPONSE ITERATION
// Outer loop: every round each player re-optimizes against the last profile.
// ============================================================================
/// Maximum best-response rounds before giving up on convergence.
pub const SOLVER_MAX_ITERS: usize = 100;
/// Relative tolerance on successive per-player utilities.
pub const SOLVER_TOLERANCE: f64 = 1e-6;
/// Absolute floor for the utility comparison (utilities near zero).
pub const SOLVER_ABS_TOLERANCE: f64 = 1.4901161193847656e-8; // sqrt(f64::EPSILON)

// ============================================================================
// NELDER-MEAD INNER SOLVE
// Each best response is a derivative-free search in log-action space.
// ============================================================================
/// Offset of each initial simplex vertex from the base point (log space).
pub const SIMPLEX_SIZE: f64 = 0.1;
/// Iteration cap for a single best response.
pub const SIMPLEX_ITERS: u64 = 200;
/// Stop once the standard deviation of simplex costs falls below this.
pub const SIMPLEX_TOLERANCE: f64 = 1e-8;
/// Cost reported to the simplex when a candidate evaluates to a non-finite value.
pub const SIMPLEX_PENALTY: f64 = 1e300;

// ============================================================================
// MIXED STRATEGIES
// Fictitious-play style history: each slot is refit against the whole history.
// ============================================================================
/// Number of pure profiles kept in a mixed-strategy history.
pub const MIXED_HIST_SIZE: usize = 10;

// ============================================================================
// INITIAL GUESSES
// Actions start near exp(μ), optionally jittered by a seeded log-uniform draw.
// ============================================================================
/// Log-space center of the initial guess.
pub const INIT_MU: f64 = -1.0;
/// Log-space spread of random initial guesses.
pub const INIT_SIGMA: f64 = 0.1;
/// Seed used when a random initial guess is requested without one.
pub const INIT_SEED: u64 = 0x5AFE;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Relative/absolute float comparison: |a - b| <= max(atol, rtol * max(|a|, |b|)).
pub fn isclose(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    (a - b).abs() <= f64::max(atol, rtol * f64::max(a.abs(), b.abs()))
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "cli")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
