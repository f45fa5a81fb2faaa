//! Multi-period aggregation and the best-response equilibrium search.
mod aggregator;
mod beliefs;
mod options;
mod result;
mod solver;

pub use aggregator::*;
pub use beliefs::*;
pub use options::*;
pub use result::*;
