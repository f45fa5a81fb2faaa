//! Pure single-period components composed by [`crate::PayoffFunc`].
//!
//! Each family is a closed set of variants behind one evaluation method,
//! selected by a named constructor:
//! - [`Production`]: effort (+ stock) to (safety, performance) output
//! - [`Csf`]: performance to win probabilities
//! - [`Risk`]: safety to survival probabilities
//! - [`Reward`]: win outcome to payouts
//! - [`Cost`]: actions to costs
mod cost;
mod csf;
mod production;
mod reward;
mod risk;

pub use cost::*;
pub use csf::*;
pub use production::*;
pub use reward::*;
pub use risk::*;
