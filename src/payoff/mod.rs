mod grid;
mod payoff;

pub use grid::*;
pub use payoff::*;
