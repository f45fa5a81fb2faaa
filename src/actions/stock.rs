use super::*;
use crate::error::*;

/// Accumulated investment carried from one period into the next.
///
/// Stock adds to each player's effective effort on the matching track:
/// `effective_safety = xs + stock.s`, `effective_performance = xp + stock.p`.
/// It starts at zero and evolves as `(1 - depreciation) * stock + investment`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    s: Vec<f64>,
    p: Vec<f64>,
}

impl Stock {
    pub fn zeros(n: usize) -> Self {
        Self {
            s: vec![0.; n],
            p: vec![0.; n],
        }
    }
    pub fn n(&self) -> usize {
        self.s.len()
    }
    pub fn s(&self, i: usize) -> f64 {
        self.s[i]
    }
    pub fn p(&self, i: usize) -> f64 {
        self.p[i]
    }

    /// Depreciate, then add this period's investment.
    pub fn advance(&self, actions: &Actions, depreciation: &[f64]) -> RaceResult<Self> {
        if actions.n() != self.n() || depreciation.len() != self.n() {
            return Err(RaceError::domain(format!(
                "stock of {} players cannot absorb {} actions ({} depreciation rates)",
                self.n(),
                actions.n(),
                depreciation.len()
            )));
        }
        let s = (0..self.n())
            .map(|i| (1. - depreciation[i]) * self.s[i] + actions.inv_s(i))
            .collect();
        let p = (0..self.n())
            .map(|i| (1. - depreciation[i]) * self.p[i] + actions.inv_p(i))
            .collect();
        Ok(Self { s, p })
    }
}
