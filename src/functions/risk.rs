use super::*;
use crate::Probability;
use crate::error::*;

/// Survival probabilities for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct Survival {
    /// P(no catastrophe | player i wins)
    pub conditional: Vec<Probability>,
    /// P(no catastrophe), integrating over the win distribution
    pub overall: Probability,
}

/// Risk of catastrophe as a function of safety output.
#[derive(Debug, Clone, PartialEq)]
pub enum Risk {
    /// Only the winner's safety matters. Given player i wins,
    ///
    /// ```text
    /// sigma_i = s_i / (s_i + p_i^theta_i)
    /// ```
    ///
    /// so more safety output means more survival and faster performance
    /// (higher theta) erodes it. Non-winners never cause catastrophe.
    WinnerOnly { theta: Vec<f64> },
}

impl Risk {
    pub fn winner_only(theta: Vec<f64>) -> RaceResult<Self> {
        check_lengths("Risk::winner_only", &[theta.len()])?;
        check_rates("Risk::winner_only theta", &theta)?;
        Ok(Self::WinnerOnly { theta })
    }

    pub fn n(&self) -> usize {
        match self {
            Self::WinnerOnly { theta } => theta.len(),
        }
    }

    /// P(no catastrophe | player i wins), clamped to [0, 1].
    ///
    /// Evaluated through the odds `z = s * p^-theta_i` as `z / (1 + z)`, so
    /// large outputs saturate instead of overflowing to `inf / inf`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is not a player index.
    pub fn sigma_i(&self, i: usize, s: f64, p: f64) -> Probability {
        match self {
            Self::WinnerOnly { theta } => {
                if s == 0. {
                    return 0.;
                }
                if s.is_infinite() {
                    return 1.;
                }
                let z = s * p.powf(-theta[i]);
                if z.is_infinite() {
                    1.
                } else {
                    (z / (1. + z)).clamp(0., 1.)
                }
            }
        }
    }

    pub fn sigma(&self, outputs: &Outputs) -> RaceResult<Vec<Probability>> {
        if outputs.n() != self.n() {
            return Err(RaceError::domain(format!(
                "Risk for {} players evaluated on {} outputs",
                self.n(),
                outputs.n()
            )));
        }
        Ok((0..self.n())
            .map(|i| self.sigma_i(i, outputs.safety[i], outputs.performance[i]))
            .collect())
    }

    /// Per-player survival once the winner is known: the winner survives with
    /// its own conditional probability, every other player with certainty.
    pub fn given(&self, winner: Option<usize>, outputs: &Outputs) -> RaceResult<Vec<Probability>> {
        let sigma = self.sigma(outputs)?;
        Ok((0..self.n())
            .map(|i| match winner {
                Some(w) if w == i => sigma[i],
                _ => 1.,
            })
            .collect())
    }

    /// Conditional survival for each potential winner, and the overall
    /// probability the period passes without catastrophe. Periods without a
    /// winner are always safe.
    pub fn survival(&self, outputs: &Outputs, win: &WinDistribution) -> RaceResult<Survival> {
        let conditional = self.sigma(outputs)?;
        if win.n() != conditional.len() {
            return Err(RaceError::domain("Risk: win distribution has the wrong player count"));
        }
        let overall = win.none()
            + conditional
                .iter()
                .zip(win.wins())
                .map(|(sigma, q)| sigma * q)
                .sum::<f64>();
        Ok(Survival {
            conditional,
            overall: overall.clamp(0., 1.),
        })
    }
}

impl std::fmt::Display for Risk {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::WinnerOnly { theta } => write!(f, "RiskFunc (WinnerOnly): theta = {:?}", theta),
        }
    }
}
