use crate::Utility;
use crate::error::*;

/// Payout vector as a function of who won the period.
#[derive(Debug, Clone, PartialEq)]
pub enum Reward {
    /// `prize_i` to the winner, nothing to anyone else.
    WinnerTakeAll { prize: Vec<f64> },
    /// Winner gets `win_a + win_b * p`, every loser `lose_a + lose_b * p`,
    /// each evaluated at the receiving player's own performance.
    Linear {
        win_a: Vec<f64>,
        win_b: Vec<f64>,
        lose_a: Vec<f64>,
        lose_b: Vec<f64>,
    },
}

impl Reward {
    pub fn winner_take_all(prize: Vec<f64>) -> RaceResult<Self> {
        check_lengths("Reward::winner_take_all", &[prize.len()])?;
        if prize.iter().any(|x| !x.is_finite()) {
            return Err(RaceError::config("Reward::winner_take_all: prizes must be finite"));
        }
        Ok(Self::WinnerTakeAll { prize })
    }

    /// unit prize for every player
    pub fn default_for(n: usize) -> RaceResult<Self> {
        Self::winner_take_all(vec![1.; n])
    }

    pub fn linear(
        win_a: Vec<f64>,
        win_b: Vec<f64>,
        lose_a: Vec<f64>,
        lose_b: Vec<f64>,
    ) -> RaceResult<Self> {
        check_lengths(
            "Reward::linear",
            &[win_a.len(), win_b.len(), lose_a.len(), lose_b.len()],
        )?;
        if [&win_a, &win_b, &lose_a, &lose_b]
            .iter()
            .any(|v| v.iter().any(|x| !x.is_finite()))
        {
            return Err(RaceError::config("Reward::linear: coefficients must be finite"));
        }
        Ok(Self::Linear {
            win_a,
            win_b,
            lose_a,
            lose_b,
        })
    }

    pub fn n(&self) -> usize {
        match self {
            Self::WinnerTakeAll { prize } => prize.len(),
            Self::Linear { win_a, .. } => win_a.len(),
        }
    }

    /// Payout to every player when `winner` wins (or nobody does).
    pub fn reward(&self, winner: Option<usize>, p: &[f64]) -> Vec<Utility> {
        match winner {
            None => vec![0.; self.n()],
            Some(w) => (0..self.n())
                .map(|j| match self {
                    Self::WinnerTakeAll { prize } if j == w => prize[j],
                    Self::WinnerTakeAll { .. } => 0.,
                    Self::Linear { win_a, win_b, .. } if j == w => win_a[j] + win_b[j] * p[j],
                    Self::Linear { lose_a, lose_b, .. } => lose_a[j] + lose_b[j] * p[j],
                })
                .collect(),
        }
    }
}

impl std::fmt::Display for Reward {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::WinnerTakeAll { prize } => write!(f, "RewardFunc (WinnerTakeAll): prize = {:?}", prize),
            Self::Linear {
                win_a,
                win_b,
                lose_a,
                lose_b,
            } => write!(
                f,
                "RewardFunc (Linear) {{ win_a: {:?}, win_b: {:?}, lose_a: {:?}, lose_b: {:?} }}",
                win_a, win_b, lose_a, lose_b
            ),
        }
    }
}
