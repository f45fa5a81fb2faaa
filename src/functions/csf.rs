use crate::Probability;
use crate::error::*;

/// Probability of each player winning the period, plus the residual
/// probability that nobody wins. Always sums to 1 over its support.
#[derive(Debug, Clone, PartialEq)]
pub struct WinDistribution {
    wins: Vec<Probability>,
    none: Probability,
}

impl WinDistribution {
    pub fn n(&self) -> usize {
        self.wins.len()
    }
    pub fn wins(&self) -> &[Probability] {
        &self.wins
    }
    pub fn win(&self, i: usize) -> Probability {
        self.wins[i]
    }
    /// probability that no player wins this period
    pub fn none(&self) -> Probability {
        self.none
    }
    /// probability that someone wins this period
    pub fn decided(&self) -> Probability {
        self.wins.iter().sum()
    }
}

/// Contest success function: relative performance to win probabilities.
#[derive(Debug, Clone, PartialEq)]
pub enum Csf {
    /// Exactly one winner, chosen in proportion to performance.
    Proportional,
    /// Proportional shares with room for nobody winning at low performance.
    MaybeNoWin { scale: f64 },
}

impl Default for Csf {
    fn default() -> Self {
        Self::Proportional
    }
}

impl Csf {
    /// `q_i = scale * p_i / (1 + scale * sum(p))`, leaving
    /// `1 / (1 + scale * sum(p))` for the no-winner outcome.
    ///
    /// Evaluated as `p_i / (1/scale + sum(p))`, so `1/scale` must be finite.
    pub fn maybe_no_win(scale: f64) -> RaceResult<Self> {
        if scale.is_finite() && scale > 0. && scale.recip().is_finite() {
            Ok(Self::MaybeNoWin { scale })
        } else {
            Err(RaceError::config(format!(
                "Csf::maybe_no_win: scale must be finite and positive, found {}",
                scale
            )))
        }
    }

    /// Win distribution for the given performance outputs.
    ///
    /// Under `Proportional`, zero total performance splits the win uniformly
    /// across players instead of producing 0/0.
    pub fn q(&self, p: &[f64]) -> RaceResult<WinDistribution> {
        if p.is_empty() {
            return Err(RaceError::domain("Csf: no performance outputs"));
        }
        if let Some(x) = p.iter().find(|x| !x.is_finite() || **x < 0.) {
            return Err(RaceError::domain(format!(
                "Csf: performance outputs must be finite and non-negative, found {}",
                x
            )));
        }
        let total = p.iter().sum::<f64>();
        if !total.is_finite() {
            return Err(RaceError::domain("Csf: total performance overflows"));
        }
        match self {
            Self::Proportional if total == 0. => Ok(WinDistribution {
                wins: vec![1. / p.len() as f64; p.len()],
                none: 0.,
            }),
            Self::Proportional => Ok(WinDistribution {
                wins: p.iter().map(|x| x / total).collect(),
                none: 0.,
            }),
            Self::MaybeNoWin { scale } => {
                // rescale by the larger term so neither sum nor quotient overflows
                let k = scale.recip();
                let m = f64::max(k, total);
                let denom = k / m + total / m;
                Ok(WinDistribution {
                    wins: p.iter().map(|x| (x / m) / denom).collect(),
                    none: (k / m) / denom,
                })
            }
        }
    }
}

impl std::fmt::Display for Csf {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Proportional => write!(f, "CSF (Default)"),
            Self::MaybeNoWin { scale } => write!(f, "CSF (MaybeNoWin, scale = {})", scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total(q: &WinDistribution) -> f64 {
        q.decided() + q.none()
    }

    #[test]
    fn proportional_shares() {
        let q = Csf::default().q(&[1., 3.]).unwrap();
        assert_eq!(q.wins(), &[0.25, 0.75]);
        assert_eq!(q.none(), 0.);
    }

    #[test]
    fn zero_performance_splits_uniformly() {
        let q = Csf::default().q(&[0., 0., 0., 0.]).unwrap();
        assert_eq!(q.wins(), &[0.25; 4]);
        assert!(q.wins().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn maybe_no_win_reserves_mass() {
        let q = Csf::maybe_no_win(1.).unwrap().q(&[1., 2.]).unwrap();
        assert!((q.win(0) - 0.25).abs() < 1e-12);
        assert!((q.win(1) - 0.5).abs() < 1e-12);
        assert!((q.none() - 0.25).abs() < 1e-12);
        let q = Csf::maybe_no_win(2.).unwrap().q(&[0., 0.]).unwrap();
        assert_eq!(q.none(), 1.);
    }

    #[test]
    fn always_sums_to_one() {
        let csfs = [
            Csf::default(),
            Csf::maybe_no_win(0.5).unwrap(),
            Csf::maybe_no_win(1e300).unwrap(),
            Csf::maybe_no_win(1e-300).unwrap(),
        ];
        let inputs: [&[f64]; 8] = [
            &[0.],
            &[0., 0.],
            &[1e-12, 5.],
            &[1e6, 1e-6, 3.],
            &[2.; 7],
            &[1e10, 1e10],
            &[1e300, 1e-300],
            &[f64::MAX / 4., f64::MAX / 4.],
        ];
        for csf in csfs.iter() {
            for p in inputs.iter() {
                let q = csf.q(p).unwrap();
                assert!((total(&q) - 1.).abs() < 1e-12, "{} on {:?}", csf, p);
                assert!(q.wins().iter().all(|x| x.is_finite() && *x >= 0.));
                assert!(q.none().is_finite());
            }
        }
    }

    #[test]
    fn rejects_invalid_performance() {
        assert!(Csf::default().q(&[]).is_err());
        assert!(Csf::default().q(&[-1., 1.]).is_err());
        assert!(Csf::default().q(&[f64::NAN, 1.]).is_err());
        assert!(Csf::default().q(&[f64::MAX, f64::MAX]).is_err());
    }

    #[test]
    fn huge_scale_leaves_no_room_for_nobody() {
        let q = Csf::maybe_no_win(1e300).unwrap().q(&[1e10, 1e10]).unwrap();
        assert!((q.win(0) - 0.5).abs() < 1e-12);
        assert!((q.win(1) - 0.5).abs() < 1e-12);
        assert!(q.none() < 1e-12);
    }

    #[test]
    fn rejects_invalid_scale() {
        assert!(Csf::maybe_no_win(0.).is_err());
        assert!(Csf::maybe_no_win(-1.).is_err());
        assert!(Csf::maybe_no_win(f64::INFINITY).is_err());
        assert!(Csf::maybe_no_win(f64::MIN_POSITIVE / 8.).is_err());
    }
}
