use super::*;
use crate::error::*;
use crate::functions::*;

/// Cross product of component choices, enumerated row-major.
///
/// The production list varies slowest and the cost list fastest, so index
/// `((((ip * nr + ir) * nc + ic) * nw + iw) * nk + ik)` holds the payoff
/// built from `productions[ip], risks[ir], csfs[ic], rewards[iw], costs[ik]`.
#[derive(Debug, Clone)]
pub struct PayoffGrid {
    shape: [usize; 5],
    payoffs: Vec<PayoffFunc>,
}

impl PayoffGrid {
    pub fn len(&self) -> usize {
        self.payoffs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.payoffs.is_empty()
    }
    /// list lengths: (productions, risks, csfs, rewards, costs)
    pub fn shape(&self) -> [usize; 5] {
        self.shape
    }
    pub fn get(&self, index: usize) -> Option<&PayoffFunc> {
        self.payoffs.get(index)
    }
    pub fn iter(&self) -> impl Iterator<Item = &PayoffFunc> {
        self.payoffs.iter()
    }
    pub fn into_vec(self) -> Vec<PayoffFunc> {
        self.payoffs
    }

    /// Input-list indices that produced the payoff at `index`.
    pub fn origin(&self, index: usize) -> Option<[usize; 5]> {
        if index >= self.len() {
            return None;
        }
        let mut rest = index;
        let mut origin = [0; 5];
        for (slot, width) in origin.iter_mut().zip(self.shape.iter()).rev() {
            *slot = rest % width;
            rest /= width;
        }
        Some(origin)
    }
}

impl IntoIterator for PayoffGrid {
    type Item = PayoffFunc;
    type IntoIter = std::vec::IntoIter<PayoffFunc>;
    fn into_iter(self) -> Self::IntoIter {
        self.payoffs.into_iter()
    }
}

impl PayoffFunc {
    /// Every combination of the given components. Fails on any empty list or
    /// on a combination whose components disagree on the player count.
    pub fn expand_from(
        productions: &[Production],
        risks: &[Risk],
        csfs: &[Csf],
        rewards: &[Reward],
        costs: &[Cost],
    ) -> RaceResult<PayoffGrid> {
        let shape = [
            productions.len(),
            risks.len(),
            csfs.len(),
            rewards.len(),
            costs.len(),
        ];
        if shape.contains(&0) {
            return Err(RaceError::config(format!(
                "PayoffFunc::expand_from: every component list needs an entry, got {:?}",
                shape
            )));
        }
        let mut payoffs = Vec::with_capacity(shape.iter().product());
        for production in productions {
            for risk in risks {
                for csf in csfs {
                    for reward in rewards {
                        for cost in costs {
                            payoffs.push(PayoffFunc::new(
                                production.clone(),
                                risk.clone(),
                                csf.clone(),
                                reward.clone(),
                                cost.clone(),
                            )?);
                        }
                    }
                }
            }
        }
        log::debug!("expanded {} payoff functions from {:?}", payoffs.len(), shape);
        Ok(PayoffGrid { shape, payoffs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> PayoffGrid {
        PayoffFunc::expand_from(
            &[Production::symmetric(2, 10., 0.5, 1., 0.5).unwrap()],
            &[
                Risk::winner_only(vec![0.5; 2]).unwrap(),
                Risk::winner_only(vec![1.; 2]).unwrap(),
            ],
            &[Csf::default(), Csf::maybe_no_win(1.).unwrap()],
            &[Reward::default_for(2).unwrap()],
            &[
                Cost::fixed(vec![0.1; 2]).unwrap(),
                Cost::fixed(vec![0.2; 2]).unwrap(),
                Cost::fixed(vec![0.3; 2]).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn enumerates_every_combination() {
        let grid = grid();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.shape(), [1, 2, 2, 1, 3]);
    }

    #[test]
    fn cost_varies_fastest() {
        let grid = grid();
        assert_eq!(grid.origin(0), Some([0, 0, 0, 0, 0]));
        assert_eq!(grid.origin(1), Some([0, 0, 0, 0, 1]));
        assert_eq!(grid.origin(3), Some([0, 0, 1, 0, 0]));
        assert_eq!(grid.origin(6), Some([0, 1, 0, 0, 0]));
        assert_eq!(grid.origin(11), Some([0, 1, 1, 0, 2]));
        assert_eq!(grid.origin(12), None);
        let ref payoff = grid.get(7).unwrap();
        assert_eq!(payoff.risk(), &Risk::winner_only(vec![1.; 2]).unwrap());
        assert_eq!(payoff.csf(), &Csf::default());
        assert_eq!(payoff.cost(), &Cost::fixed(vec![0.2; 2]).unwrap());
    }

    #[test]
    fn empty_list_is_rejected() {
        let res = PayoffFunc::expand_from(
            &[Production::symmetric(2, 10., 0.5, 1., 0.5).unwrap()],
            &[],
            &[Csf::default()],
            &[Reward::default_for(2).unwrap()],
            &[Cost::fixed(vec![0.1; 2]).unwrap()],
        );
        assert!(matches!(res, Err(RaceError::Configuration(_))));
    }
}
