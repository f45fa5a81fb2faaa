use super::*;
use crate::Probability;
use crate::Utility;
use crate::actions::*;
use crate::error::*;
use crate::payoff::*;

/// Discounted multi-period payoff, and the entry point for solving.
///
/// Player i values a trajectory as
///
/// ```text
/// U_i = sum_t gamma_i^t * running_i(t) * u_i(t)
/// ```
///
/// where `u_i(t)` is the single-period payoff under player i's belief, with
/// investment stock threaded from one period into the next. Without
/// `end_on_win` the running probability is always 1; with it, each period is
/// weighted by the believed probability that nobody has won yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregator {
    beliefs: Beliefs,
    gammas: Vec<f64>,
    end_on_win: bool,
}

impl Aggregator {
    pub fn new(payoff: PayoffFunc, gammas: Vec<f64>) -> RaceResult<Self> {
        Self::heterogeneous(Beliefs::Common(payoff), gammas)
    }

    pub fn heterogeneous(beliefs: Beliefs, gammas: Vec<f64>) -> RaceResult<Self> {
        check_lengths("Aggregator gammas", &[beliefs.n(), gammas.len()])?;
        if let Some(g) = gammas.iter().find(|g| !(**g > 0. && **g <= 1.)) {
            return Err(RaceError::config(format!(
                "Aggregator: discount factors must lie in (0, 1], found {}",
                g
            )));
        }
        Ok(Self {
            beliefs,
            gammas,
            end_on_win: false,
        })
    }

    /// Weight later periods by the chance the contest is still undecided.
    pub fn with_end_on_win(self, end_on_win: bool) -> Self {
        Self { end_on_win, ..self }
    }

    /// Every (payoff, gammas) combination, payoff varying slowest.
    pub fn expand_from(
        payoffs: &[PayoffFunc],
        gammas: &[Vec<f64>],
        end_on_win: bool,
    ) -> RaceResult<Vec<Self>> {
        if payoffs.is_empty() || gammas.is_empty() {
            return Err(RaceError::config(
                "Aggregator::expand_from: payoff and gamma lists need at least one entry",
            ));
        }
        payoffs
            .iter()
            .flat_map(|payoff| gammas.iter().map(move |g| (payoff, g)))
            .map(|(payoff, g)| -> RaceResult<Self> {
                Ok(Self::new(payoff.clone(), g.clone())?.with_end_on_win(end_on_win))
            })
            .collect()
    }

    pub fn n(&self) -> usize {
        self.gammas.len()
    }
    pub fn gammas(&self) -> &[f64] {
        &self.gammas
    }
    pub fn end_on_win(&self) -> bool {
        self.end_on_win
    }
    pub fn beliefs(&self) -> &Beliefs {
        &self.beliefs
    }

    /// Discounted utility of every player.
    pub fn u(&self, seq: &[Actions]) -> RaceResult<Vec<Utility>> {
        match self.beliefs {
            Beliefs::Common(ref payoff) => {
                let ref periods = self.rollout(payoff, seq)?;
                Ok((0..self.n()).map(|i| self.discount(i, periods)).collect())
            }
            Beliefs::Heterogeneous(_) => (0..self.n()).map(|i| self.u_i(i, seq)).collect(),
        }
    }

    /// Discounted utility of player i under its own belief.
    pub fn u_i(&self, i: usize, seq: &[Actions]) -> RaceResult<Utility> {
        if i >= self.n() {
            return Err(RaceError::domain(format!("no player {} among {}", i, self.n())));
        }
        let ref periods = self.rollout(self.beliefs.of(i), seq)?;
        Ok(self.discount(i, periods))
    }

    /// Each player's believed probability that the contest is still running
    /// at the start of every period, one row per period.
    pub fn probas(&self, seq: &[Actions]) -> RaceResult<Vec<Vec<Probability>>> {
        let columns = match self.beliefs {
            Beliefs::Common(ref payoff) => {
                let running = self.running(&self.rollout(payoff, seq)?);
                vec![running; self.n()]
            }
            Beliefs::Heterogeneous(ref payoffs) => payoffs
                .iter()
                .map(|payoff| -> RaceResult<Vec<Probability>> {
                    Ok(self.running(&self.rollout(payoff, seq)?))
                })
                .collect::<RaceResult<Vec<_>>>()?,
        };
        Ok((0..seq.len())
            .map(|t| columns.iter().map(|col| col[t]).collect())
            .collect())
    }

    /// Evaluate a trajectory period by period, carrying stock forward.
    fn rollout(&self, payoff: &PayoffFunc, seq: &[Actions]) -> RaceResult<Vec<Period>> {
        let mut stock = Stock::zeros(payoff.n());
        let mut periods = Vec::with_capacity(seq.len());
        for actions in seq {
            let period = payoff.evaluate(actions, &stock)?;
            stock = period.next.clone();
            periods.push(period);
        }
        Ok(periods)
    }

    fn running(&self, periods: &[Period]) -> Vec<Probability> {
        let mut running = 1.;
        periods
            .iter()
            .map(|period| {
                let start = running;
                if self.end_on_win {
                    running *= period.continues();
                }
                start
            })
            .collect()
    }

    fn discount(&self, i: usize, periods: &[Period]) -> Utility {
        let gamma = self.gammas[i];
        self.running(periods)
            .into_iter()
            .zip(periods)
            .enumerate()
            .map(|(t, (running, period))| gamma.powi(t as i32) * running * period.utility[i])
            .sum()
    }
}

impl std::fmt::Display for Aggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let ends = if self.end_on_win { ", ends on win" } else { "" };
        writeln!(f, "Aggregator (gammas = {:?}{})", self.gammas, ends)?;
        match self.beliefs {
            Beliefs::Common(ref payoff) => write!(f, "{}", payoff),
            Beliefs::Heterogeneous(ref payoffs) => {
                for (i, payoff) in payoffs.iter().enumerate() {
                    writeln!(f, "belief of player {}:", i)?;
                    write!(f, "{}", payoff)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::*;

    fn payoff(csf: Csf) -> PayoffFunc {
        PayoffFunc::new(
            Production::symmetric(2, 10., 0.5, 1., 0.5).unwrap(),
            Risk::winner_only(vec![0.5; 2]).unwrap(),
            csf,
            Reward::default_for(2).unwrap(),
            Cost::fixed(vec![0.1; 2]).unwrap(),
        )
        .unwrap()
        .with_disaster(vec![1.; 2])
        .unwrap()
    }

    fn seq(t: usize) -> Vec<Actions> {
        (0..t)
            .map(|k| Actions::basic(vec![1. + k as f64, 2.], vec![0.5, 1. + k as f64]).unwrap())
            .collect()
    }

    #[test]
    fn empty_sequence_is_worth_nothing() {
        let agg = Aggregator::new(payoff(Csf::default()), vec![0.9, 1.]).unwrap();
        assert_eq!(agg.u(&[]).unwrap(), vec![0., 0.]);
        assert!(agg.probas(&[]).unwrap().is_empty());
    }

    #[test]
    fn discounts_each_period() {
        let pf = payoff(Csf::default());
        let agg = Aggregator::new(pf.clone(), vec![0.5, 1.]).unwrap();
        let seq = seq(3);
        let periods = (0..3)
            .map(|t| pf.u(&seq[t], &Stock::zeros(2)).unwrap())
            .collect::<Vec<_>>();
        let u = agg.u(&seq).unwrap();
        let u0 = periods[0][0] + 0.5 * periods[1][0] + 0.25 * periods[2][0];
        let u1 = periods[0][1] + periods[1][1] + periods[2][1];
        assert!((u[0] - u0).abs() < 1e-12);
        assert!((u[1] - u1).abs() < 1e-12);
        assert!((agg.u_i(1, &seq).unwrap() - u1).abs() < 1e-12);
    }

    #[test]
    fn end_on_win_weights_by_running_probability() {
        let pf = payoff(Csf::maybe_no_win(1.).unwrap());
        let agg = Aggregator::new(pf.clone(), vec![1., 1.])
            .unwrap()
            .with_end_on_win(true);
        let seq = seq(3);
        let probas = agg.probas(&seq).unwrap();
        assert_eq!(probas.len(), 3);
        assert_eq!(probas[0], vec![1., 1.]);
        let none0 = pf.evaluate(&seq[0], &Stock::zeros(2)).unwrap().continues();
        assert!((probas[1][0] - none0).abs() < 1e-12);
        assert!(probas[2][0] <= probas[1][0]);

        let plain = Aggregator::new(pf, vec![1., 1.]).unwrap();
        assert!(plain.probas(&seq).unwrap().iter().flatten().all(|p| *p == 1.));
    }

    #[test]
    fn proportional_contest_ends_after_one_period() {
        let agg = Aggregator::new(payoff(Csf::default()), vec![1., 1.])
            .unwrap()
            .with_end_on_win(true);
        let seq = seq(4);
        let probas = agg.probas(&seq).unwrap();
        assert!(probas[1..].iter().flatten().all(|p| *p == 0.));
        let first = agg.u(&seq[..1]).unwrap();
        assert_eq!(agg.u(&seq).unwrap(), first);
    }

    #[test]
    fn identical_beliefs_match_common() {
        let pf = payoff(Csf::maybe_no_win(0.5).unwrap());
        let common = Aggregator::new(pf.clone(), vec![0.9, 0.8])
            .unwrap()
            .with_end_on_win(true);
        let beliefs = Beliefs::heterogeneous(vec![pf.clone(), pf]).unwrap();
        let hetero = Aggregator::heterogeneous(beliefs, vec![0.9, 0.8])
            .unwrap()
            .with_end_on_win(true);
        let seq = seq(4);
        assert_eq!(common.u(&seq).unwrap(), hetero.u(&seq).unwrap());
        assert_eq!(common.probas(&seq).unwrap(), hetero.probas(&seq).unwrap());
    }

    #[test]
    fn expand_from_is_row_major() {
        let payoffs = [payoff(Csf::default()), payoff(Csf::maybe_no_win(1.).unwrap())];
        let gammas = [vec![0.9; 2], vec![0.5; 2], vec![1.; 2]];
        let aggs = Aggregator::expand_from(&payoffs, &gammas, true).unwrap();
        assert_eq!(aggs.len(), 6);
        assert_eq!(aggs[4].beliefs(), &Beliefs::Common(payoffs[1].clone()));
        assert_eq!(aggs[4].gammas(), &[0.5, 0.5]);
        assert!(aggs.iter().all(|a| a.end_on_win()));
        assert!(Aggregator::expand_from(&payoffs, &[], false).is_err());
    }

    #[test]
    fn rejects_bad_gammas() {
        assert!(Aggregator::new(payoff(Csf::default()), vec![0.9]).is_err());
        assert!(Aggregator::new(payoff(Csf::default()), vec![0., 0.5]).is_err());
        assert!(Aggregator::new(payoff(Csf::default()), vec![1.1, 0.5]).is_err());
    }

    #[test]
    fn rejects_wrong_player_count() {
        let agg = Aggregator::new(payoff(Csf::default()), vec![0.9, 1.]).unwrap();
        let seq = vec![Actions::uniform(Form::Basic, 3, 1.).unwrap()];
        assert!(matches!(agg.u(&seq), Err(RaceError::Domain(_))));
        assert!(agg.u_i(2, &[]).is_err());
    }
}
