use crate::Probability;
use crate::Utility;
use crate::actions::*;
use crate::error::*;
use crate::functions::*;

/// Everything computed while evaluating one period, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Period {
    pub outputs: Outputs,
    pub win: WinDistribution,
    pub survival: Survival,
    pub cost: Vec<Utility>,
    pub utility: Vec<Utility>,
    pub next: Stock,
}

impl Period {
    /// probability that nobody won, i.e. the contest carries on
    pub fn continues(&self) -> Probability {
        self.win.none()
    }
}

/// Single-period expected utility built from the component functions.
///
/// For player i, with win probabilities `q`, conditional survival `sigma`
/// and overall survival `S`:
///
/// ```text
/// u_i = sum_w q_w * sigma_w * reward_i(w)  -  (1 - S) * D_i  -  c_i
/// ```
///
/// Rewards are only collected in worlds that survive the winner; the
/// disaster cost `D_i` is paid whenever the period ends in catastrophe; the
/// action cost is paid regardless. Investment stock then depreciates at
/// `depreciation_i` and absorbs the period's investment.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffFunc {
    n: usize,
    production: Production,
    risk: Risk,
    csf: Csf,
    reward: Reward,
    cost: Cost,
    disaster: Vec<f64>,
    depreciation: Vec<f64>,
}

impl PayoffFunc {
    pub fn new(
        production: Production,
        risk: Risk,
        csf: Csf,
        reward: Reward,
        cost: Cost,
    ) -> RaceResult<Self> {
        let n = production.n();
        if [risk.n(), reward.n(), cost.n()].iter().any(|m| *m != n) {
            return Err(RaceError::config(format!(
                "PayoffFunc: components disagree on player count \
                 (production {}, risk {}, reward {}, cost {})",
                n,
                risk.n(),
                reward.n(),
                cost.n()
            )));
        }
        Ok(Self {
            n,
            production,
            risk,
            csf,
            reward,
            cost,
            disaster: vec![0.; n],
            depreciation: vec![0.; n],
        })
    }

    /// Loss charged to each player when a catastrophe happens.
    pub fn with_disaster(self, disaster: Vec<f64>) -> RaceResult<Self> {
        check_lengths("PayoffFunc disaster", &[self.n, disaster.len()])?;
        check_rates("PayoffFunc disaster", &disaster)?;
        Ok(Self { disaster, ..self })
    }

    /// Per-period fraction of investment stock lost, in [0, 1].
    pub fn with_depreciation(self, depreciation: Vec<f64>) -> RaceResult<Self> {
        check_lengths("PayoffFunc depreciation", &[self.n, depreciation.len()])?;
        check_rates("PayoffFunc depreciation", &depreciation)?;
        if depreciation.iter().any(|d| *d > 1.) {
            return Err(RaceError::config("PayoffFunc: depreciation cannot exceed 1"));
        }
        Ok(Self {
            depreciation,
            ..self
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }
    pub fn production(&self) -> &Production {
        &self.production
    }
    pub fn risk(&self) -> &Risk {
        &self.risk
    }
    pub fn csf(&self) -> &Csf {
        &self.csf
    }
    pub fn reward(&self) -> &Reward {
        &self.reward
    }
    pub fn cost(&self) -> &Cost {
        &self.cost
    }
    pub fn disaster(&self) -> &[f64] {
        &self.disaster
    }
    pub fn depreciation(&self) -> &[f64] {
        &self.depreciation
    }

    /// Evaluate one period given the actions and the stock carried into it.
    pub fn evaluate(&self, actions: &Actions, stock: &Stock) -> RaceResult<Period> {
        let outputs = self.production.f(actions, stock)?;
        let win = self.csf.q(&outputs.performance)?;
        let survival = self.risk.survival(&outputs, &win)?;
        let rewards = (0..self.n)
            .map(|w| self.reward.reward(Some(w), &outputs.performance))
            .collect::<Vec<_>>();
        let cost = self.cost.c(actions)?;
        let utility = (0..self.n)
            .map(|i| {
                let expected = (0..self.n)
                    .map(|w| win.win(w) * survival.conditional[w] * rewards[w][i])
                    .sum::<f64>();
                let disaster = (1. - survival.overall) * self.disaster[i];
                expected - disaster - cost[i]
            })
            .collect();
        let next = stock.advance(actions, &self.depreciation)?;
        Ok(Period {
            outputs,
            win,
            survival,
            cost,
            utility,
            next,
        })
    }

    /// Expected utility of every player for one period.
    pub fn u(&self, actions: &Actions, stock: &Stock) -> RaceResult<Vec<Utility>> {
        Ok(self.evaluate(actions, stock)?.utility)
    }

    pub fn u_i(&self, i: usize, actions: &Actions, stock: &Stock) -> RaceResult<Utility> {
        Ok(self.u(actions, stock)?[i])
    }
}

impl std::fmt::Display for PayoffFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "PayoffFunc ({} players)", self.n)?;
        writeln!(f, "  {}", self.production)?;
        writeln!(f, "  {}", self.risk)?;
        writeln!(f, "  {}", self.csf)?;
        writeln!(f, "  {}", self.reward)?;
        writeln!(f, "  {}", self.cost)?;
        write!(
            f,
            "  disaster = {:?}, depreciation = {:?}",
            self.disaster, self.depreciation
        )
    }
}
