use crate::Utility;
use crate::actions::*;
use serde::Deserialize;
use serde::Serialize;

/// Outcome of a best-response solve: the trajectory, what it is worth to each
/// player, and how the iteration ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    actions: Vec<Actions>,
    utility: Vec<Utility>,
    iterations: usize,
    converged: bool,
}

impl SolverResult {
    pub(crate) fn new(
        actions: Vec<Actions>,
        utility: Vec<Utility>,
        iterations: usize,
        converged: bool,
    ) -> Self {
        Self {
            actions,
            utility,
            iterations,
            converged,
        }
    }

    /// The equilibrium trajectory, one profile per period.
    pub fn optimum(&self) -> &[Actions] {
        &self.actions
    }
    /// # Panics
    ///
    /// Panics if `t` is not a period of the trajectory.
    pub fn actions(&self, t: usize) -> &Actions {
        &self.actions[t]
    }
    pub fn t(&self) -> usize {
        self.actions.len()
    }
    pub fn n(&self) -> usize {
        self.utility.len()
    }
    /// Discounted utility of every player at the optimum.
    pub fn utility(&self) -> &[Utility] {
        &self.utility
    }
    /// # Panics
    ///
    /// Panics if `i` is not a player index.
    pub fn u_i(&self, i: usize) -> Utility {
        self.utility[i]
    }
    pub fn iterations(&self) -> usize {
        self.iterations
    }
    pub fn converged(&self) -> bool {
        self.converged
    }
    pub fn into_optimum(self) -> Vec<Actions> {
        self.actions
    }

    /// Per-period values of one action component for one player, ready for
    /// plotting or export.
    ///
    /// # Panics
    ///
    /// Panics if `player` or `component` is out of range for the action form.
    pub fn series(&self, player: usize, component: usize) -> Vec<f64> {
        self.actions
            .iter()
            .map(|a| a.row(player)[component])
            .collect()
    }
}

impl std::fmt::Display for SolverResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let status = if self.converged { "converged" } else { "not converged" };
        writeln!(
            f,
            "{} after {} iterations, utility = {:.6?}",
            status, self.iterations, self.utility
        )?;
        for (t, actions) in self.actions.iter().enumerate() {
            writeln!(f, "t = {:>3} | {}", t, actions)?;
        }
        Ok(())
    }
}

/// Outcome of a mixed-strategy solve: a history of pure profiles, each
/// played with equal weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedResult {
    history: Vec<Vec<Actions>>,
    utility: Vec<Utility>,
    iterations: usize,
}

impl MixedResult {
    pub(crate) fn new(history: Vec<Vec<Actions>>, utility: Vec<Utility>, iterations: usize) -> Self {
        Self {
            history,
            utility,
            iterations,
        }
    }

    /// Every pure trajectory in the mixture.
    pub fn history(&self) -> &[Vec<Actions>] {
        &self.history
    }
    pub fn hist_size(&self) -> usize {
        self.history.len()
    }
    pub fn t(&self) -> usize {
        self.history.first().map_or(0, Vec::len)
    }
    pub fn n(&self) -> usize {
        self.utility.len()
    }
    /// Utility of every player, averaged over the history.
    pub fn utility(&self) -> &[Utility] {
        &self.utility
    }
    pub fn iterations(&self) -> usize {
        self.iterations
    }
    pub fn into_history(self) -> Vec<Vec<Actions>> {
        self.history
    }

    /// Per-period mean of one action component for one player.
    ///
    /// # Panics
    ///
    /// Panics if `player` or `component` is out of range for the action form.
    pub fn mean_series(&self, player: usize, component: usize) -> Vec<f64> {
        let k = self.hist_size() as f64;
        (0..self.t())
            .map(|t| {
                self.history
                    .iter()
                    .map(|seq| seq[t].row(player)[component])
                    .sum::<f64>()
                    / k
            })
            .collect()
    }
}

impl std::fmt::Display for MixedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "mixture of {} after {} iterations, expected utility = {:.6?}",
            self.hist_size(),
            self.iterations,
            self.utility
        )?;
        for (k, seq) in self.history.iter().enumerate() {
            writeln!(f, "profile {}:", k)?;
            for (t, actions) in seq.iter().enumerate() {
                writeln!(f, "t = {:>3} | {}", t, actions)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> SolverResult {
        let actions = (0..3)
            .map(|t| Actions::basic(vec![t as f64, 1.], vec![2. * t as f64, 3.]).unwrap())
            .collect();
        SolverResult::new(actions, vec![0.1, 0.2], 7, true)
    }

    #[test]
    fn accessors() {
        let res = result();
        assert_eq!(res.t(), 3);
        assert_eq!(res.n(), 2);
        assert_eq!(res.u_i(1), 0.2);
        assert_eq!(res.iterations(), 7);
        assert!(res.converged());
        assert_eq!(res.actions(2).xp(0), 4.);
    }

    #[test]
    fn series_follows_one_component() {
        let res = result();
        assert_eq!(res.series(0, 0), vec![0., 1., 2.]);
        assert_eq!(res.series(0, 1), vec![0., 2., 4.]);
        assert_eq!(res.series(1, 1), vec![3., 3., 3.]);
    }

    #[test]
    #[should_panic]
    fn series_past_the_last_component_panics() {
        result().series(0, 2);
    }

    #[test]
    #[should_panic]
    fn actions_past_the_horizon_panics() {
        result().actions(3);
    }

    #[test]
    fn display_has_one_line_per_period() {
        let text = result().to_string();
        assert_eq!(text.lines().count(), 4);
        assert!(text.starts_with("converged after 7 iterations"));
    }

    #[test]
    fn serde_round_trip() {
        let res = result();
        let json = serde_json::to_string(&res).unwrap();
        assert_eq!(serde_json::from_str::<SolverResult>(&json).unwrap(), res);
    }

    fn mixed() -> MixedResult {
        let history = (0..2)
            .map(|k| {
                (0..3)
                    .map(|t| Actions::basic(vec![(t + k) as f64, 1.], vec![1., 2.]).unwrap())
                    .collect()
            })
            .collect();
        MixedResult::new(history, vec![0.3, 0.4], 4)
    }

    #[test]
    fn mixture_accessors() {
        let res = mixed();
        assert_eq!(res.hist_size(), 2);
        assert_eq!(res.t(), 3);
        assert_eq!(res.n(), 2);
        assert_eq!(res.iterations(), 4);
        assert_eq!(res.mean_series(0, 0), vec![0.5, 1.5, 2.5]);
        assert_eq!(res.mean_series(1, 0), vec![1., 1., 1.]);
        assert_eq!(res.to_string().lines().count(), 1 + 2 * 4);
    }
}
