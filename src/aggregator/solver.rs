use super::*;
use crate::*;
use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::core::State;
use argmin::solver::neldermead::NelderMead;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use std::time::Instant;

/// One player's objective with everyone else held at fixed profiles.
/// Parameters are the log of the player's actions, period-major.
///
/// Against a single profile this is a plain best response; against a
/// history it maximizes the mean utility over every profile in it.
struct BestResponse<'a> {
    aggregator: &'a Aggregator,
    player: usize,
    profiles: &'a [&'a [Actions]],
    form: Form,
}

impl BestResponse<'_> {
    fn trajectory(&self, profile: &[Actions], x: &[f64]) -> RaceResult<Vec<Actions>> {
        profile
            .iter()
            .zip(x.chunks(self.form.width()))
            .map(|(actions, row)| {
                let row = row.iter().map(|v| v.exp()).collect::<Vec<_>>();
                actions.with_row(self.player, &row)
            })
            .collect()
    }
}

impl CostFunction for BestResponse<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
        if x.iter().any(|v| !v.exp().is_finite()) {
            return Ok(SIMPLEX_PENALTY);
        }
        let mut total = 0.;
        for profile in self.profiles {
            let ref seq = self.trajectory(profile, x)?;
            match self.aggregator.u_i(self.player, seq) {
                Ok(u) if u.is_finite() => total += u,
                Ok(_) | Err(RaceError::Domain(_)) => return Ok(SIMPLEX_PENALTY),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(-total / self.profiles.len() as f64)
    }
}

impl Aggregator {
    /// Equilibrium over `t` periods with default options.
    pub fn solve(&self, t: usize) -> RaceResult<SolverResult> {
        self.solve_with(t, &SolverOptions::default())
    }

    /// Jacobi iterated best response.
    ///
    /// Each round every player re-optimizes its whole trajectory against the
    /// previous round's profile. The iteration stops once every player's
    /// discounted utility is unchanged within `options.tol`.
    pub fn solve_with(&self, t: usize, options: &SolverOptions) -> RaceResult<SolverResult> {
        options.validate()?;
        let mut profile = options.init.trajectory(options.form, t, self.n())?;
        if t == 0 {
            return Ok(SolverResult::new(profile, vec![0.; self.n()], 0, true));
        }
        log::info!(
            "solving {} players over {} periods ({})",
            self.n(),
            t,
            options.form
        );
        let start = Instant::now();
        let mut utility = self.u(&profile)?;
        let mut delta = f64::INFINITY;
        let mut rounds = 0;
        while rounds < options.max_iters {
            if options.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                log::warn!("time limit reached after {} rounds", rounds);
                break;
            }
            rounds += 1;
            let next = self.respond(&[profile.as_slice()], &profile, options)?;
            let next_utility = self.u(&next)?;
            delta = Self::change(&utility, &next_utility);
            let settled = utility
                .iter()
                .zip(next_utility.iter())
                .all(|(a, b)| isclose(*a, *b, options.tol, SOLVER_ABS_TOLERANCE));
            profile = next;
            utility = next_utility;
            log::debug!("round {:>4} | change {:.3e} | {:.6?}", rounds, delta, utility);
            if settled {
                log::info!(
                    "converged after {} rounds in {:.2?}",
                    rounds,
                    start.elapsed()
                );
                return Ok(SolverResult::new(profile, utility, rounds, true));
            }
        }
        if options.best_effort {
            log::warn!(
                "returning unconverged profile after {} rounds (change {:.3e})",
                rounds,
                delta
            );
            Ok(SolverResult::new(profile, utility, rounds, false))
        } else {
            Err(RaceError::Convergence {
                iterations: rounds,
                delta,
            })
        }
    }

    /// Mixed strategies by fictitious play over a history of pure profiles.
    ///
    /// The history starts as `options.hist_size` copies of the initial guess.
    /// Each of `options.max_iters` rounds refits every slot in turn: every
    /// player maximizes its mean utility against the whole history, starting
    /// from a fresh seeded draw, and the joint response replaces the slot.
    /// There is no stopping rule, so the run always lasts the full budget
    /// unless `options.time_limit` cuts it short.
    pub fn solve_mixed(&self, t: usize, options: &SolverOptions) -> RaceResult<MixedResult> {
        options.validate()?;
        let start_profile = options.init.trajectory(options.form, t, self.n())?;
        let mut history = vec![start_profile; options.hist_size];
        if t == 0 {
            return Ok(MixedResult::new(history, vec![0.; self.n()], 0));
        }
        log::info!(
            "solving mixed strategies for {} players over {} periods ({} profiles, {})",
            self.n(),
            t,
            options.hist_size,
            options.form
        );
        let ref mut rng = SmallRng::seed_from_u64(options.init.seed());
        let start = Instant::now();
        let mut rounds = 0;
        while rounds < options.max_iters {
            if options.time_limit.is_some_and(|limit| start.elapsed() >= limit) {
                log::warn!("time limit reached after {} rounds", rounds);
                break;
            }
            rounds += 1;
            for slot in 0..history.len() {
                let ref fresh = InitGuess::scatter(rng, options.form, t, self.n())?;
                let profiles = history.iter().map(Vec::as_slice).collect::<Vec<_>>();
                let next = self.respond(&profiles, fresh, options)?;
                history[slot] = next;
            }
            log::debug!("round {:>4} | {:.6?}", rounds, self.expected(&history)?);
        }
        let utility = self.expected(&history)?;
        log::info!(
            "mixed strategies after {} rounds in {:.2?}",
            rounds,
            start.elapsed()
        );
        Ok(MixedResult::new(history, utility, rounds))
    }

    /// Each player's utility averaged over a history of trajectories.
    fn expected(&self, history: &[Vec<Actions>]) -> RaceResult<Vec<Utility>> {
        let mut total = vec![0.; self.n()];
        for seq in history {
            for (sum, u) in total.iter_mut().zip(self.u(seq)?) {
                *sum += u;
            }
        }
        Ok(total.into_iter().map(|u| u / history.len() as f64).collect())
    }

    /// Everyone's best response to `profiles`, searched from `start` and
    /// assembled into the next profile.
    fn respond(
        &self,
        profiles: &[&[Actions]],
        start: &[Actions],
        options: &SolverOptions,
    ) -> RaceResult<Vec<Actions>> {
        let rows = if options.parallel {
            (0..self.n())
                .into_par_iter()
                .map(|i| self.best_response(i, profiles, start, options))
                .collect::<RaceResult<Vec<_>>>()?
        } else {
            (0..self.n())
                .map(|i| self.best_response(i, profiles, start, options))
                .collect::<RaceResult<Vec<_>>>()?
        };
        let w = options.form.width();
        (0..start.len())
            .map(|t| {
                let data = rows
                    .iter()
                    .flat_map(|row| row[t * w..(t + 1) * w].iter().copied())
                    .collect();
                Actions::from_rows(options.form, data)
            })
            .collect()
    }

    /// Player i's trajectory (period-major) maximizing its mean utility
    /// against `profiles`, with the simplex built around its row of `start`.
    fn best_response(
        &self,
        player: usize,
        profiles: &[&[Actions]],
        start: &[Actions],
        options: &SolverOptions,
    ) -> RaceResult<Vec<f64>> {
        let ref base = start
            .iter()
            .flat_map(|a| a.row(player).iter().map(|x| x.max(f64::MIN_POSITIVE).ln()))
            .collect::<Vec<_>>();
        let simplex = Self::simplex(base, options.simplex.size);
        let problem = BestResponse {
            aggregator: self,
            player,
            profiles,
            form: options.form,
        };
        let solver = NelderMead::new(simplex).with_sd_tolerance(options.simplex.tol)?;
        let res = Executor::new(problem, solver)
            .configure(|state| state.max_iters(options.simplex.iters))
            .run()?;
        let best = res
            .state()
            .get_best_param()
            .cloned()
            .ok_or_else(|| RaceError::Backend(format!("no best response for player {}", player)))?;
        Ok(best.into_iter().map(f64::exp).collect())
    }

    /// Base point plus one vertex offset along each axis.
    fn simplex(base: &[f64], size: f64) -> Vec<Vec<f64>> {
        (0..base.len())
            .map(|k| {
                let mut vertex = base.to_vec();
                vertex[k] += size;
                vertex
            })
            .chain(std::iter::once(base.to_vec()))
            .collect()
    }

    /// Largest relative change in any player's utility.
    fn change(last: &[Utility], next: &[Utility]) -> f64 {
        last.iter()
            .zip(next.iter())
            .map(|(a, b)| (b - a).abs() / f64::max(a.abs(), SOLVER_ABS_TOLERANCE))
            .fold(0., f64::max)
    }
}
