//! Race Binary
//!
//! Solves the reference race problems with default parameters.
//!
//! Options: --basic, --invest, --end-on-win, --invest-end-on-win, --mixed, --scenario, --all

use clap::Parser;
use dynarace::*;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Equilibrium strategies for dynamic safety races", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 2, help = "number of players")]
    n: usize,
    #[arg(long, default_value_t = 5, help = "number of periods")]
    t: usize,
    #[arg(long, help = "solve the basic problem")]
    basic: bool,
    #[arg(long, help = "solve the problem with investment")]
    invest: bool,
    #[arg(long, help = "solve the basic problem, ending on a win")]
    end_on_win: bool,
    #[arg(long, help = "solve the investment problem, ending on a win")]
    invest_end_on_win: bool,
    #[arg(long, help = "solve the basic problem in mixed strategies")]
    mixed: bool,
    #[arg(long, default_value_t = MIXED_HIST_SIZE, help = "profiles kept in a mixed strategy")]
    hist_size: usize,
    #[arg(long, default_value_t = 10, help = "rounds of the mixed-strategy solver")]
    mixed_iters: usize,
    #[arg(long, help = "solve several investment problems in parallel")]
    scenario: bool,
    #[arg(long, help = "run everything")]
    all: bool,
    #[arg(long, help = "print results as JSON")]
    json: bool,
}

/// Default parameters shared by every demo problem.
struct Demo {
    n: usize,
    t: usize,
    json: bool,
    gammas: Vec<f64>,
}

impl Demo {
    fn new(args: &Args) -> RaceResult<Self> {
        if args.n == 0 {
            return Err(RaceError::config("need at least one player"));
        }
        let gammas = match args.n {
            1 => vec![0.1],
            n => (0..n).map(|i| 0.1 + 0.8 * i as f64 / (n - 1) as f64).collect(),
        };
        Ok(Self {
            n: args.n,
            t: args.t,
            json: args.json,
            gammas,
        })
    }

    fn production(&self) -> RaceResult<Production> {
        Production::symmetric(self.n, 10., 0.5, 1., 0.5)
    }

    fn risk(&self, theta: f64) -> RaceResult<Risk> {
        Risk::winner_only(vec![theta; self.n])
    }

    fn basic(&self, end_on_win: bool) -> RaceResult<Aggregator> {
        let payoff = PayoffFunc::new(
            self.production()?,
            self.risk(0.5)?,
            Csf::default(),
            Reward::default_for(self.n)?,
            Cost::fixed(vec![0.1; self.n])?,
        )?
        .with_disaster(vec![1.; self.n])?;
        Ok(Aggregator::new(payoff, self.gammas.clone())?.with_end_on_win(end_on_win))
    }

    fn invest_payoff(&self, theta: f64) -> RaceResult<PayoffFunc> {
        PayoffFunc::new(
            self.production()?,
            self.risk(theta)?,
            Csf::maybe_no_win(1.)?,
            Reward::default_for(self.n)?,
            Cost::fixed_invest(vec![0.1; self.n], vec![0.01; self.n])?,
        )?
        .with_disaster(vec![1.; self.n])
    }

    fn invest(&self, end_on_win: bool) -> RaceResult<Aggregator> {
        Ok(Aggregator::new(self.invest_payoff(0.5)?, self.gammas.clone())?.with_end_on_win(end_on_win))
    }

    fn run(&self, name: &str, agg: &Aggregator, form: Form) -> RaceResult<()> {
        log::info!("solving {} with {} players and {} periods", name, self.n, self.t);
        let start = Instant::now();
        let options = SolverOptions::default()
            .with_form(form)
            .with_best_effort(true);
        let res = agg.solve_with(self.t, &options)?;
        log::info!("solved {} in {:.3?}", name, start.elapsed());
        self.show(name, &res)?;
        println!("payoff at optimum: {:?}", agg.u(res.optimum())?);
        if agg.end_on_win() {
            println!("believed probability of reaching each period:");
            for (t, row) in agg.probas(res.optimum())?.iter().enumerate() {
                println!("t = {:>3} | {:.4?}", t, row);
            }
        }
        println!();
        Ok(())
    }

    fn mixed(&self, agg: &Aggregator, hist_size: usize, iters: usize) -> RaceResult<()> {
        log::info!("solving mixed strategies over {} profiles", hist_size);
        let start = Instant::now();
        let options = SolverOptions::default()
            .with_hist_size(hist_size)
            .with_max_iters(iters);
        let res = agg.solve_mixed(self.t, &options)?;
        log::info!("solved mixed strategies in {:.3?}", start.elapsed());
        if self.json {
            let json = serde_json::to_string_pretty(&res).map_err(|e| RaceError::Backend(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("mixed strategies:\n{}", res);
        }
        Ok(())
    }

    fn scenario(&self) -> RaceResult<()> {
        let payoffs = PayoffFunc::expand_from(
            &[self.production()?],
            &[self.risk(0.5)?, self.risk(1.)?],
            &[Csf::maybe_no_win(1.)?],
            &[Reward::default_for(self.n)?],
            &[Cost::fixed_invest(vec![0.1; self.n], vec![0.01; self.n])?],
        )?
        .into_iter()
        .map(|payoff| payoff.with_disaster(vec![1.; self.n]))
        .collect::<RaceResult<Vec<_>>>()?;
        let aggs = Aggregator::expand_from(&payoffs, &[self.gammas.clone()], false)?;
        let options = SolverOptions::default()
            .with_form(Form::Invest)
            .with_best_effort(true);
        let start = Instant::now();
        let batch = Scenario::new(aggs)?.solve_with(self.t, &options)?;
        log::info!("solved scenario in {:.3?}", start.elapsed());
        for (i, res) in batch.into_results()?.iter().enumerate() {
            self.show(&format!("problem {}", i + 1), res)?;
        }
        Ok(())
    }

    fn show(&self, name: &str, res: &SolverResult) -> RaceResult<()> {
        if self.json {
            let json = serde_json::to_string_pretty(res).map_err(|e| RaceError::Backend(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("optimal {}:\n{}", name, res);
        }
        Ok(())
    }
}

fn main() {
    log();
    let ref args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> RaceResult<()> {
    let demo = Demo::new(args)?;
    if args.basic || args.all {
        demo.run("strategies", &demo.basic(false)?, Form::Basic)?;
    }
    if args.invest || args.all {
        demo.run("invest strategies", &demo.invest(false)?, Form::Invest)?;
    }
    if args.end_on_win || args.all {
        demo.run("strategies (end-on-win)", &demo.basic(true)?, Form::Basic)?;
    }
    if args.invest_end_on_win || args.all {
        demo.run("invest strategies (end-on-win)", &demo.invest(true)?, Form::Invest)?;
    }
    if args.mixed || args.all {
        demo.mixed(&demo.basic(false)?, args.hist_size, args.mixed_iters)?;
    }
    if args.scenario || args.all {
        demo.scenario()?;
    }
    Ok(())
}
