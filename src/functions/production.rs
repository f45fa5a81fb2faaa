use crate::actions::*;
use crate::error::*;

/// Per-player (safety, performance) output for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct Outputs {
    pub safety: Vec<f64>,
    pub performance: Vec<f64>,
}

impl Outputs {
    pub fn n(&self) -> usize {
        self.safety.len()
    }
}

/// Two-factor diminishing-returns production:
///
/// ```text
/// s_i = a_i * (xs_i + K^s_i)^alpha_i
/// p_i = b_i * (xp_i + K^p_i)^beta_i
/// ```
///
/// with `alpha, beta` in (0, 1] and `a, b >= 0`. Zero effective effort is
/// exactly zero output.
#[derive(Debug, Clone, PartialEq)]
pub struct Production {
    a: Vec<f64>,
    alpha: Vec<f64>,
    b: Vec<f64>,
    beta: Vec<f64>,
}

impl Production {
    pub fn new(a: Vec<f64>, alpha: Vec<f64>, b: Vec<f64>, beta: Vec<f64>) -> RaceResult<Self> {
        check_lengths("Production", &[a.len(), alpha.len(), b.len(), beta.len()])?;
        check_rates("Production scale a", &a)?;
        check_rates("Production scale b", &b)?;
        if let Some(x) = alpha
            .iter()
            .chain(beta.iter())
            .find(|x| !(**x > 0. && **x <= 1.))
        {
            return Err(RaceError::config(format!(
                "Production: exponents must lie in (0, 1], found {}",
                x
            )));
        }
        Ok(Self { a, alpha, b, beta })
    }

    /// identical parameters for every player
    pub fn symmetric(n: usize, a: f64, alpha: f64, b: f64, beta: f64) -> RaceResult<Self> {
        Self::new(vec![a; n], vec![alpha; n], vec![b; n], vec![beta; n])
    }

    pub fn n(&self) -> usize {
        self.a.len()
    }

    /// (safety, performance) output of player i; callers check the player
    /// count first, as `f` does.
    pub(crate) fn f_i(&self, i: usize, actions: &Actions, stock: &Stock) -> (f64, f64) {
        (
            Self::power(self.a[i], actions.xs(i) + stock.s(i), self.alpha[i]),
            Self::power(self.b[i], actions.xp(i) + stock.p(i), self.beta[i]),
        )
    }

    pub fn f(&self, actions: &Actions, stock: &Stock) -> RaceResult<Outputs> {
        if actions.n() != self.n() || stock.n() != self.n() {
            return Err(RaceError::domain(format!(
                "Production for {} players evaluated on {} actions / {} stocks",
                self.n(),
                actions.n(),
                stock.n()
            )));
        }
        let (safety, performance) = (0..self.n()).map(|i| self.f_i(i, actions, stock)).unzip();
        Ok(Outputs {
            safety,
            performance,
        })
    }

    fn power(scale: f64, x: f64, exponent: f64) -> f64 {
        if x == 0. { 0. } else { scale * x.powf(exponent) }
    }
}

impl std::fmt::Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Production {{ a = {:?}, alpha = {:?}, b = {:?}, beta = {:?} }}",
            self.a, self.alpha, self.b, self.beta
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prod() -> Production {
        Production::symmetric(2, 10., 0.5, 1., 0.5).unwrap()
    }

    fn assert_close(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-12), "{:?} != {:?}", a, b);
    }

    #[test]
    fn zero_effort_is_zero_output() {
        let actions = Actions::uniform(Form::Basic, 2, 0.).unwrap();
        let out = prod().f(&actions, &Stock::zeros(2)).unwrap();
        assert_eq!(out.safety, vec![0., 0.]);
        assert_eq!(out.performance, vec![0., 0.]);
    }

    #[test]
    fn known_values() {
        let actions = Actions::basic(vec![4., 1.], vec![9., 0.25]).unwrap();
        let out = prod().f(&actions, &Stock::zeros(2)).unwrap();
        assert_close(&out.safety, &[20., 10.]);
        assert_close(&out.performance, &[3., 0.5]);
    }

    #[test]
    fn monotone_in_effort() {
        let p = prod();
        let stock = Stock::zeros(2);
        let mut last = (0., 0.);
        for x in [0., 1e-6, 0.01, 0.5, 1., 2., 10., 1e6] {
            let actions = Actions::uniform(Form::Basic, 2, x).unwrap();
            let next = p.f_i(0, &actions, &stock);
            assert!(next.0 >= last.0 && next.1 >= last.1);
            last = next;
        }
    }

    #[test]
    fn stock_adds_to_effort() {
        let p = prod();
        let invest = Actions::invest(vec![0., 0.], vec![0., 0.], vec![4., 0.], vec![1., 0.]).unwrap();
        let stock = Stock::zeros(2).advance(&invest, &[0., 0.]).unwrap();
        let idle = Actions::uniform(Form::Invest, 2, 0.).unwrap();
        let out = p.f(&idle, &stock).unwrap();
        assert_close(&out.safety, &[20., 0.]);
        assert_close(&out.performance, &[1., 0.]);
    }

    #[test]
    fn rejects_bad_exponents() {
        assert!(Production::symmetric(2, 1., 0., 1., 0.5).is_err());
        assert!(Production::symmetric(2, 1., 0.5, 1., -0.5).is_err());
        assert!(Production::symmetric(2, 1., 1.5, 1., 0.5).is_err());
        assert!(Production::symmetric(2, 1., f64::NAN, 1., 0.5).is_err());
    }

    #[test]
    fn rejects_mismatched_parameters() {
        assert!(Production::new(vec![1.; 2], vec![0.5; 3], vec![1.; 2], vec![0.5; 2]).is_err());
        assert!(Production::new(vec![-1.; 2], vec![0.5; 2], vec![1.; 2], vec![0.5; 2]).is_err());
    }

    #[test]
    fn rejects_wrong_player_count() {
        let actions = Actions::uniform(Form::Basic, 3, 1.).unwrap();
        assert!(prod().f(&actions, &Stock::zeros(3)).is_err());
    }
}
