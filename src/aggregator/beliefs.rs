use crate::error::*;
use crate::payoff::*;

/// What each player believes the single-period payoff to be.
#[derive(Debug, Clone, PartialEq)]
pub enum Beliefs {
    /// everyone agrees
    Common(PayoffFunc),
    /// player i evaluates every period with the i-th payoff function
    Heterogeneous(Vec<PayoffFunc>),
}

impl Beliefs {
    pub fn heterogeneous(payoffs: Vec<PayoffFunc>) -> RaceResult<Self> {
        let n = check_lengths("Beliefs", &[payoffs.len()])?;
        if let Some(bad) = payoffs.iter().find(|p| p.n() != n) {
            return Err(RaceError::config(format!(
                "Beliefs: {} players but one belief covers {}",
                n,
                bad.n()
            )));
        }
        Ok(Self::Heterogeneous(payoffs))
    }

    pub fn n(&self) -> usize {
        match self {
            Self::Common(payoff) => payoff.n(),
            Self::Heterogeneous(payoffs) => payoffs.len(),
        }
    }

    /// the payoff function player i evaluates with
    pub fn of(&self, i: usize) -> &PayoffFunc {
        match self {
            Self::Common(payoff) => payoff,
            Self::Heterogeneous(payoffs) => &payoffs[i],
        }
    }

    pub fn is_common(&self) -> bool {
        matches!(self, Self::Common(_))
    }
}

impl From<PayoffFunc> for Beliefs {
    fn from(payoff: PayoffFunc) -> Self {
        Self::Common(payoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::*;

    fn payoff(n: usize) -> PayoffFunc {
        PayoffFunc::new(
            Production::symmetric(n, 10., 0.5, 1., 0.5).unwrap(),
            Risk::winner_only(vec![0.5; n]).unwrap(),
            Csf::default(),
            Reward::default_for(n).unwrap(),
            Cost::fixed(vec![0.1; n]).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn one_belief_per_player() {
        assert!(Beliefs::heterogeneous(vec![payoff(2), payoff(2)]).is_ok());
        assert!(Beliefs::heterogeneous(vec![payoff(2), payoff(2), payoff(2)]).is_err());
        assert!(Beliefs::heterogeneous(vec![]).is_err());
    }

    #[test]
    fn common_belief_is_shared() {
        let beliefs = Beliefs::from(payoff(3));
        assert_eq!(beliefs.n(), 3);
        assert_eq!(beliefs.of(0), beliefs.of(2));
        assert!(beliefs.is_common());
    }
}
