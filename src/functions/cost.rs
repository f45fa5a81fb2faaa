use crate::Utility;
use crate::actions::*;
use crate::error::*;

/// Per-player cost of a period's actions. Rates are non-negative, so costs
/// are non-negative for any valid [`Actions`].
#[derive(Debug, Clone, PartialEq)]
pub enum Cost {
    /// `r * (xs + xp + inv_s + inv_p)`: every unit of spend at one rate.
    Fixed { r: Vec<f64> },
    /// `r * (xs + xp) + r_inv * (inv_s + inv_p)`
    FixedInvest { r: Vec<f64>, r_inv: Vec<f64> },
    /// `r * (xs + xp) + r_inv * max(inv_s, inv_p) + r_share * min(inv_s, inv_p)`
    ///
    /// Both investment lines draw on one budget: the larger line pays the
    /// full investment rate and the smaller rides along at `r_share <= r_inv`.
    FixedSharing {
        r: Vec<f64>,
        r_inv: Vec<f64>,
        r_share: Vec<f64>,
    },
}

impl Cost {
    pub fn fixed(r: Vec<f64>) -> RaceResult<Self> {
        check_lengths("Cost::fixed", &[r.len()])?;
        check_rates("Cost::fixed r", &r)?;
        Ok(Self::Fixed { r })
    }

    pub fn fixed_invest(r: Vec<f64>, r_inv: Vec<f64>) -> RaceResult<Self> {
        check_lengths("Cost::fixed_invest", &[r.len(), r_inv.len()])?;
        check_rates("Cost::fixed_invest r", &r)?;
        check_rates("Cost::fixed_invest r_inv", &r_inv)?;
        Ok(Self::FixedInvest { r, r_inv })
    }

    pub fn fixed_sharing(r: Vec<f64>, r_inv: Vec<f64>, r_share: Vec<f64>) -> RaceResult<Self> {
        check_lengths("Cost::fixed_sharing", &[r.len(), r_inv.len(), r_share.len()])?;
        check_rates("Cost::fixed_sharing r", &r)?;
        check_rates("Cost::fixed_sharing r_inv", &r_inv)?;
        check_rates("Cost::fixed_sharing r_share", &r_share)?;
        if r_share.iter().zip(r_inv.iter()).any(|(s, i)| s > i) {
            return Err(RaceError::config(
                "Cost::fixed_sharing: sharing rate cannot exceed the investment rate",
            ));
        }
        Ok(Self::FixedSharing { r, r_inv, r_share })
    }

    pub fn n(&self) -> usize {
        match self {
            Self::Fixed { r } => r.len(),
            Self::FixedInvest { r, .. } => r.len(),
            Self::FixedSharing { r, .. } => r.len(),
        }
    }

    /// Cost of player i; callers check the player count first, as `c` does.
    pub(crate) fn c_i(&self, i: usize, actions: &Actions) -> Utility {
        let effort = actions.xs(i) + actions.xp(i);
        let (inv_s, inv_p) = (actions.inv_s(i), actions.inv_p(i));
        match self {
            Self::Fixed { r } => r[i] * (effort + inv_s + inv_p),
            Self::FixedInvest { r, r_inv } => r[i] * effort + r_inv[i] * (inv_s + inv_p),
            Self::FixedSharing { r, r_inv, r_share } => {
                r[i] * effort
                    + r_inv[i] * f64::max(inv_s, inv_p)
                    + r_share[i] * f64::min(inv_s, inv_p)
            }
        }
    }

    pub fn c(&self, actions: &Actions) -> RaceResult<Vec<Utility>> {
        if actions.n() != self.n() {
            return Err(RaceError::domain(format!(
                "Cost for {} players evaluated on {} actions",
                self.n(),
                actions.n()
            )));
        }
        Ok((0..self.n()).map(|i| self.c_i(i, actions)).collect())
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fixed { r } => write!(f, "CostFunc (Fixed): r = {:?}", r),
            Self::FixedInvest { r, r_inv } => {
                write!(f, "CostFunc (FixedInvest): r = {:?}, r_inv = {:?}", r, r_inv)
            }
            Self::FixedSharing { r, r_inv, r_share } => write!(
                f,
                "CostFunc (FixedSharing): r = {:?}, r_inv = {:?}, r_share = {:?}",
                r, r_inv, r_share
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invest() -> Actions {
        Actions::invest(vec![1., 0.], vec![2., 0.], vec![3., 0.], vec![4., 0.]).unwrap()
    }

    #[test]
    fn fixed_charges_everything() {
        let c = Cost::fixed(vec![0.5; 2]).unwrap();
        assert_eq!(c.c(&invest()).unwrap(), vec![5., 0.]);
        let basic = Actions::basic(vec![1., 2.], vec![3., 4.]).unwrap();
        assert_eq!(c.c(&basic).unwrap(), vec![2., 3.]);
    }

    #[test]
    fn fixed_invest_separates_rates() {
        let c = Cost::fixed_invest(vec![1.; 2], vec![0.5; 2]).unwrap();
        assert_eq!(c.c(&invest()).unwrap(), vec![3. + 3.5, 0.]);
    }

    #[test]
    fn fixed_sharing_discounts_smaller_line() {
        let c = Cost::fixed_sharing(vec![1.; 2], vec![1.; 2], vec![0.25; 2]).unwrap();
        assert_eq!(c.c(&invest()).unwrap(), vec![3. + 4. + 0.75, 0.]);
        let full = Cost::fixed_invest(vec![1.; 2], vec![1.; 2]).unwrap();
        assert!(c.c_i(0, &invest()) <= full.c_i(0, &invest()));
    }

    #[test]
    fn never_negative() {
        let costs = [
            Cost::fixed(vec![0.1; 2]).unwrap(),
            Cost::fixed_invest(vec![0.1; 2], vec![0.; 2]).unwrap(),
            Cost::fixed_sharing(vec![0.; 2], vec![0.2; 2], vec![0.2; 2]).unwrap(),
        ];
        for c in costs.iter() {
            assert!(c.c(&invest()).unwrap().iter().all(|x| *x >= 0.));
        }
    }

    #[test]
    fn rejects_negative_rates() {
        assert!(Cost::fixed(vec![-0.1]).is_err());
        assert!(Cost::fixed_invest(vec![0.1], vec![-0.1]).is_err());
        assert!(Cost::fixed_invest(vec![0.1; 2], vec![0.1]).is_err());
        assert!(Cost::fixed_sharing(vec![0.1], vec![0.1], vec![0.2]).is_err());
    }
}
