use super::*;
use crate::error::*;
use serde::Deserialize;
use serde::Serialize;

/// Immutable per-period action profile, one row per player.
///
/// Rows are stored contiguously (row-major, `form.width()` values each).
/// Every component is finite and non-negative; constructors reject anything
/// else. Replacing a player's row produces a new profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actions {
    form: Form,
    data: Vec<f64>,
}

impl Actions {
    /// (safety effort, performance effort) per player.
    pub fn basic(xs: Vec<f64>, xp: Vec<f64>) -> RaceResult<Self> {
        check_lengths("Actions", &[xs.len(), xp.len()])?;
        let data = xs
            .into_iter()
            .zip(xp)
            .flat_map(|(s, p)| [s, p])
            .collect();
        Self::from_rows(Form::Basic, data)
    }

    /// effort plus (safety investment, performance investment) per player.
    pub fn invest(xs: Vec<f64>, xp: Vec<f64>, inv_s: Vec<f64>, inv_p: Vec<f64>) -> RaceResult<Self> {
        check_lengths(
            "InvestActions",
            &[xs.len(), xp.len(), inv_s.len(), inv_p.len()],
        )?;
        let data = xs
            .into_iter()
            .zip(xp)
            .zip(inv_s)
            .zip(inv_p)
            .flat_map(|(((s, p), i), j)| [s, p, i, j])
            .collect();
        Self::from_rows(Form::Invest, data)
    }

    /// every component of every player set to `value`
    pub fn uniform(form: Form, n: usize, value: f64) -> RaceResult<Self> {
        Self::from_rows(form, vec![value; n * form.width()])
    }

    /// Build from row-major data: player i occupies `data[i * width..(i + 1) * width]`.
    pub fn from_rows(form: Form, data: Vec<f64>) -> RaceResult<Self> {
        if data.is_empty() || data.len() % form.width() != 0 {
            return Err(RaceError::config(format!(
                "{}: {} values do not form rows of width {}",
                form,
                data.len(),
                form.width()
            )));
        }
        check_rates("Actions", &data)?;
        Ok(Self { form, data })
    }

    pub fn form(&self) -> Form {
        self.form
    }
    pub fn n(&self) -> usize {
        self.data.len() / self.form.width()
    }
    pub fn data(&self) -> &[f64] {
        &self.data
    }
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.form.width();
        &self.data[i * w..(i + 1) * w]
    }

    /// New profile with player i's row replaced.
    pub fn with_row(&self, i: usize, row: &[f64]) -> RaceResult<Self> {
        if i >= self.n() || row.len() != self.form.width() {
            return Err(RaceError::domain(format!(
                "cannot place a row of width {} at player {} of {}",
                row.len(),
                i,
                self.n()
            )));
        }
        check_rates("Actions", row)?;
        let w = self.form.width();
        let mut data = self.data.clone();
        data[i * w..(i + 1) * w].copy_from_slice(row);
        Ok(Self { form: self.form, data })
    }

    pub fn xs(&self, i: usize) -> f64 {
        self.row(i)[0]
    }
    pub fn xp(&self, i: usize) -> f64 {
        self.row(i)[1]
    }
    /// zero for basic profiles
    pub fn inv_s(&self, i: usize) -> f64 {
        self.row(i).get(2).copied().unwrap_or(0.)
    }
    /// zero for basic profiles
    pub fn inv_p(&self, i: usize) -> f64 {
        self.row(i).get(3).copied().unwrap_or(0.)
    }

    /// Total spend on both tracks, effort and investment.
    pub fn total(&self, i: usize) -> f64 {
        self.row(i).iter().sum()
    }

    /// Values of one component across players.
    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.n()).map(|i| self.row(i)[j]).collect()
    }
}

impl std::fmt::Display for Actions {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:", self.form)?;
        for (j, label) in self.form.labels().iter().enumerate() {
            write!(f, " {} = {:.4?}", label, self.column(j))?;
        }
        Ok(())
    }
}
