use serde::Deserialize;
use serde::Serialize;

/// Which components a player chooses each period.
///
/// - `Basic`: (safety effort, performance effort)
/// - `Invest`: adds (safety investment, performance investment)
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Form {
    #[default]
    Basic,
    Invest,
}

impl Form {
    /// number of components per player row
    pub const fn width(&self) -> usize {
        match self {
            Self::Basic => 2,
            Self::Invest => 4,
        }
    }
    pub const fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::Basic => &["xs", "xp"],
            Self::Invest => &["xs", "xp", "inv_s", "inv_p"],
        }
    }
}

impl std::fmt::Display for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "Actions"),
            Self::Invest => write!(f, "InvestActions"),
        }
    }
}
