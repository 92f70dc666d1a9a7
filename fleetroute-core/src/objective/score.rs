//! Two-level hard/soft score.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lexicographic score: any hard improvement beats any soft improvement.
///
/// Both levels are penalties, so `0` is the best attainable hard score and
/// higher (less negative) is better on both levels.
///
/// # Examples
/// ```
/// use fleetroute_core::Score;
///
/// let infeasible = Score::new(-1, 0);
/// let expensive = Score::new(0, -5_000_000);
/// assert!(expensive > infeasible);
/// assert!(expensive.is_feasible());
/// assert_eq!(infeasible.to_string(), "-1hard/0soft");
/// assert_eq!("-1hard/0soft".parse::<Score>(), Ok(infeasible));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub struct Score {
    /// Constraint violations; `0` when feasible.
    pub hard: i64,
    /// Cost to minimise among feasible solutions.
    pub soft: i64,
}

impl Score {
    /// The neutral score.
    pub const ZERO: Self = Self::new(0, 0);

    /// Construct a score.
    #[must_use]
    pub const fn new(hard: i64, soft: i64) -> Self {
        Self { hard, soft }
    }

    /// Whether no hard constraint is broken.
    #[must_use]
    pub const fn is_feasible(&self) -> bool {
        self.hard == 0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}hard/{}soft", self.hard, self.soft)
    }
}

/// Error returned when text is not of the form `"{hard}hard/{soft}soft"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid score {input:?}; expected \"<hard>hard/<soft>soft\"")]
pub struct ParseScoreError {
    input: String,
}

impl FromStr for Score {
    type Err = ParseScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseScoreError {
            input: s.to_owned(),
        };
        let (hard_part, soft_part) = s.trim().split_once('/').ok_or_else(invalid)?;
        let hard = hard_part.strip_suffix("hard").ok_or_else(invalid)?;
        let soft = soft_part.strip_suffix("soft").ok_or_else(invalid)?;
        Ok(Self::new(
            hard.parse().map_err(|_| invalid())?,
            soft.parse().map_err(|_| invalid())?,
        ))
    }
}

impl From<Score> for String {
    fn from(score: Score) -> Self {
        score.to_string()
    }
}

impl TryFrom<String> for Score {
    type Error = ParseScoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.hard.saturating_add(rhs.hard),
            self.soft.saturating_add(rhs.soft),
        )
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Score {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.hard.saturating_sub(rhs.hard),
            self.soft.saturating_sub(rhs.soft),
        )
    }
}

impl Neg for Score {
    type Output = Self;

    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl std::iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
