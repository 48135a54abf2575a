//! Accuracy records attached to numerically computed results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How much a computed value can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyLevel {
    /// Exact (up to floating point).
    Exact,
    /// Guaranteed within the error bound.
    Bounded,
    /// Heuristically within the error bound.
    EstimatedBounded,
    /// Statistically within the error bound.
    Probably,
}

/// Error bound of a computed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracy {
    pub level: AccuracyLevel,
    pub error_bound: f64,
    /// Whether `error_bound` is absolute (otherwise relative).
    pub absolute: bool,
}

impl Accuracy {
    pub fn exact() -> Self {
        Self {
            level: AccuracyLevel::Exact,
            error_bound: 0.0,
            absolute: true,
        }
    }

    pub fn bounded(level: AccuracyLevel, error_bound: f64, absolute: bool) -> Self {
        Self {
            level,
            error_bound,
            absolute,
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.absolute { "" } else { " relative" };
        match self.level {
            AccuracyLevel::Exact => write!(f, "exact"),
            AccuracyLevel::Bounded => write!(f, "+/- {:e}{}", self.error_bound, kind),
            AccuracyLevel::EstimatedBounded => {
                write!(f, "+/- {:e}{} estimated", self.error_bound, kind)
            }
            AccuracyLevel::Probably => {
                write!(f, "+/- {:e}{} with high probability", self.error_bound, kind)
            }
        }
    }
}
