//! Derived statistics models.

use serde::{Deserialize, Serialize};

/// Single-dimension frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountStat {
    pub name: String,
    pub count: u32,
}

impl CountStat {
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Two-dimension frequency: an entity broken down by down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationalStat {
    pub name: String,
    pub down: String,
    pub count: u32,
}

impl SituationalStat {
    pub fn new(name: impl Into<String>, down: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            down: down.into(),
            count,
        }
    }
}

/// A ratio together with the counts it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateStat {
    pub numerator: u32,
    pub denominator: u32,
    pub rate: f64,
}

/// `numerator / denominator`, or exactly 0 when the denominator is 0.
pub fn ratio(numerator: f64, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

impl RateStat {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
            rate: ratio(numerator as f64, denominator),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.denominator == 0
    }
}

impl Default for RateStat {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
