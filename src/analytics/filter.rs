//! Play filters and the predicate they compile to.
//!
//! Every supplied filter becomes one independent clause; a play passes the
//! predicate when it passes every clause. With no filters the predicate is
//! the identity and accepts every play.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{Down, PlayRecord, PlayResult};

/// Field-position bucket derived from the yard line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldPosition {
    /// Yard line <= 20
    RedZone,
    /// 20 < yard line < 80
    Midfield,
    /// Yard line >= 80
    BackedUp,
}

impl FieldPosition {
    /// The single bucket a yard line falls into.
    pub fn of_yard_line(yard_line: u8) -> Self {
        if yard_line <= 20 {
            FieldPosition::RedZone
        } else if yard_line >= 80 {
            FieldPosition::BackedUp
        } else {
            FieldPosition::Midfield
        }
    }

    pub fn contains(&self, yard_line: u8) -> bool {
        match self {
            FieldPosition::RedZone => yard_line <= 20,
            FieldPosition::Midfield => yard_line > 20 && yard_line < 80,
            FieldPosition::BackedUp => yard_line >= 80,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldPosition::RedZone => "redZone",
            FieldPosition::Midfield => "midfield",
            FieldPosition::BackedUp => "backedUp",
        }
    }
}

impl FromStr for FieldPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            FieldPosition::RedZone,
            FieldPosition::Midfield,
            FieldPosition::BackedUp,
        ]
        .into_iter()
        .find(|b| b.as_str() == s)
        .ok_or_else(|| format!("unknown field position {:?} (expected redZone, midfield or backedUp)", s))
    }
}

/// Inclusive yards-to-go range; either bound may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceRange {
    pub gte: Option<u32>,
    pub lte: Option<u32>,
}

impl DistanceRange {
    pub fn is_unbounded(&self) -> bool {
        self.gte.is_none() && self.lte.is_none()
    }

    /// Whether both bounds are present and cannot be satisfied together.
    pub fn is_inverted(&self) -> bool {
        matches!((self.gte, self.lte), (Some(lo), Some(hi)) if lo > hi)
    }
}

/// The closed set of filters a tendency query accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayFilter {
    pub down: Option<Down>,
    #[serde(default)]
    pub distance: DistanceRange,
    pub formation: Option<String>,
    pub field_position: Option<FieldPosition>,
    pub play_result: Option<PlayResult>,
}

type Clause = Box<dyn Fn(&PlayRecord) -> bool + Send + Sync>;

/// Conjunction of independent play clauses.
pub struct PlayPredicate {
    clauses: Vec<Clause>,
}

impl PlayPredicate {
    /// The predicate that accepts every play.
    pub fn identity() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Add one more clause to the conjunction.
    pub fn and<F>(mut self, clause: F) -> Self
    where
        F: Fn(&PlayRecord) -> bool + Send + Sync + 'static,
    {
        self.clauses.push(Box::new(clause));
        self
    }

    /// Add `make(value)` as a clause when a value is supplied.
    fn and_some<T, F, C>(self, value: Option<T>, make: F) -> Self
    where
        F: FnOnce(T) -> C,
        C: Fn(&PlayRecord) -> bool + Send + Sync + 'static,
    {
        match value {
            Some(v) => self.and(make(v)),
            None => self,
        }
    }

    pub fn matches(&self, play: &PlayRecord) -> bool {
        self.clauses.iter().all(|clause| clause(play))
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// Keep only the plays that satisfy every clause, preserving order.
    pub fn apply(&self, plays: Vec<PlayRecord>) -> Vec<PlayRecord> {
        plays.into_iter().filter(|p| self.matches(p)).collect()
    }
}

impl PlayFilter {
    pub fn is_empty(&self) -> bool {
        self.down.is_none()
            && self.distance.is_unbounded()
            && self.formation.is_none()
            && self.field_position.is_none()
            && self.play_result.is_none()
    }

    /// Compile the filter into a predicate. A null attribute never satisfies
    /// a filter on that attribute.
    pub fn predicate(&self) -> PlayPredicate {
        PlayPredicate::identity()
            .and_some(self.down, |down| {
                move |p: &PlayRecord| p.down == Some(down)
            })
            .and_some(self.distance.gte, |lo| {
                move |p: &PlayRecord| p.distance.is_some_and(|d| d >= lo)
            })
            .and_some(self.distance.lte, |hi| {
                move |p: &PlayRecord| p.distance.is_some_and(|d| d <= hi)
            })
            .and_some(self.formation.clone(), |formation| {
                move |p: &PlayRecord| p.formation.as_deref() == Some(formation.as_str())
            })
            .and_some(self.field_position, |bucket| {
                move |p: &PlayRecord| p.yard_line.is_some_and(|y| bucket.contains(y))
            })
            .and_some(self.play_result, |result| {
                move |p: &PlayRecord| p.play_result == Some(result)
            })
    }
}
