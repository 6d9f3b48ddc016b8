//! Tendency report sections and their assembly.
//!
//! Each section is computed independently from the same filtered play set.
//! Sections exclude null keys on their own terms, so their totals are not
//! expected to agree with one another.

use serde::Serialize;

use super::formation::{FormationReport, PersonnelTable};
use super::group::{count_stats, situational_stats, top_n};
use super::rate::{blitz_rate, red_zone_rates, third_down_success};
use super::scope::ScopeOverview;
use crate::models::{CountStat, PlayRecord, SituationalStat};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlitzPatterns {
    pub total_plays: u32,
    pub blitz_rate: f64,
    pub top_blitz_types: Vec<CountStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedZonePatterns {
    pub total_plays: u32,
    pub touchdown_rate: f64,
    pub field_goal_rate: f64,
    pub turnover_rate: f64,
    pub top_play_calls: Vec<CountStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdDownSuccessRates {
    pub total_attempts: u32,
    pub conversions: u32,
    pub success_rate: f64,
    pub top_play_calls: Vec<CountStat>,
}

/// What the defense showed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefensiveTendencies {
    pub defensive_front_usage: Vec<SituationalStat>,
    pub personnel_packages: Vec<SituationalStat>,
    pub coverage_tendencies: Vec<CountStat>,
    pub blitz_patterns: BlitzPatterns,
}

/// What the offense called.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffensiveTendencies {
    pub formation_usage: Vec<SituationalStat>,
    pub play_call_tendencies: Vec<CountStat>,
    pub red_zone_patterns: RedZonePatterns,
    pub third_down_success_rates: ThirdDownSuccessRates,
    pub personnel_package_usage: Vec<CountStat>,
}

/// The full tendency report for one scope and filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TendencyReport {
    pub overview: ScopeOverview,
    #[serde(flatten)]
    pub defense: DefensiveTendencies,
    #[serde(flatten)]
    pub offense: OffensiveTendencies,
    #[serde(flatten)]
    pub formations: FormationReport,
}

impl TendencyReport {
    /// Combine independently computed sections. No values are adjusted.
    pub fn assemble(
        overview: ScopeOverview,
        defense: DefensiveTendencies,
        offense: OffensiveTendencies,
        formations: FormationReport,
    ) -> Self {
        Self {
            overview,
            defense,
            offense,
            formations,
        }
    }
}

/// Frequency of each play call.
pub fn play_call_tendencies(plays: &[PlayRecord]) -> Vec<CountStat> {
    count_stats(plays, |p| p.play_call.as_deref())
}

/// Blitz rate over every play, with the `top_n` most used blitz types.
pub fn blitz_patterns(plays: &[PlayRecord], top: usize) -> BlitzPatterns {
    let rate = blitz_rate(plays);
    let blitz_types = count_stats(plays.iter().filter(|p| p.is_blitz()), |p| {
        p.blitz_type.as_deref()
    });

    BlitzPatterns {
        total_plays: plays.len() as u32,
        blitz_rate: rate.rate,
        top_blitz_types: top_n(&blitz_types, top),
    }
}

pub fn red_zone_patterns(plays: &[PlayRecord], top: usize) -> RedZonePatterns {
    let rates = red_zone_rates(plays);
    let play_calls = count_stats(plays.iter().filter(|p| p.is_red_zone()), |p| {
        p.play_call.as_deref()
    });

    RedZonePatterns {
        total_plays: rates.total_plays(),
        touchdown_rate: rates.touchdown.rate,
        field_goal_rate: rates.field_goal.rate,
        turnover_rate: rates.turnover.rate,
        top_play_calls: top_n(&play_calls, top),
    }
}

pub fn third_down_success_rates(plays: &[PlayRecord], top: usize) -> ThirdDownSuccessRates {
    let rate = third_down_success(plays);
    let play_calls = count_stats(plays.iter().filter(|p| p.is_third_down()), |p| {
        p.play_call.as_deref()
    });

    ThirdDownSuccessRates {
        total_attempts: rate.denominator,
        conversions: rate.numerator,
        success_rate: rate.rate,
        top_play_calls: top_n(&play_calls, top),
    }
}

pub fn defensive_tendencies(plays: &[PlayRecord], top: usize) -> DefensiveTendencies {
    DefensiveTendencies {
        defensive_front_usage: situational_stats(plays, |p| p.defensive_front.as_deref()),
        personnel_packages: situational_stats(plays, |p| p.defensive_personnel.as_deref()),
        coverage_tendencies: count_stats(plays, |p| p.coverage_scheme.as_deref()),
        blitz_patterns: blitz_patterns(plays, top),
    }
}

pub fn offensive_tendencies(
    plays: &[PlayRecord],
    top: usize,
    personnel: &PersonnelTable,
) -> OffensiveTendencies {
    OffensiveTendencies {
        formation_usage: situational_stats(plays, |p| p.formation.as_deref()),
        play_call_tendencies: play_call_tendencies(plays),
        red_zone_patterns: red_zone_patterns(plays, top),
        third_down_success_rates: third_down_success_rates(plays, top),
        personnel_package_usage: count_stats(plays, |p| {
            p.formation.as_deref().map(|f| personnel.classify(f))
        }),
    }
}
