//! Formation effectiveness and personnel grouping.
//!
//! Formations are free-text labels, so personnel packages are inferred from
//! the label through an ordered table of `pattern -> label` rules taken from
//! configuration. The first matching rule wins; formations matching no rule
//! fall into the fallback group.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::group::{group_records, order_by_weight_desc};
use crate::models::{ratio, Down, PlayRecord, PlayResult, RateStat};

/// Which plays count as successful for effectiveness metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SuccessRule {
    /// The play gained a first down or scored.
    Outcome,

    /// The play moved the chains or scored, or gained at least the given
    /// share of the yards to go for its down.
    YardageShare {
        #[serde(default = "default_first_down_share")]
        first_down_share: f64,
        #[serde(default = "default_second_down_share")]
        second_down_share: f64,
        #[serde(default = "default_late_down_share")]
        late_down_share: f64,
    },
}

fn default_first_down_share() -> f64 {
    0.5
}

fn default_second_down_share() -> f64 {
    0.7
}

fn default_late_down_share() -> f64 {
    1.0
}

impl Default for SuccessRule {
    fn default() -> Self {
        SuccessRule::Outcome
    }
}

impl SuccessRule {
    /// The yardage-share rule with its default thresholds.
    pub fn yardage_share() -> Self {
        SuccessRule::YardageShare {
            first_down_share: default_first_down_share(),
            second_down_share: default_second_down_share(),
            late_down_share: default_late_down_share(),
        }
    }

    pub fn is_success(&self, play: &PlayRecord) -> bool {
        if play.is_conversion() {
            return true;
        }
        match self {
            SuccessRule::Outcome => false,
            SuccessRule::YardageShare {
                first_down_share,
                second_down_share,
                late_down_share,
            } => match (play.down, play.distance, play.yards_gained) {
                (Some(down), Some(distance), Some(gained)) => {
                    let share = match down {
                        Down::First => first_down_share,
                        Down::Second => second_down_share,
                        Down::Third | Down::Fourth => late_down_share,
                    };
                    gained as f64 >= share * distance as f64
                }
                _ => false,
            },
        }
    }

    /// Shares must be positive and no stricter than 150% of the distance.
    pub fn validate(&self) -> Result<(), String> {
        if let SuccessRule::YardageShare {
            first_down_share,
            second_down_share,
            late_down_share,
        } = self
        {
            for (name, share) in [
                ("first_down_share", first_down_share),
                ("second_down_share", second_down_share),
                ("late_down_share", late_down_share),
            ] {
                if !(*share > 0.0 && *share <= 1.5) {
                    return Err(format!("{} must be in (0, 1.5], got {}", name, share));
                }
            }
        }
        Ok(())
    }
}

/// One formation-name pattern and the personnel label it maps to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelRule {
    pub pattern: String,
    pub label: String,
}

impl PersonnelRule {
    pub fn new(pattern: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            label: label.into(),
        }
    }
}

/// Personnel classification table as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonnelConfig {
    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,

    #[serde(default = "default_personnel_rules")]
    pub rules: Vec<PersonnelRule>,
}

fn default_fallback_label() -> String {
    "Other".to_string()
}

fn default_personnel_rules() -> Vec<PersonnelRule> {
    vec![
        PersonnelRule::new(r"(?i)\bempty\b", "00 Personnel"),
        PersonnelRule::new(r"(?i)\b(goal[ -]?line|jumbo|heavy)\b", "23 Personnel"),
        PersonnelRule::new(r"(?i)\b(i[ -]?form|pro set|power i|split backs?|wishbone)\b", "21 Personnel"),
        PersonnelRule::new(r"(?i)\b(ace|singleback|single back|twin tight)\b", "12 Personnel"),
        PersonnelRule::new(r"(?i)\b(shotgun|gun|pistol|trips|spread|bunch|doubles)\b", "11 Personnel"),
    ]
}

impl Default for PersonnelConfig {
    fn default() -> Self {
        Self {
            fallback_label: default_fallback_label(),
            rules: default_personnel_rules(),
        }
    }
}

/// Compiled personnel classification table.
#[derive(Debug, Clone)]
pub struct PersonnelTable {
    rules: Vec<(Regex, String)>,
    fallback_label: String,
}

impl PersonnelTable {
    pub fn from_config(config: &PersonnelConfig) -> Result<Self, regex::Error> {
        let rules = config
            .rules
            .iter()
            .map(|rule| Ok((Regex::new(&rule.pattern)?, rule.label.clone())))
            .collect::<Result<Vec<_>, regex::Error>>()?;

        Ok(Self {
            rules,
            fallback_label: config.fallback_label.clone(),
        })
    }

    /// Personnel label for a formation name.
    pub fn classify(&self, formation: &str) -> &str {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(formation))
            .map(|(_, label)| label.as_str())
            .unwrap_or(&self.fallback_label)
    }
}

impl Default for PersonnelTable {
    fn default() -> Self {
        // The built-in patterns are literals known to compile.
        Self::from_config(&PersonnelConfig::default()).unwrap_or_else(|_| Self {
            rules: Vec::new(),
            fallback_label: default_fallback_label(),
        })
    }
}

/// Running totals for a set of plays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Tally {
    plays: u32,
    successes: u32,
    touchdowns: u32,
    yards_total: i64,
    yards_samples: u32,
}

impl Tally {
    fn of(plays: &[&PlayRecord], rule: &SuccessRule) -> Self {
        plays.iter().fold(Tally::default(), |mut t, play| {
            t.plays += 1;
            t.successes += u32::from(rule.is_success(play));
            t.touchdowns += u32::from(play.has_result(PlayResult::Touchdown));
            if let Some(yards) = play.yards_gained {
                t.yards_total += i64::from(yards);
                t.yards_samples += 1;
            }
            t
        })
    }

    fn merge(self, other: Tally) -> Tally {
        Tally {
            plays: self.plays + other.plays,
            successes: self.successes + other.successes,
            touchdowns: self.touchdowns + other.touchdowns,
            yards_total: self.yards_total + other.yards_total,
            yards_samples: self.yards_samples + other.yards_samples,
        }
    }

    fn success_rate(&self) -> f64 {
        RateStat::new(self.successes, self.plays).rate
    }

    fn touchdown_rate(&self) -> f64 {
        RateStat::new(self.touchdowns, self.plays).rate
    }

    /// Mean over plays with recorded yardage.
    fn avg_yards(&self) -> f64 {
        ratio(self.yards_total as f64, self.yards_samples)
    }
}

/// Effectiveness metrics for one formation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationEffectiveness {
    pub formation: String,
    pub personnel: String,
    pub total_plays: u32,
    pub success_rate: f64,
    pub avg_yards_gained: f64,
    pub touchdown_rate: f64,
    #[serde(skip)]
    tally: Tally,
}

/// Effectiveness metrics aggregated over a personnel group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelGroup {
    pub personnel: String,
    pub total_plays: u32,
    pub success_rate: f64,
    pub avg_yards_gained: f64,
    pub formations: Vec<String>,
}

/// Formation and personnel-group effectiveness for one play set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormationReport {
    pub formation_effectiveness: Vec<FormationEffectiveness>,
    pub personnel_groups: Vec<PersonnelGroup>,
}

/// Per-formation metrics, most used formation first.
pub fn formation_effectiveness(
    plays: &[PlayRecord],
    rule: &SuccessRule,
    personnel: &PersonnelTable,
) -> Vec<FormationEffectiveness> {
    let mut rows: Vec<FormationEffectiveness> = group_records(plays, |p| p.formation.as_deref())
        .into_iter()
        .map(|(formation, members)| {
            let tally = Tally::of(&members, rule);
            FormationEffectiveness {
                formation: formation.to_string(),
                personnel: personnel.classify(formation).to_string(),
                total_plays: tally.plays,
                success_rate: tally.success_rate(),
                avg_yards_gained: tally.avg_yards(),
                touchdown_rate: tally.touchdown_rate(),
                tally,
            }
        })
        .collect();
    order_by_weight_desc(&mut rows, |row| row.total_plays);
    rows
}

/// Fold per-formation rows into personnel groups. Rates are recomputed from
/// the summed play counts so that small formations do not skew the group.
pub fn personnel_groups(formations: &[FormationEffectiveness]) -> Vec<PersonnelGroup> {
    let mut by_label: BTreeMap<&str, (Tally, Vec<String>)> = BTreeMap::new();
    for row in formations {
        let entry = by_label.entry(row.personnel.as_str()).or_default();
        entry.0 = entry.0.merge(row.tally);
        entry.1.push(row.formation.clone());
    }

    let mut groups: Vec<PersonnelGroup> = by_label
        .into_iter()
        .map(|(label, (tally, mut members))| {
            members.sort();
            PersonnelGroup {
                personnel: label.to_string(),
                total_plays: tally.plays,
                success_rate: tally.success_rate(),
                avg_yards_gained: tally.avg_yards(),
                formations: members,
            }
        })
        .collect();
    order_by_weight_desc(&mut groups, |g| g.total_plays);
    groups
}

pub fn formation_report(
    plays: &[PlayRecord],
    rule: &SuccessRule,
    personnel: &PersonnelTable,
) -> FormationReport {
    let formation_effectiveness = formation_effectiveness(plays, rule, personnel);
    let personnel_groups = personnel_groups(&formation_effectiveness);
    FormationReport {
        formation_effectiveness,
        personnel_groups,
    }
}
