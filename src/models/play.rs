//! Play-by-play record model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::FilmId;

/// Blitz label that explicitly marks a play as *not* a blitz.
pub const NO_BLITZ: &str = "no_blitz";

/// Highest valid yard line (own-goal-relative).
pub const MAX_YARD_LINE: u8 = 100;

/// One of the four attempts to advance the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Down {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "4th")]
    Fourth,
}

impl Down {
    pub fn as_str(&self) -> &'static str {
        match self {
            Down::First => "1st",
            Down::Second => "2nd",
            Down::Third => "3rd",
            Down::Fourth => "4th",
        }
    }
}

impl fmt::Display for Down {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Down {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Down::First, Down::Second, Down::Third, Down::Fourth]
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown down {:?} (expected 1st, 2nd, 3rd or 4th)", s))
    }
}

/// Outcome of a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayResult {
    FirstDown,
    Touchdown,
    FieldGoal,
    Fumble,
    Interception,
    Other,
}

impl PlayResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayResult::FirstDown => "first_down",
            PlayResult::Touchdown => "touchdown",
            PlayResult::FieldGoal => "field_goal",
            PlayResult::Fumble => "fumble",
            PlayResult::Interception => "interception",
            PlayResult::Other => "other",
        }
    }

    /// Fumbles and interceptions.
    pub fn is_turnover(&self) -> bool {
        matches!(self, PlayResult::Fumble | PlayResult::Interception)
    }

    /// Results that move the chains.
    pub fn is_conversion(&self) -> bool {
        matches!(self, PlayResult::FirstDown | PlayResult::Touchdown)
    }
}

impl fmt::Display for PlayResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlayResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            PlayResult::FirstDown,
            PlayResult::Touchdown,
            PlayResult::FieldGoal,
            PlayResult::Fumble,
            PlayResult::Interception,
            PlayResult::Other,
        ]
        .into_iter()
        .find(|r| r.as_str() == s)
        .ok_or_else(|| format!("unknown play result {:?}", s))
    }
}

/// One observed play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayRecord {
    /// Store-assigned identifier
    pub id: u64,

    /// Game this play was logged against
    pub film_id: FilmId,

    /// Sequence number within the game
    pub play_number: u32,

    pub quarter: u8,

    #[serde(default)]
    pub down: Option<Down>,

    /// Yards to go
    #[serde(default)]
    pub distance: Option<u32>,

    /// Field position, 0-100 measured from the offense's own goal line
    #[serde(default)]
    pub yard_line: Option<u8>,

    #[serde(default)]
    pub formation: Option<String>,

    #[serde(default)]
    pub play_call: Option<String>,

    #[serde(default)]
    pub play_result: Option<PlayResult>,

    #[serde(default)]
    pub yards_gained: Option<i32>,

    #[serde(default)]
    pub defensive_front: Option<String>,

    #[serde(default)]
    pub defensive_personnel: Option<String>,

    #[serde(default)]
    pub coverage_scheme: Option<String>,

    #[serde(default)]
    pub blitz_type: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl PlayRecord {
    /// Create a play with no situational or scouting data attached.
    pub fn new(id: u64, film_id: FilmId, play_number: u32, quarter: u8) -> Self {
        Self {
            id,
            film_id,
            play_number,
            quarter,
            down: None,
            distance: None,
            yard_line: None,
            formation: None,
            play_call: None,
            play_result: None,
            yards_gained: None,
            defensive_front: None,
            defensive_personnel: None,
            coverage_scheme: None,
            blitz_type: None,
            notes: None,
        }
    }

    /// Builder method to set down, distance and yard line together.
    pub fn with_situation(mut self, down: Down, distance: u32, yard_line: u8) -> Self {
        self.down = Some(down);
        self.distance = Some(distance);
        self.yard_line = Some(yard_line);
        self
    }

    pub fn with_formation(mut self, formation: impl Into<String>) -> Self {
        self.formation = Some(formation.into());
        self
    }

    pub fn with_play_call(mut self, play_call: impl Into<String>) -> Self {
        self.play_call = Some(play_call.into());
        self
    }

    /// Builder method to set the result and yardage of the play.
    pub fn with_result(mut self, result: PlayResult, yards_gained: i32) -> Self {
        self.play_result = Some(result);
        self.yards_gained = Some(yards_gained);
        self
    }

    pub fn with_defensive_front(mut self, front: impl Into<String>) -> Self {
        self.defensive_front = Some(front.into());
        self
    }

    pub fn with_defensive_personnel(mut self, personnel: impl Into<String>) -> Self {
        self.defensive_personnel = Some(personnel.into());
        self
    }

    pub fn with_coverage(mut self, coverage: impl Into<String>) -> Self {
        self.coverage_scheme = Some(coverage.into());
        self
    }

    pub fn with_blitz(mut self, blitz_type: impl Into<String>) -> Self {
        self.blitz_type = Some(blitz_type.into());
        self
    }

    /// A blitz is any recorded blitz type other than the explicit `no_blitz` marker.
    pub fn is_blitz(&self) -> bool {
        matches!(self.blitz_type.as_deref(), Some(t) if t != NO_BLITZ)
    }

    pub fn is_red_zone(&self) -> bool {
        matches!(self.yard_line, Some(y) if y <= 20)
    }

    pub fn is_third_down(&self) -> bool {
        self.down == Some(Down::Third)
    }

    pub fn has_result(&self, result: PlayResult) -> bool {
        self.play_result == Some(result)
    }

    pub fn is_turnover(&self) -> bool {
        self.play_result.is_some_and(|r| r.is_turnover())
    }

    pub fn is_conversion(&self) -> bool {
        self.play_result.is_some_and(|r| r.is_conversion())
    }

    /// Down, distance and yard line must be all absent or all present,
    /// with the yard line on the field.
    pub fn has_consistent_situation(&self) -> bool {
        match (self.down, self.distance, self.yard_line) {
            (None, None, None) => true,
            (Some(_), Some(_), Some(yard_line)) => yard_line <= MAX_YARD_LINE,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_down_serialization() {
        assert_eq!(serde_json::to_string(&Down::Third).unwrap(), "\"3rd\"");
        let parsed: Down = serde_json::from_str("\"1st\"").unwrap();
        assert_eq!(parsed, Down::First);
        assert!(serde_json::from_str::<Down>("\"5th\"").is_err());
    }

    #[test]
    fn test_down_ordering_matches_labels() {
        let mut downs = vec![Down::Fourth, Down::First, Down::Third, Down::Second];
        downs.sort();
        let labels: Vec<&str> = downs.iter().map(|d| d.as_str()).collect();
        assert_eq!(labels, vec!["1st", "2nd", "3rd", "4th"]);
    }

    #[test]
    fn test_play_result_serialization() {
        assert_eq!(
            serde_json::to_string(&PlayResult::FieldGoal).unwrap(),
            "\"field_goal\""
        );
        let parsed: PlayResult = serde_json::from_str("\"first_down\"").unwrap();
        assert_eq!(parsed, PlayResult::FirstDown);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("3rd".parse::<Down>(), Ok(Down::Third));
        assert!("third".parse::<Down>().is_err());
        assert_eq!("interception".parse::<PlayResult>(), Ok(PlayResult::Interception));
        assert!("safety".parse::<PlayResult>().is_err());
    }

    #[test]
    fn test_play_result_classes() {
        assert!(PlayResult::Fumble.is_turnover());
        assert!(PlayResult::Interception.is_turnover());
        assert!(!PlayResult::Touchdown.is_turnover());
        assert!(PlayResult::Touchdown.is_conversion());
        assert!(PlayResult::FirstDown.is_conversion());
        assert!(!PlayResult::FieldGoal.is_conversion());
    }

    #[test]
    fn test_no_blitz_is_not_a_blitz() {
        let play = PlayRecord::new(1, 1, 1, 1);
        assert!(!play.is_blitz());
        assert!(!play.clone().with_blitz(NO_BLITZ).is_blitz());
        assert!(play.with_blitz("fire_zone").is_blitz());
    }

    #[test]
    fn test_red_zone_boundary() {
        let play = PlayRecord::new(1, 1, 1, 1);
        assert!(!play.is_red_zone());
        assert!(play.clone().with_situation(Down::First, 10, 20).is_red_zone());
        assert!(!play.with_situation(Down::First, 10, 21).is_red_zone());
    }

    #[test]
    fn test_consistent_situation() {
        let play = PlayRecord::new(1, 1, 1, 1);
        assert!(play.has_consistent_situation());
        assert!(play
            .clone()
            .with_situation(Down::Second, 7, 45)
            .has_consistent_situation());

        let mut partial = play.clone();
        partial.down = Some(Down::First);
        assert!(!partial.has_consistent_situation());

        let off_field = play.with_situation(Down::First, 10, 101);
        assert!(!off_field.has_consistent_situation());
    }

    #[test]
    fn test_play_record_deserialize_sparse() {
        let json = r#"{"id":4,"filmId":2,"playNumber":9,"quarter":2,"formation":"Shotgun"}"#;
        let play: PlayRecord = serde_json::from_str(json).unwrap();

        assert_eq!(play.film_id, 2);
        assert_eq!(play.formation.as_deref(), Some("Shotgun"));
        assert!(play.down.is_none());
        assert!(play.blitz_type.is_none());
    }
}
