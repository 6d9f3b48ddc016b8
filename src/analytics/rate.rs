//! Rate definitions over a play set.
//!
//! Every rate is `count(condition) / count(universe)`. An empty universe
//! yields a rate of exactly 0.

use crate::models::{PlayRecord, PlayResult, RateStat};

/// `condition` over the plays satisfying `universe`.
pub fn rate_within<'a, U, C>(
    plays: impl IntoIterator<Item = &'a PlayRecord>,
    universe: U,
    condition: C,
) -> RateStat
where
    U: Fn(&PlayRecord) -> bool,
    C: Fn(&PlayRecord) -> bool,
{
    let (numerator, denominator) = plays
        .into_iter()
        .filter(|p| universe(p))
        .fold((0u32, 0u32), |(hit, total), p| {
            (hit + u32::from(condition(p)), total + 1)
        });
    RateStat::new(numerator, denominator)
}

/// Plays with a blitz type other than `no_blitz`, over all plays.
pub fn blitz_rate<'a>(plays: impl IntoIterator<Item = &'a PlayRecord>) -> RateStat {
    rate_within(plays, |_| true, PlayRecord::is_blitz)
}

/// Third-down plays that gained a first down or scored, over all third-down plays.
pub fn third_down_success<'a>(plays: impl IntoIterator<Item = &'a PlayRecord>) -> RateStat {
    rate_within(plays, PlayRecord::is_third_down, PlayRecord::is_conversion)
}

/// Red-zone scoring and turnover rates sharing one universe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RedZoneRates {
    pub touchdown: RateStat,
    pub field_goal: RateStat,
    pub turnover: RateStat,
}

impl RedZoneRates {
    /// Number of red-zone plays the rates were computed over.
    pub fn total_plays(&self) -> u32 {
        self.touchdown.denominator
    }
}

pub fn red_zone_rates(plays: &[PlayRecord]) -> RedZoneRates {
    RedZoneRates {
        touchdown: rate_within(plays, PlayRecord::is_red_zone, |p| {
            p.has_result(PlayResult::Touchdown)
        }),
        field_goal: rate_within(plays, PlayRecord::is_red_zone, |p| {
            p.has_result(PlayResult::FieldGoal)
        }),
        turnover: rate_within(plays, PlayRecord::is_red_zone, PlayRecord::is_turnover),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Down, NO_BLITZ};

    #[test]
    fn test_blitz_rate_exact() {
        // 150 plays: 30 blitzes, 40 explicit no_blitz, the rest unlabelled.
        let plays: Vec<PlayRecord> = (0..150u64)
            .map(|i| {
                let play = PlayRecord::new(i, 1 + i % 2, i as u32, 1);
                match i {
                    0..=29 => play.with_blitz("fire_zone"),
                    30..=69 => play.with_blitz(NO_BLITZ),
                    _ => play,
                }
            })
            .collect();

        let rate = blitz_rate(&plays);
        assert_eq!(rate.numerator, 30);
        assert_eq!(rate.denominator, 150);
        assert_eq!(rate.rate, 0.2);
    }

    #[test]
    fn test_third_down_success() {
        let plays = vec![
            PlayRecord::new(1, 1, 1, 1)
                .with_situation(Down::Third, 3, 40)
                .with_result(PlayResult::FirstDown, 4),
            PlayRecord::new(2, 1, 2, 1)
                .with_situation(Down::Third, 8, 12)
                .with_result(PlayResult::Touchdown, 12),
            PlayRecord::new(3, 1, 3, 1)
                .with_situation(Down::Third, 6, 30)
                .with_result(PlayResult::Other, 2),
            PlayRecord::new(4, 1, 4, 1).with_situation(Down::Third, 6, 30),
            PlayRecord::new(5, 1, 5, 1)
                .with_situation(Down::Second, 6, 30)
                .with_result(PlayResult::FirstDown, 7),
        ];

        let rate = third_down_success(&plays);
        assert_eq!(rate.numerator, 2);
        assert_eq!(rate.denominator, 4);
        assert_eq!(rate.rate, 0.5);
    }

    #[test]
    fn test_red_zone_rates() {
        let results = [
            Some(PlayResult::Touchdown),
            Some(PlayResult::Touchdown),
            Some(PlayResult::Touchdown),
            Some(PlayResult::Touchdown),
            Some(PlayResult::FieldGoal),
            Some(PlayResult::Fumble),
            Some(PlayResult::Interception),
            Some(PlayResult::FirstDown),
            Some(PlayResult::Other),
            None,
        ];
        let mut plays: Vec<PlayRecord> = results
            .iter()
            .enumerate()
            .map(|(i, result)| {
                let mut p = PlayRecord::new(i as u64, 1, i as u32, 4)
                    .with_situation(Down::First, 10, 5 + i as u8);
                p.play_result = *result;
                p
            })
            .collect();
        // Outside the red zone: must not count.
        plays.push(
            PlayRecord::new(50, 1, 50, 4)
                .with_situation(Down::First, 10, 21)
                .with_result(PlayResult::Touchdown, 79),
        );

        let rates = red_zone_rates(&plays);
        assert_eq!(rates.total_plays(), 10);
        assert_eq!(rates.touchdown.rate, 0.4);
        assert_eq!(rates.field_goal.rate, 0.1);
        assert_eq!(rates.turnover.rate, 0.2);
    }

    #[test]
    fn test_empty_universe_yields_zero() {
        let plays = vec![PlayRecord::new(1, 1, 1, 1).with_situation(Down::First, 10, 50)];

        let third = third_down_success(&plays);
        assert_eq!(third.denominator, 0);
        assert_eq!(third.rate, 0.0);

        let red_zone = red_zone_rates(&plays);
        assert_eq!(red_zone.total_plays(), 0);
        assert_eq!(red_zone.touchdown.rate, 0.0);
        assert_eq!(red_zone.field_goal.rate, 0.0);
        assert_eq!(red_zone.turnover.rate, 0.0);

        let none: Vec<PlayRecord> = Vec::new();
        assert_eq!(blitz_rate(&none).rate, 0.0);
    }
}
