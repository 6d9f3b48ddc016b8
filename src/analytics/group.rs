//! Group-by / count / sort primitive shared by every report section.

use std::collections::BTreeMap;

use crate::models::{CountStat, PlayRecord, SituationalStat};

/// Drop records whose grouping key is null on any dimension.
///
/// Records without a key are left out of the table entirely rather than
/// being folded into an "unknown" bucket.
pub fn exclude_unkeyed<'a, K, F>(
    plays: impl IntoIterator<Item = &'a PlayRecord>,
    key: F,
) -> Vec<K>
where
    F: Fn(&'a PlayRecord) -> Option<K>,
{
    plays.into_iter().filter_map(key).collect()
}

/// Bucket records by key, keeping only records with a non-null key.
pub fn group_records<'a, K, F>(
    plays: impl IntoIterator<Item = &'a PlayRecord>,
    key: F,
) -> BTreeMap<K, Vec<&'a PlayRecord>>
where
    K: Ord,
    F: Fn(&'a PlayRecord) -> Option<K>,
{
    let mut groups: BTreeMap<K, Vec<&'a PlayRecord>> = BTreeMap::new();
    for (k, play) in exclude_unkeyed(plays, |p| key(p).map(|k| (k, p))) {
        groups.entry(k).or_default().push(play);
    }
    groups
}

/// Order rows by weight descending. The sort is stable, so rows produced
/// in key order keep that order among equal weights.
pub fn order_by_weight_desc<T, W, F>(rows: &mut [T], weight: F)
where
    W: Ord,
    F: Fn(&T) -> W,
{
    rows.sort_by(|a, b| weight(b).cmp(&weight(a)));
}

/// Count records per distinct key, ordered by count descending with ties
/// broken by the key's natural order.
pub fn frequency_table<'a, K, F>(
    plays: impl IntoIterator<Item = &'a PlayRecord>,
    key: F,
) -> Vec<(K, u32)>
where
    K: Ord,
    F: Fn(&'a PlayRecord) -> Option<K>,
{
    let mut table: Vec<(K, u32)> = group_records(plays, key)
        .into_iter()
        .map(|(k, members)| (k, members.len() as u32))
        .collect();
    order_by_weight_desc(&mut table, |row| row.1);
    table
}

/// Single-dimension frequency table.
pub fn count_stats<'a, K, F>(
    plays: impl IntoIterator<Item = &'a PlayRecord>,
    key: F,
) -> Vec<CountStat>
where
    K: Ord + Into<String>,
    F: Fn(&'a PlayRecord) -> Option<K>,
{
    frequency_table(plays, key)
        .into_iter()
        .map(|(name, count)| CountStat::new(name, count))
        .collect()
}

/// Entity × down frequency table. Plays without a down are excluded
/// along with plays where the entity is null.
pub fn situational_stats<'a, K, F>(
    plays: impl IntoIterator<Item = &'a PlayRecord>,
    key: F,
) -> Vec<SituationalStat>
where
    K: Ord + Into<String>,
    F: Fn(&'a PlayRecord) -> Option<K>,
{
    frequency_table(plays, |p| key(p).zip(p.down.map(|d| d.as_str())))
        .into_iter()
        .map(|((name, down), count)| SituationalStat::new(name, down, count))
        .collect()
}

/// First `n` entries of an already ordered list. Does not re-sort.
pub fn top_n<T: Clone>(stats: &[T], n: usize) -> Vec<T> {
    stats.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Down;
    use pretty_assertions::assert_eq;

    fn play(id: u64, formation: Option<&str>, down: Option<Down>) -> PlayRecord {
        let mut p = PlayRecord::new(id, 1, id as u32, 1);
        p.formation = formation.map(str::to_string);
        p.down = down;
        p
    }

    #[test]
    fn test_count_stats_orders_by_count_then_name() {
        let plays = vec![
            play(1, Some("Trips"), None),
            play(2, Some("Ace"), None),
            play(3, Some("Shotgun"), None),
            play(4, Some("Shotgun"), None),
            play(5, Some("Trips"), None),
            play(6, Some("Bunch"), None),
            play(7, None, None),
        ];

        let stats = count_stats(&plays, |p| p.formation.as_deref());
        assert_eq!(
            stats,
            vec![
                CountStat::new("Shotgun", 2),
                CountStat::new("Trips", 2),
                CountStat::new("Ace", 1),
                CountStat::new("Bunch", 1),
            ]
        );
    }

    #[test]
    fn test_ordering_ignores_input_order() {
        let mut plays = vec![
            play(1, Some("B"), None),
            play(2, Some("A"), None),
            play(3, Some("C"), None),
            play(4, Some("A"), None),
        ];
        let forward = count_stats(&plays, |p| p.formation.as_deref());
        plays.reverse();
        let backward = count_stats(&plays, |p| p.formation.as_deref());
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_situational_stats_exclude_null_keys() {
        let plays = vec![
            play(1, Some("Shotgun"), Some(Down::Third)),
            play(2, Some("Shotgun"), Some(Down::Third)),
            play(3, None, Some(Down::Third)),
            play(4, Some("Shotgun"), None),
        ];

        let stats = situational_stats(&plays, |p| p.formation.as_deref());
        assert_eq!(stats, vec![SituationalStat::new("Shotgun", "3rd", 2)]);
    }

    #[test]
    fn test_situational_ties_break_on_name_then_down() {
        let plays = vec![
            play(1, Some("Shotgun"), Some(Down::Second)),
            play(2, Some("Shotgun"), Some(Down::First)),
            play(3, Some("Ace"), Some(Down::Third)),
        ];

        let stats = situational_stats(&plays, |p| p.formation.as_deref());
        assert_eq!(
            stats,
            vec![
                SituationalStat::new("Ace", "3rd", 1),
                SituationalStat::new("Shotgun", "1st", 1),
                SituationalStat::new("Shotgun", "2nd", 1),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let plays: Vec<PlayRecord> = Vec::new();
        assert!(count_stats(&plays, |p| p.formation.as_deref()).is_empty());
        assert!(situational_stats(&plays, |p| p.formation.as_deref()).is_empty());
    }

    #[test]
    fn test_group_records_buckets_by_key() {
        let plays = vec![
            play(1, Some("Trips"), None),
            play(2, Some("Ace"), None),
            play(3, Some("Trips"), None),
            play(4, None, None),
        ];

        let groups = group_records(&plays, |p| p.formation.as_deref());
        let keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["Ace", "Trips"]);
        let trips: Vec<u64> = groups["Trips"].iter().map(|p| p.id).collect();
        assert_eq!(trips, vec![1, 3]);
    }

    #[test]
    fn test_top_n_truncates_without_resorting() {
        let stats = vec![
            CountStat::new("z", 1),
            CountStat::new("a", 5),
            CountStat::new("m", 3),
        ];
        assert_eq!(top_n(&stats, 2), vec![CountStat::new("z", 1), CountStat::new("a", 5)]);
        assert_eq!(top_n(&stats, 10).len(), 3);
        assert!(top_n(&stats, 0).is_empty());
    }
}
