// sentinel-core/src/domain/stats/group.rs

use std::collections::BTreeMap;

use crate::domain::stats::summary::RunningStats;

/// Group-by aggregation: mean of `value` per key.
///
/// Keys come back sorted, which makes "first max wins" tie-breaking
/// deterministic. Items for which `key` returns `None` are skipped.
pub fn group_means<'a, T, K, FK, FV>(
    items: impl IntoIterator<Item = &'a T>,
    key: FK,
    value: FV,
) -> BTreeMap<K, GroupMean>
where
    T: 'a,
    K: Ord,
    FK: Fn(&'a T) -> Option<K>,
    FV: Fn(&'a T) -> f64,
{
    let mut groups: BTreeMap<K, RunningStats> = BTreeMap::new();
    for item in items {
        if let Some(k) = key(item) {
            groups.entry(k).or_default().push(value(item));
        }
    }
    groups
        .into_iter()
        .filter_map(|(k, stats)| {
            stats.mean().map(|mean| {
                (
                    k,
                    GroupMean {
                        mean,
                        count: stats.count(),
                    },
                )
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMean {
    pub mean: f64,
    pub count: u64,
}

/// Mean of `value` over the items matching `filter`, `None` if none match.
pub fn filtered_mean<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    filter: impl Fn(&T) -> bool,
    value: impl Fn(&T) -> f64,
) -> Option<f64> {
    items
        .into_iter()
        .filter(|item| filter(*item))
        .map(value)
        .collect::<RunningStats>()
        .mean()
}

/// First entry with the highest / lowest mean, in iteration order.
pub fn extremes<'a, K>(
    groups: impl IntoIterator<Item = (&'a K, f64)>,
) -> Option<((&'a K, f64), (&'a K, f64))>
where
    K: 'a,
{
    let mut iter = groups.into_iter();
    let first = iter.next()?;
    let (mut max, mut min) = (first, first);
    for entry in iter {
        if entry.1 > max.1 {
            max = entry;
        }
        if entry.1 < min.1 {
            min = entry;
        }
    }
    Some((max, min))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_means_sorted_and_skips_none() {
        let rows = [("b", 1.0), ("a", 0.0), ("b", 0.0), ("a", 1.0), ("a", 1.0), ("x", 5.0)];
        let groups = group_means(
            rows.iter(),
            |(k, _)| (*k != "x").then_some(*k),
            |(_, v)| *v,
        );

        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(groups["b"].mean, 0.5);
        assert_eq!(groups["a"].count, 3);
    }

    #[test]
    fn test_filtered_mean() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(filtered_mean(values.iter(), |v| *v > 2.0, |v| *v), Some(3.5));
        assert_eq!(filtered_mean(values.iter(), |v| *v > 10.0, |v| *v), None);
    }

    #[test]
    fn test_extremes_first_wins_on_ties() {
        let keys = ["a", "b", "c", "d"];
        let means = [0.5, 0.9, 0.9, 0.5];
        let (max, min) = extremes(keys.iter().zip(means)).unwrap_or(((&"", 0.0), (&"", 0.0)));
        assert_eq!(max, (&"b", 0.9));
        assert_eq!(min, (&"a", 0.5));
        assert!(extremes(std::iter::empty::<(&&str, f64)>()).is_none());
    }
}
