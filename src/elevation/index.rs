use std::collections::BTreeMap;

use tracing::trace;

use super::{ElevationSpec, EmptyResultPolicy, HasElevation};
use crate::error::{IndexError, Result};

/// Upper bound on the number of levels a single range element may span.
const MAX_LEVELS_PER_ELEMENT: i64 = 1 << 20;

/// Indexes elements into elevation bands of width `interval`.
///
/// A band (level) `L` covers `[L * interval, (L + 1) * interval)`. Elements
/// with a primary elevation land in exactly one level; range elements fan out
/// into every level from `floor(low / interval)` to `ceil(high / interval)`
/// inclusive. Levels are created on first insertion and never removed.
///
/// Keys are lightweight handles (usually arena ids) and are returned by value.
#[derive(Debug, Clone)]
pub struct ElevationIndex<K> {
    interval: f64,
    policy: EmptyResultPolicy,
    levels: BTreeMap<i64, Vec<usize>>,
    entries: Vec<(K, ElevationSpec)>,
    lowest_level: Option<i64>,
    highest_level: Option<i64>,
}

impl<K: Copy> ElevationIndex<K> {
    /// Creates an empty index.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInterval` if `interval` is not finite and
    /// strictly positive.
    pub fn new(interval: f64, policy: EmptyResultPolicy) -> Result<Self> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(IndexError::InvalidInterval(interval).into());
        }
        Ok(Self {
            interval,
            policy,
            levels: BTreeMap::new(),
            entries: Vec::new(),
            lowest_level: None,
            highest_level: None,
        })
    }

    #[must_use]
    pub fn interval(&self) -> f64 {
        self.interval
    }

    #[must_use]
    pub fn policy(&self) -> EmptyResultPolicy {
        self.policy
    }

    /// Lowest level ever created.
    #[must_use]
    pub fn lowest_level(&self) -> Option<i64> {
        self.lowest_level
    }

    /// Highest level ever created.
    #[must_use]
    pub fn highest_level(&self) -> Option<i64> {
        self.highest_level
    }

    /// Number of items indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over every indexed item in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, ElevationSpec)> + '_ {
        self.entries.iter().copied()
    }

    /// Indexes `key` according to the variant of `spec`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidElevation` for non-finite or inverted
    /// elevations, and `IndexError::InvalidInput` if a range spans too many
    /// levels.
    pub fn index(&mut self, key: K, spec: ElevationSpec) -> Result<()> {
        match spec {
            ElevationSpec::Primary(z) => self.index_by_primary_elevation(key, z),
            ElevationSpec::Range { low, high } => self.index_by_elevation_range(key, low, high),
        }
    }

    /// Indexes `key` with the elevation reported by `element`.
    ///
    /// # Errors
    ///
    /// See [`ElevationIndex::index`].
    pub fn index_element<E: HasElevation + ?Sized>(&mut self, key: K, element: &E) -> Result<()> {
        self.index(key, element.elevation())
    }

    /// Indexes `key` into the single level holding `elevation`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidElevation` if `elevation` is not finite.
    pub fn index_by_primary_elevation(&mut self, key: K, elevation: f64) -> Result<()> {
        let spec = ElevationSpec::Primary(elevation);
        spec.validate()?;
        let level = self.floor_level(elevation);
        let slot = self.push_entry(key, spec);
        self.insert_into_level(level, slot);
        trace!(level, "indexed primary elevation");
        Ok(())
    }

    /// Indexes `key` into every level touched by `[low, high]`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidElevation` for non-finite or inverted
    /// bounds, and `IndexError::InvalidInput` if the range spans too many
    /// levels.
    pub fn index_by_elevation_range(&mut self, key: K, low: f64, high: f64) -> Result<()> {
        let spec = ElevationSpec::Range { low, high };
        spec.validate()?;
        let min_level = self.floor_level(low);
        let max_level = self.ceil_level(high);
        if max_level.saturating_sub(min_level) > MAX_LEVELS_PER_ELEMENT {
            return Err(IndexError::InvalidInput(format!(
                "elevation range [{low}, {high}] spans more than {MAX_LEVELS_PER_ELEMENT} levels"
            ))
            .into());
        }
        let slot = self.push_entry(key, spec);
        for level in min_level..=max_level {
            self.insert_into_level(level, slot);
        }
        trace!(min_level, max_level, "indexed elevation range");
        Ok(())
    }

    /// Returns every element stored in the levels covering `[floor, ceiling]`.
    ///
    /// The result is a level-granular superset: no per-element filter is
    /// applied. Each element appears once.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInput` for non-finite or inverted bounds,
    /// and `IndexError::NotFound` for an empty result under
    /// [`EmptyResultPolicy::Error`].
    pub fn elements_in_elevation_range(&self, floor: f64, ceiling: f64) -> Result<Vec<K>> {
        check_finite("floor", floor)?;
        check_finite("ceiling", ceiling)?;
        if floor > ceiling {
            return Err(
                IndexError::InvalidInput(format!("floor {floor} above ceiling {ceiling}")).into(),
            );
        }
        let slots = self.slots_in_levels(self.floor_level(floor), self.ceil_level(ceiling));
        self.finish(
            slots.into_iter().map(|s| self.entries[s].0).collect(),
            || format!("no elements between elevations {floor} and {ceiling}"),
        )
    }

    /// Returns the elements of the level holding `elevation` that match it.
    ///
    /// Primary elements match when `primary - elevation < tolerance`. The
    /// comparison is one-sided: any primary elevation in the level that lies
    /// below `elevation` matches. Range elements match when
    /// `low < elevation < high`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInput` for non-finite arguments, and
    /// `IndexError::NotFound` for an empty result under
    /// [`EmptyResultPolicy::Error`].
    pub fn elements_at_elevation(&self, elevation: f64, tolerance: f64) -> Result<Vec<K>> {
        check_finite("elevation", elevation)?;
        check_finite("tolerance", tolerance)?;
        let level = self.floor_level(elevation);
        let found = self
            .levels
            .get(&level)
            .into_iter()
            .flatten()
            .map(|&s| self.entries[s])
            .filter(|(_, spec)| match *spec {
                ElevationSpec::Primary(z) => z - elevation < tolerance,
                ElevationSpec::Range { low, high } => low < elevation && elevation < high,
            })
            .map(|(key, _)| key)
            .collect();
        self.finish(found, || format!("no elements at elevation {elevation}"))
    }

    /// Returns the elements lying entirely below `elevation`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInput` if `elevation` is not finite, and
    /// `IndexError::NotFound` for an empty result under
    /// [`EmptyResultPolicy::Error`].
    pub fn elements_below_elevation(&self, elevation: f64) -> Result<Vec<K>> {
        check_finite("elevation", elevation)?;
        let found = match self.lowest_level {
            Some(lowest) => self
                .slots_in_levels(lowest, self.ceil_level(elevation))
                .into_iter()
                .map(|s| self.entries[s])
                .filter(|(_, spec)| spec.highest() < elevation)
                .map(|(key, _)| key)
                .collect(),
            None => Vec::new(),
        };
        self.finish(found, || format!("no elements below elevation {elevation}"))
    }

    /// Returns the elements lying entirely above `elevation`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidInput` if `elevation` is not finite, and
    /// `IndexError::NotFound` for an empty result under
    /// [`EmptyResultPolicy::Error`].
    pub fn elements_above_elevation(&self, elevation: f64) -> Result<Vec<K>> {
        check_finite("elevation", elevation)?;
        let found = match self.highest_level {
            Some(highest) => self
                .slots_in_levels(self.floor_level(elevation), highest)
                .into_iter()
                .map(|s| self.entries[s])
                .filter(|(_, spec)| spec.lowest() > elevation)
                .map(|(key, _)| key)
                .collect(),
            None => Vec::new(),
        };
        self.finish(found, || format!("no elements above elevation {elevation}"))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn floor_level(&self, elevation: f64) -> i64 {
        (elevation / self.interval).floor() as i64
    }

    #[allow(clippy::cast_possible_truncation)]
    fn ceil_level(&self, elevation: f64) -> i64 {
        (elevation / self.interval).ceil() as i64
    }

    fn push_entry(&mut self, key: K, spec: ElevationSpec) -> usize {
        self.entries.push((key, spec));
        self.entries.len() - 1
    }

    fn insert_into_level(&mut self, level: i64, slot: usize) {
        self.levels.entry(level).or_default().push(slot);
        self.lowest_level = Some(self.lowest_level.map_or(level, |l| l.min(level)));
        self.highest_level = Some(self.highest_level.map_or(level, |h| h.max(level)));
    }

    /// Distinct slots stored in levels `[from, to]`, in first-seen order.
    fn slots_in_levels(&self, from: i64, to: i64) -> Vec<usize> {
        if from > to {
            return Vec::new();
        }
        let mut seen = vec![false; self.entries.len()];
        let mut slots = Vec::new();
        for bucket in self.levels.range(from..=to).map(|(_, b)| b) {
            for &slot in bucket {
                if !seen[slot] {
                    seen[slot] = true;
                    slots.push(slot);
                }
            }
        }
        slots
    }

    fn finish(&self, found: Vec<K>, describe: impl FnOnce() -> String) -> Result<Vec<K>> {
        if found.is_empty() && self.policy == EmptyResultPolicy::Error {
            return Err(IndexError::NotFound(describe()).into());
        }
        Ok(found)
    }
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(IndexError::InvalidInput(format!("{name} must be finite, got {value}")).into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn index(interval: f64) -> ElevationIndex<u32> {
        ElevationIndex::new(interval, EmptyResultPolicy::Error).unwrap()
    }

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn rejects_bad_interval() {
        assert!(ElevationIndex::<u32>::new(0.0, EmptyResultPolicy::Error).is_err());
        assert!(ElevationIndex::<u32>::new(-1.0, EmptyResultPolicy::Error).is_err());
        assert!(ElevationIndex::<u32>::new(f64::NAN, EmptyResultPolicy::Error).is_err());
    }

    #[test]
    fn range_fans_out_into_every_level() {
        let mut idx = index(10.0);
        idx.index_by_elevation_range(1, 5.0, 25.0).unwrap();
        assert_eq!(idx.lowest_level(), Some(0));
        assert_eq!(idx.highest_level(), Some(3));
        for level in 0..=3_i32 {
            let lo = f64::from(level) * 10.0;
            let found = idx.elements_in_elevation_range(lo, lo).unwrap();
            assert_eq!(found, vec![1], "level {level}");
        }
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn range_query_scenario() {
        let mut idx = index(10.0);
        idx.index_by_elevation_range(7, 5.0, 25.0).unwrap();
        assert_eq!(idx.elements_in_elevation_range(0.0, 30.0).unwrap(), vec![7]);
        let err = idx.elements_in_elevation_range(40.0, 50.0).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn range_query_empty_policy() {
        let mut idx = ElevationIndex::new(10.0, EmptyResultPolicy::Empty).unwrap();
        idx.index_by_elevation_range(7_u32, 5.0, 25.0).unwrap();
        assert!(idx.elements_in_elevation_range(40.0, 50.0).unwrap().is_empty());
        assert!(idx.elements_at_elevation(100.0, 1.0).unwrap().is_empty());
        assert!(idx.elements_below_elevation(-100.0).unwrap().is_empty());
        assert!(idx.elements_above_elevation(100.0).unwrap().is_empty());
    }

    #[test]
    fn range_query_deduplicates() {
        let mut idx = index(1.0);
        idx.index_by_elevation_range(1, 0.0, 10.0).unwrap();
        idx.index_by_primary_elevation(2, 4.5).unwrap();
        assert_eq!(idx.elements_in_elevation_range(0.0, 10.0).unwrap(), vec![1, 2]);
    }

    #[test]
    fn range_query_rejects_inverted_bounds() {
        let mut idx = index(1.0);
        idx.index_by_primary_elevation(1, 0.5).unwrap();
        assert!(!idx.elements_in_elevation_range(5.0, 1.0).unwrap_err().is_not_found());
    }

    #[test]
    fn tolerance_is_one_sided() {
        let mut idx = index(10.0);
        idx.index_by_primary_elevation(100, 10.0).unwrap();
        idx.index_by_primary_elevation(105, 10.5).unwrap();
        idx.index_by_primary_elevation(110, 11.0).unwrap();
        let found = sorted(idx.elements_at_elevation(10.0, 0.6).unwrap());
        assert_eq!(found, vec![100, 105]);

        // Far below the query but in the same level: still matches.
        idx.index_by_primary_elevation(150, 15.0).unwrap();
        let found = sorted(idx.elements_at_elevation(19.0, 0.1).unwrap());
        assert_eq!(found, vec![100, 105, 110, 150]);
    }

    #[test]
    fn at_elevation_range_is_open_interval() {
        let mut idx = index(10.0);
        idx.index_by_elevation_range(1, 2.0, 8.0).unwrap();
        assert_eq!(idx.elements_at_elevation(5.0, 0.0).unwrap(), vec![1]);
        assert!(idx.elements_at_elevation(2.0, 0.0).is_err());
        assert!(idx.elements_at_elevation(8.0, 0.0).is_err());
    }

    #[test]
    fn below_and_above() {
        let mut idx = index(5.0);
        idx.index_by_primary_elevation(1, 1.0).unwrap();
        idx.index_by_elevation_range(2, 3.0, 12.0).unwrap();
        idx.index_by_primary_elevation(3, 20.0).unwrap();
        idx.index_by_elevation_range(4, 22.0, 30.0).unwrap();

        assert_eq!(sorted(idx.elements_below_elevation(13.0).unwrap()), vec![1, 2]);
        assert_eq!(idx.elements_below_elevation(11.0).unwrap(), vec![1]);
        assert_eq!(sorted(idx.elements_above_elevation(2.0).unwrap()), vec![2, 3, 4]);
        assert_eq!(idx.elements_above_elevation(21.0).unwrap(), vec![4]);
        assert!(idx.elements_below_elevation(0.5).unwrap_err().is_not_found());
        assert!(idx.elements_above_elevation(30.0).unwrap_err().is_not_found());
    }

    #[test]
    fn empty_index_queries_fail_not_found() {
        let idx = index(1.0);
        assert!(idx.is_empty());
        assert!(idx.elements_below_elevation(0.0).unwrap_err().is_not_found());
        assert!(idx.elements_above_elevation(0.0).unwrap_err().is_not_found());
        assert!(idx.elements_in_elevation_range(0.0, 1.0).unwrap_err().is_not_found());
    }

    #[test]
    fn negative_elevations_use_floor_and_ceil() {
        let mut idx = index(10.0);
        idx.index_by_elevation_range(1, -15.0, -5.0).unwrap();
        assert_eq!(idx.lowest_level(), Some(-2));
        assert_eq!(idx.highest_level(), Some(0));
        idx.index_by_primary_elevation(2, -0.5).unwrap();
        assert_eq!(idx.lowest_level(), Some(-2));
    }

    #[test]
    fn rejects_invalid_elements() {
        let mut idx = index(1.0);
        assert!(idx.index_by_elevation_range(1, 5.0, 1.0).is_err());
        assert!(idx.index_by_primary_elevation(1, f64::NAN).is_err());
        assert!(idx.index_by_elevation_range(1, 0.0, 1e12).is_err());
        assert!(idx.is_empty());
        assert_eq!(idx.lowest_level(), None);
    }

    #[test]
    fn index_dispatches_on_spec() {
        let mut idx = index(1.0);
        idx.index(1, ElevationSpec::Primary(2.5)).unwrap();
        idx.index_element(2, &ElevationSpec::Range { low: 0.0, high: 4.0 })
            .unwrap();
        let items: Vec<_> = idx.iter().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], (1, ElevationSpec::Primary(2.5)));
        assert_eq!(idx.lowest_level(), Some(0));
        assert_eq!(idx.highest_level(), Some(4));
    }

    #[test]
    fn repeated_queries_are_identical() {
        let mut idx = index(2.0);
        for i in 0..20_u32 {
            idx.index_by_elevation_range(i, f64::from(i), f64::from(i) + 3.0)
                .unwrap();
        }
        let a = idx.elements_in_elevation_range(4.0, 9.0).unwrap();
        let b = idx.elements_in_elevation_range(4.0, 9.0).unwrap();
        assert_eq!(a, b);
    }
}
