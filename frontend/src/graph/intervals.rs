//! Per-expression cache of evaluated x-sub-ranges and their plot points.
//!
//! The cache is an ordered set of disjoint `[from, to]` intervals. On every
//! view change the plotter subtracts the union of cached intervals from the
//! visible x-range and only fetches what is left; fragments coming back merge
//! additively, coalescing overlaps and keeping points sorted by x.

/// Two intervals closer than this merge into one; also the slack applied when
/// comparing interval ends, so float noise from range arithmetic can't create
/// hairline gaps that would be re-fetched forever.
const MERGE_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
pub struct CachedInterval {
    pub from: f64,
    pub to: f64,
    pub points: Vec<(f64, f64)>,
}

impl CachedInterval {
    pub fn new(from: f64, to: f64, mut points: Vec<(f64, f64)>) -> Self {
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { from, to, points }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntervalCache {
    /// Disjoint and sorted by `from`.
    intervals: Vec<CachedInterval>,
}

impl IntervalCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[CachedInterval] {
        &self.intervals
    }

    /// Sub-ranges of `[from, to]` not yet covered by the cache.
    pub fn missing_ranges(&self, from: f64, to: f64) -> Vec<(f64, f64)> {
        if !(from.is_finite() && to.is_finite()) || to <= from {
            return Vec::new();
        }
        let mut missing = Vec::new();
        let mut cursor = from;
        for interval in &self.intervals {
            if interval.to <= cursor + MERGE_EPSILON {
                continue;
            }
            if interval.from >= to - MERGE_EPSILON {
                break;
            }
            if interval.from > cursor + MERGE_EPSILON {
                missing.push((cursor, interval.from.min(to)));
            }
            cursor = cursor.max(interval.to);
            if cursor >= to - MERGE_EPSILON {
                return missing;
            }
        }
        if cursor < to - MERGE_EPSILON {
            missing.push((cursor, to));
        }
        missing
    }

    /// Merge a freshly evaluated fragment, coalescing overlaps and neighbours.
    pub fn insert(&mut self, fragment: CachedInterval) {
        if !(fragment.from.is_finite() && fragment.to.is_finite()) || fragment.to <= fragment.from {
            return;
        }
        let mut merged = fragment;
        let mut result = Vec::with_capacity(self.intervals.len() + 1);
        for existing in self.intervals.drain(..) {
            if existing.to < merged.from - MERGE_EPSILON {
                result.push(existing);
            } else if existing.from > merged.to + MERGE_EPSILON {
                // Everything past the fragment stays untouched.
                result.push(std::mem::replace(&mut merged, existing));
            } else {
                merged = merge_pair(merged, existing);
            }
        }
        result.push(merged);
        result.sort_by(|a, b| a.from.total_cmp(&b.from));
        self.intervals = result;
    }

    /// Union of cached points inside `[from, to]`, sorted by x.
    pub fn points_within(&self, from: f64, to: f64) -> Vec<(f64, f64)> {
        let mut points: Vec<(f64, f64)> = self
            .intervals
            .iter()
            .flat_map(|interval| interval.points.iter().copied())
            .filter(|(x, _)| *x >= from && *x <= to)
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }
}

fn merge_pair(a: CachedInterval, b: CachedInterval) -> CachedInterval {
    let from = a.from.min(b.from);
    let to = a.to.max(b.to);
    let mut points = a.points;
    points.extend(b.points);
    points.sort_by(|left, right| left.0.total_cmp(&right.0));
    points.dedup_by(|left, right| left.0 == right.0);
    CachedInterval { from, to, points }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache_with(ranges: &[(f64, f64)]) -> IntervalCache {
        let mut cache = IntervalCache::new();
        for &(from, to) in ranges {
            cache.insert(CachedInterval::new(from, to, vec![]));
        }
        cache
    }

    #[test]
    fn empty_cache_misses_whole_range() {
        let cache = IntervalCache::new();
        assert_eq!(cache.missing_ranges(-10.0, 10.0), vec![(-10.0, 10.0)]);
    }

    #[test]
    fn cached_middle_leaves_two_flanks() {
        let cache = cache_with(&[(-5.0, 5.0)]);
        assert_eq!(
            cache.missing_ranges(-10.0, 10.0),
            vec![(-10.0, -5.0), (5.0, 10.0)]
        );
    }

    #[test]
    fn fully_covered_range_misses_nothing() {
        let cache = cache_with(&[(-20.0, 20.0)]);
        assert!(cache.missing_ranges(-10.0, 10.0).is_empty());
    }

    #[test]
    fn missing_plus_cached_exactly_cover_requested_range() {
        let cache = cache_with(&[(-8.0, -3.0), (-1.0, 2.0), (4.0, 6.0)]);
        let (from, to) = (-10.0, 10.0);
        let missing = cache.missing_ranges(from, to);

        // Disjoint, sorted, and non-degenerate.
        for window in missing.windows(2) {
            assert!(window[0].1 <= window[1].0);
        }
        for &(a, b) in &missing {
            assert!(a < b);
        }

        // The union of cached (clipped) and missing pieces is the full range.
        let mut pieces: Vec<(f64, f64)> = missing.clone();
        for interval in cache.intervals() {
            let clipped = (interval.from.max(from), interval.to.min(to));
            if clipped.1 > clipped.0 {
                pieces.push(clipped);
            }
        }
        pieces.sort_by(|a, b| a.0.total_cmp(&b.0));
        assert_eq!(pieces.first().unwrap().0, from);
        assert_eq!(pieces.last().unwrap().1, to);
        for window in pieces.windows(2) {
            assert!((window[0].1 - window[1].0).abs() < 1e-9);
        }
    }

    #[test]
    fn inserting_overlap_coalesces_intervals() {
        let mut cache = cache_with(&[(0.0, 2.0), (5.0, 7.0)]);
        cache.insert(CachedInterval::new(1.5, 5.5, vec![]));
        let ranges: Vec<(f64, f64)> = cache
            .intervals()
            .iter()
            .map(|interval| (interval.from, interval.to))
            .collect();
        assert_eq!(ranges, vec![(0.0, 7.0)]);
    }

    #[test]
    fn adjacent_intervals_merge_without_gap() {
        let mut cache = cache_with(&[(0.0, 1.0)]);
        cache.insert(CachedInterval::new(1.0, 2.0, vec![]));
        assert_eq!(cache.intervals().len(), 1);
        assert!(cache.missing_ranges(0.0, 2.0).is_empty());
    }

    #[test]
    fn merge_keeps_points_sorted_and_deduped() {
        let mut cache = IntervalCache::new();
        cache.insert(CachedInterval::new(0.0, 1.0, vec![(0.0, 0.0), (1.0, 1.0)]));
        cache.insert(CachedInterval::new(
            0.5,
            2.0,
            vec![(2.0, 4.0), (1.0, 1.0), (0.5, 0.25)],
        ));
        let interval = &cache.intervals()[0];
        assert_eq!(
            interval.points,
            vec![(0.0, 0.0), (0.5, 0.25), (1.0, 1.0), (2.0, 4.0)]
        );
    }

    #[test]
    fn points_within_clips_and_sorts() {
        let mut cache = IntervalCache::new();
        cache.insert(CachedInterval::new(3.0, 4.0, vec![(3.0, 9.0), (4.0, 16.0)]));
        cache.insert(CachedInterval::new(0.0, 1.0, vec![(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(
            cache.points_within(0.5, 3.5),
            vec![(1.0, 1.0), (3.0, 9.0)]
        );
    }

    #[test]
    fn degenerate_inserts_are_ignored() {
        let mut cache = IntervalCache::new();
        cache.insert(CachedInterval::new(1.0, 1.0, vec![]));
        cache.insert(CachedInterval::new(2.0, 1.0, vec![]));
        cache.insert(CachedInterval::new(f64::NAN, 1.0, vec![]));
        assert!(cache.is_empty());
    }
}
