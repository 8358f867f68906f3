//! Whether the source series reproduces each baseline interval.
//!
//! A baseline interval `b` is covered by a source interval `n` when
//! `n.start <= b.start`, the ends are compatible and the values are
//! numerically equal. Compatible ends are:
//!
//! - both open
//! - both closed, with `n.stop >= b.stop`
//! - `b` closed and `n` open but fuzzy
//! - `b` open but fuzzy and `n` closed

use ipp_model::{ConflictSet, Interval};

pub fn is_covered(baseline: &Interval, candidate: &Interval) -> bool {
    if candidate.start > baseline.start {
        return false;
    }
    let ends_match = match (baseline.stop, candidate.stop) {
        (None, None) => true,
        (Some(baseline_stop), Some(candidate_stop)) => candidate_stop >= baseline_stop,
        (Some(_), None) => candidate.fuzzy,
        (None, Some(_)) => baseline.fuzzy,
    };
    ends_match && baseline.value.numeric_eq(&candidate.value)
}

/// Descriptor of a baseline interval no source interval covers.
///
/// Carries the source value stated for exactly the same dates, if any.
pub fn uncovered_descriptor(baseline: &Interval, source: &[Interval]) -> String {
    let new_value = source
        .iter()
        .find(|interval| interval.same_bounds(baseline))
        .map_or_else(|| "unknown".to_string(), |interval| interval.value.to_string());
    let baseline_stop = baseline
        .stop
        .map_or_else(|| "open".to_string(), |stop| stop.to_string());
    format!(
        "children:baseline-not-covered(baseline_start={},baseline_stop={},baseline_value={},new_value={})",
        baseline.start, baseline_stop, baseline.value, new_value
    )
}

/// One descriptor per baseline interval left uncovered by `source`.
pub fn coverage_conflicts(baseline: &[Interval], source: &[Interval]) -> ConflictSet {
    let mut conflicts = ConflictSet::new();
    for interval in baseline {
        if !source.iter().any(|candidate| is_covered(interval, candidate)) {
            conflicts.insert(uncovered_descriptor(interval, source));
        }
    }
    conflicts
}
