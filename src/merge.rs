//! Interval merging: collapse assignments into maximal runs of one value.
use crate::table::{Assignment, CodePoint, Interval, Overlap, Run};

/// Collapse a set of code points into maximal contiguous intervals.
pub fn make_intervals(points: impl IntoIterator<Item = CodePoint>) -> Vec<Interval> {
    let mut points: Vec<CodePoint> = points.into_iter().collect();
    points.sort_unstable();
    points.dedup();

    let mut out: Vec<Interval> = Vec::new();
    for cp in points {
        match out.last_mut() {
            Some(last) if last.end + 1 == cp => last.end = cp,
            _ => out.push(Interval::single(cp)),
        }
    }
    out
}

/// Same as `make_intervals`, for inputs already expressed as ranges.
pub fn merge_intervals(ranges: impl IntoIterator<Item = Interval>) -> Vec<Interval> {
    let mut ranges: Vec<Interval> = ranges.into_iter().collect();
    ranges.sort_unstable();

    let mut out: Vec<Interval> = Vec::new();
    for r in ranges {
        match out.last_mut() {
            Some(last) if r.start <= last.end.saturating_add(1) => last.end = last.end.max(r.end),
            _ => out.push(r),
        }
    }
    out
}

/// Sort by start and sweep, extending the open run while the tag matches and
/// the next range touches or overlaps it.
///
/// Overlapping ranges with different tags make the property ambiguous at the
/// first shared code point and are rejected.
pub fn merge_runs<T: Eq>(mut runs: Vec<Run<T>>) -> Result<Vec<Run<T>>, Overlap> {
    runs.sort_by_key(|r| r.start);

    let mut out: Vec<Run<T>> = Vec::with_capacity(runs.len());
    for run in runs {
        if let Some(open) = out.last_mut() {
            let touches = run.start <= open.end.saturating_add(1);
            if touches && run.tag == open.tag {
                open.end = open.end.max(run.end);
                continue;
            }
            if run.start <= open.end {
                return Err(Overlap { at: run.start });
            }
        }
        out.push(run);
    }
    Ok(out)
}

pub fn merge_assignments<T: Eq>(assignments: Vec<Assignment<T>>) -> Result<Vec<Run<T>>, Overlap> {
    merge_runs(assignments.into_iter().map(Run::from).collect())
}

// ------------------------------- Tests ------------------------------------ //


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn make_intervals_round_trips(points in prop::collection::vec(0u32..600, 0..200)) {
            let mut expected = points.clone();
            expected.sort_unstable();
            expected.dedup();

            let intervals = make_intervals(points);
            let expanded: Vec<CodePoint> = intervals.iter().flat_map(|iv| iv.code_points()).collect();
            prop_assert_eq!(expanded, expected);
            for pair in intervals.windows(2) {
                prop_assert!(pair[0].end + 1 < pair[1].start, "intervals must be maximal");
            }
        }
    }
}
