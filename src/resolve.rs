//! Default resolution: turn a partial run list into a total one.
//!
//! Every gap between explicit runs is sliced against the policy overrides in
//! listed order, so an earlier override wins any sub-span it shares with a
//! later one. Whatever no override claims gets the fallback tag. The filled
//! list is merged again so the result stays maximal.
use crate::merge::merge_runs;
use crate::table::{Assignment, Interval, MAX_CODE_POINT, Overlap, Run};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPolicy<T> {
    pub fallback: T,
    pub overrides: Vec<Assignment<T>>,
}

impl<T> DefaultPolicy<T> {
    pub fn fallback(fallback: T) -> Self {
        Self { fallback, overrides: Vec::new() }
    }

    pub fn with_override(mut self, range: Interval, tag: T) -> Self {
        self.overrides.push(Assignment { range, tag });
        self
    }

    /// Convert every tag, failing on the first one `f` rejects.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<DefaultPolicy<U>, E> {
        let fallback = f(self.fallback)?;
        let overrides = self
            .overrides
            .into_iter()
            .map(|o| -> Result<Assignment<U>, E> { Ok(Assignment { range: o.range, tag: f(o.tag)? }) })
            .collect::<Result<Vec<_>, E>>()?;
        Ok(DefaultPolicy { fallback, overrides })
    }

    /// Build a policy from `# @missing` directives.
    ///
    /// A directive spanning the whole code space supplies the fallback. The
    /// rest become overrides, most recent first, since later directives in a
    /// property file refine earlier ones.
    pub fn from_directives(directives: Vec<Assignment<T>>, builtin_fallback: T) -> Self {
        let mut fallback = builtin_fallback;
        let mut overrides = Vec::new();
        for d in directives {
            if d.range == Interval::FULL {
                fallback = d.tag;
            } else {
                overrides.push(d);
            }
        }
        overrides.reverse();
        Self { fallback, overrides }
    }
}

/// The gaps left uncovered by an ordered, non-overlapping run list.
pub fn gaps<T>(runs: &[Run<T>]) -> Vec<Interval> {
    let mut out = Vec::new();
    let mut next: u32 = 0;
    for run in runs {
        if run.start > next {
            out.push(Interval::new(next, run.start - 1));
        }
        next = run.end + 1;
    }
    if next <= MAX_CODE_POINT {
        out.push(Interval::new(next, MAX_CODE_POINT));
    }
    out
}

/// Slice one gap against the policy. The result is sorted by start.
pub fn fill_gap<T: Clone>(gap: Interval, policy: &DefaultPolicy<T>) -> Vec<Run<T>> {
    let mut pieces: Vec<Run<T>> = Vec::new();
    let mut unclaimed = vec![gap];

    for o in &policy.overrides {
        let mut remaining = Vec::with_capacity(unclaimed.len() + 1);
        for span in unclaimed {
            match span.intersect(&o.range) {
                None => remaining.push(span),
                Some(hit) => {
                    pieces.push(Run::new(hit, o.tag.clone()));
                    if hit.start > span.start {
                        remaining.push(Interval::new(span.start, hit.start - 1));
                    }
                    if hit.end < span.end {
                        remaining.push(Interval::new(hit.end + 1, span.end));
                    }
                }
            }
        }
        unclaimed = remaining;
        if unclaimed.is_empty() {
            break;
        }
    }

    pieces.extend(unclaimed.into_iter().map(|span| Run::new(span, policy.fallback.clone())));
    pieces.sort_by_key(|r| r.start);
    pieces
}

/// Fill every gap of `explicit` and re-merge into a total, maximal run list
/// over `[0, MAX_CODE_POINT]`.
pub fn resolve<T: Clone + Eq>(explicit: Vec<Run<T>>, policy: &DefaultPolicy<T>) -> Result<Vec<Run<T>>, Overlap> {
    let explicit = merge_runs(explicit)?;
    let mut filled: Vec<Run<T>> = Vec::with_capacity(explicit.len() * 2 + 1);
    for gap in gaps(&explicit) {
        filled.extend(fill_gap(gap, policy));
    }
    filled.extend(explicit);
    merge_runs(filled)
}

// ------------------------------- Tests ------------------------------------ //
