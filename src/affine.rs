//! Affine compression of case relations.
//!
//! Most case mappings move whole blocks by a constant offset (`A..Z` to
//! `a..z`) or alternate upper/lower every other code point (Latin Extended-A).
//! Both shapes are arithmetic progressions with a fixed delta, so a single
//! greedy pass turns thousands of pairs into a few hundred `AffineRun`s.
use crate::table::{AffineRun, CodePoint, Overlap, SINGLETON_STRIDE};

/// A functional relation `code point -> mapped code point`, sorted by code point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseRelation {
    pairs: Vec<(CodePoint, CodePoint)>,
}

impl CaseRelation {
    /// Sort `pairs` and check that each code point maps to one value.
    /// Exact duplicates are dropped.
    pub fn new(mut pairs: Vec<(CodePoint, CodePoint)>) -> Result<Self, Overlap> {
        pairs.sort_unstable();
        pairs.dedup();
        if let Some(w) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Overlap { at: w[0].0 });
        }
        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[(CodePoint, CodePoint)] { &self.pairs }

    pub fn len(&self) -> usize { self.pairs.len() }

    pub fn is_empty(&self) -> bool { self.pairs.is_empty() }
}

struct OpenRun {
    start: CodePoint,
    end: CodePoint,
    delta: i32,
    stride: Option<u32>,
}

impl OpenRun {
    fn open(cp: CodePoint, delta: i32) -> Self {
        Self { start: cp, end: cp, delta, stride: None }
    }

    fn close(self) -> AffineRun {
        let stride = match self.stride {
            Some(s) => s as i32,
            None => SINGLETON_STRIDE,
        };
        AffineRun { start: self.start, end: self.end, stride, delta: self.delta }
    }
}

fn delta_of(cp: CodePoint, mapped: CodePoint) -> i32 {
    // both sides are <= 0x10FFFF, so the difference always fits
    mapped as i32 - cp as i32
}

/// Greedy left-to-right grouping into affine runs.
///
/// The stride of a new pair is measured from the previous pair, which is
/// always the open run's current end. A run is extended while the delta is
/// unchanged and the stride is either not yet fixed or equal to the fixed one.
pub fn compress(relation: &CaseRelation) -> Vec<AffineRun> {
    let mut out = Vec::new();
    let mut open: Option<OpenRun> = None;

    for &(cp, mapped) in relation.pairs() {
        let delta = delta_of(cp, mapped);
        match open.as_mut() {
            Some(run) if run.delta == delta && run.stride.is_none_or(|s| s == cp - run.end) => {
                run.stride = Some(cp - run.end);
                run.end = cp;
            }
            _ => {
                if let Some(run) = open.take() {
                    out.push(run.close());
                }
                open = Some(OpenRun::open(cp, delta));
            }
        }
    }
    if let Some(run) = open {
        out.push(run.close());
    }
    out
}

/// Inverse of `compress`: every pair covered by `runs`, in order.
pub fn expand(runs: &[AffineRun]) -> Vec<(CodePoint, CodePoint)> {
    runs.iter().flat_map(AffineRun::pairs).collect()
}

// ------------------------------- Tests ------------------------------------ //
