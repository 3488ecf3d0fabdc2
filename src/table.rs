//! Value types shared by every stage of the compiler.
//!
//! - `Interval`: an inclusive code point range (membership tables).
//! - `Run<T>`: an interval carrying one categorical tag.
//! - `AffineRun`: an arithmetic progression of code points sharing one offset.
//!
//! The `check_*` functions enforce the ordering invariants table consumers
//! rely on for binary search. They run on every compiled table before it is
//! handed to an emitter, and again in `table-audit`.
use std::fmt;

use serde::{Deserialize, Serialize};

pub type CodePoint = u32;

pub const MAX_CODE_POINT: CodePoint = 0x10FFFF;

/// Stride recorded for an affine run holding exactly one code point.
pub const SINGLETON_STRIDE: i32 = -1;

// ------------------------------- Interval --------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: CodePoint,
    pub end: CodePoint,
}

impl Interval {
    pub const FULL: Interval = Interval { start: 0, end: MAX_CODE_POINT };

    pub fn new(start: CodePoint, end: CodePoint) -> Self {
        debug_assert!(start <= end, "reversed interval {start:04X}..{end:04X}");
        Self { start, end }
    }

    pub fn single(cp: CodePoint) -> Self { Self { start: cp, end: cp } }

    pub fn intersect(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Interval { start, end })
    }

    pub fn code_points(&self) -> impl Iterator<Item = CodePoint> + use<> {
        self.start..=self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{:04X}", self.start)
        } else {
            write!(f, "{:04X}..{:04X}", self.start, self.end)
        }
    }
}

// ------------------------------ Assignments ------------------------------- //

/// One explicit row of a property file, as read. Never mutated after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<T> {
    pub range: Interval,
    pub tag: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run<T> {
    pub start: CodePoint,
    pub end: CodePoint,
    pub tag: T,
}

impl<T> Run<T> {
    pub fn new(range: Interval, tag: T) -> Self {
        Self { start: range.start, end: range.end, tag }
    }

    pub fn interval(&self) -> Interval { Interval::new(self.start, self.end) }

    pub fn map_tag<U>(self, f: impl FnOnce(T) -> U) -> Run<U> {
        Run { start: self.start, end: self.end, tag: f(self.tag) }
    }
}

impl<T> From<Assignment<T>> for Run<T> {
    fn from(a: Assignment<T>) -> Self { Run::new(a.range, a.tag) }
}

/// Two explicit assignments disagree about one code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("conflicting assignments for U+{at:04X}")]
pub struct Overlap {
    pub at: CodePoint,
}

// ------------------------------- Affine runs ------------------------------ //

/// `cp ↦ cp + delta` for every `cp` in `start, start + stride, ..` up to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffineRun {
    pub start: CodePoint,
    pub end: CodePoint,
    pub stride: i32,
    pub delta: i32,
}

impl AffineRun {
    pub fn is_singleton(&self) -> bool { self.stride == SINGLETON_STRIDE }

    /// Distance between progression points; `None` for a malformed stride.
    fn step(&self) -> Option<u32> {
        match self.stride {
            SINGLETON_STRIDE => Some(1),
            stride if stride > 0 => Some(stride as u32),
            _ => None,
        }
    }

    /// Mapped value for `cp`, if `cp` is one of this run's progression points.
    pub fn map(&self, cp: CodePoint) -> Option<CodePoint> {
        if cp < self.start || cp > self.end {
            return None;
        }
        if (cp - self.start) % self.step()? != 0 {
            return None;
        }
        Some(cp.wrapping_add_signed(self.delta))
    }

    /// Expand back into `(code point, mapped)` pairs. A malformed stride
    /// expands to nothing.
    pub fn pairs(&self) -> impl Iterator<Item = (CodePoint, CodePoint)> + use<> {
        let (range, step) = match self.step() {
            Some(step) => (self.start..=self.end, step as usize),
            None => (1..=0, 1),
        };
        let delta = self.delta;
        range.step_by(step).map(move |cp| (cp, cp.wrapping_add_signed(delta)))
    }
}

// -------------------------------- Lookup ---------------------------------- //

/// Binary search over an ordered run list, the way a table consumer does it.
pub fn lookup<T>(runs: &[Run<T>], cp: CodePoint) -> Option<&T> {
    let idx = runs.partition_point(|r| r.end < cp);
    runs.get(idx).filter(|r| r.start <= cp).map(|r| &r.tag)
}

pub fn contains(intervals: &[Interval], cp: CodePoint) -> bool {
    let idx = intervals.partition_point(|r| r.end < cp);
    intervals.get(idx).is_some_and(|r| r.start <= cp)
}

pub fn lookup_affine(runs: &[AffineRun], cp: CodePoint) -> Option<CodePoint> {
    let idx = runs.partition_point(|r| r.end < cp);
    runs.get(idx).and_then(|r| r.map(cp))
}

// ------------------------------- Invariants ------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("entry {index} ends before it starts")]
    Reversed { index: usize },
    #[error("entry {index} starts at or before the end of the previous entry")]
    Unordered { index: usize },
    #[error("entry {index} is adjacent to the previous entry with the same value")]
    NotMaximal { index: usize },
    #[error("no entry covers U+{at:04X}")]
    Gap { at: CodePoint },
    #[error("entry {index} ends past U+10FFFF")]
    OutOfRange { index: usize },
    #[error("affine entry {index} has stride {stride} that does not reach its end")]
    BadStride { index: usize, stride: i32 },
    #[error("table is empty")]
    Empty,
}

/// Sorted ascending and pairwise non-overlapping.
pub fn check_ordered<T>(runs: &[Run<T>]) -> Result<(), InvariantViolation> {
    check_intervals(runs.iter().map(Run::interval))
}

fn check_intervals(iter: impl Iterator<Item = Interval>) -> Result<(), InvariantViolation> {
    let mut prev_end: Option<CodePoint> = None;
    for (index, iv) in iter.enumerate() {
        if iv.start > iv.end {
            return Err(InvariantViolation::Reversed { index });
        }
        if iv.end > MAX_CODE_POINT {
            return Err(InvariantViolation::OutOfRange { index });
        }
        if prev_end.is_some_and(|end| iv.start <= end) {
            return Err(InvariantViolation::Unordered { index });
        }
        prev_end = Some(iv.end);
    }
    Ok(())
}

/// Ordered membership intervals with a gap between every neighbour.
pub fn check_membership(intervals: &[Interval]) -> Result<(), InvariantViolation> {
    if intervals.is_empty() {
        return Err(InvariantViolation::Empty);
    }
    check_intervals(intervals.iter().copied())?;
    for (index, pair) in intervals.windows(2).enumerate() {
        if pair[0].end + 1 == pair[1].start {
            return Err(InvariantViolation::NotMaximal { index: index + 1 });
        }
    }
    Ok(())
}

/// Ordered, gap-free over `[0, MAX_CODE_POINT]`, and maximally merged.
pub fn check_total<T: PartialEq>(runs: &[Run<T>]) -> Result<(), InvariantViolation> {
    check_ordered(runs)?;
    let mut next: u64 = 0;
    for (index, run) in runs.iter().enumerate() {
        if u64::from(run.start) != next {
            return Err(InvariantViolation::Gap { at: next as CodePoint });
        }
        if index > 0 && runs[index - 1].tag == run.tag {
            return Err(InvariantViolation::NotMaximal { index });
        }
        next = u64::from(run.end) + 1;
    }
    if next != u64::from(MAX_CODE_POINT) + 1 {
        return Err(InvariantViolation::Gap { at: next as CodePoint });
    }
    Ok(())
}

/// Ascending, non-overlapping, and every stride lands exactly on `end`.
pub fn check_affine(runs: &[AffineRun]) -> Result<(), InvariantViolation> {
    check_intervals(runs.iter().map(|r| Interval { start: r.start, end: r.end }))?;
    for (index, run) in runs.iter().enumerate() {
        let ok = match run.stride {
            SINGLETON_STRIDE => run.start == run.end,
            s if s > 0 => run.end > run.start && (run.end - run.start) % s as u32 == 0,
            _ => false,
        };
        if !ok {
            return Err(InvariantViolation::BadStride { index, stride: run.stride });
        }
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
