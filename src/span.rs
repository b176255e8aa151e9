/*!
A `Span` is a set of token indices stored as a union of sorted, disjoint, non-touching half-open
ranges. Unlike `std::ops::Range`, it can be discontinuous (`Span(3,6, 9,12)`) and it can be
used as a key of a hash map or a member of a hash set.

Equality and hashing look at the stored ranges, not at the indices they cover. Since ranges are
normalized at construction, two spans built from the same indices compare equal in practice.
*/
use crate::error::{FrameEvalError, Result};
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::ops::Add;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Span {
    /// `(start, stop)` pairs, sorted by start. Never empty.
    ranges: Box<[(usize, usize)]>,
}

#[inline]
fn ranges_intersect(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0.max(b.0) < a.1.min(b.1)
}

impl Span {
    /// Builds a span from a flat list of bounds: `start0, stop0, start1, stop1, ...`.
    ///
    /// The pairs are sorted by start; pairs where one stop equals the next start are fused.
    /// Fails if the list is empty, has an odd length or contains overlapping ranges.
    pub fn new(bounds: &[usize]) -> Result<Self> {
        if bounds.is_empty() || bounds.len() % 2 != 0 {
            return Err(FrameEvalError::invalid_span(format!(
                "the constructor needs a positive even number of bounds, got {:?}",
                bounds
            )));
        }
        let pairs = bounds
            .chunks_exact(2)
            .map(|c| (c[0], c[1]))
            .sorted()
            .collect::<Vec<_>>();
        let mut ranges: Vec<(usize, usize)> = Vec::with_capacity(pairs.len());
        for (start, stop) in pairs {
            if start > stop {
                return Err(FrameEvalError::invalid_span(format!(
                    "the range {}..{} is reversed, got {:?}",
                    start, stop, bounds
                )));
            }
            if ranges.iter().any(|r| ranges_intersect(*r, (start, stop))) {
                return Err(FrameEvalError::invalid_span(format!(
                    "the constructor must not receive overlapping ranges, got {:?}",
                    bounds
                )));
            }
            match ranges.last_mut() {
                Some(last) if last.1 == start => last.1 = stop,
                _ => ranges.push((start, stop)),
            }
        }
        Ok(Span {
            ranges: ranges.into_boxed_slice(),
        })
    }

    /// Single-range span `[start, stop)`. Unchecked: callers guarantee `start <= stop`.
    pub(crate) fn range(start: usize, stop: usize) -> Self {
        debug_assert!(start <= stop, "reversed range {}..{}", start, stop);
        Span {
            ranges: Box::new([(start, stop)]),
        }
    }

    /// Span covering exactly one token.
    pub(crate) fn token(index: usize) -> Self {
        Self::range(index, index + 1)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.ranges
            .iter()
            .any(|&(start, stop)| start <= index && index < stop)
    }

    /// Ascending iterator over the covered indices. A new iterator starts from the beginning.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranges.iter().flat_map(|&(start, stop)| start..stop)
    }

    /// Number of distinct covered indices.
    pub fn len(&self) -> usize {
        self.ranges
            .iter()
            .map(|&(start, stop)| stop.saturating_sub(start))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn minstart(&self) -> usize {
        // Ranges are sorted by start.
        self.ranges[0].0
    }

    pub fn maxstop(&self) -> usize {
        // Not always the last stop: a zero-length range may sit inside an earlier one.
        self.ranges.iter().map(|r| r.1).max().unwrap_or_default()
    }

    pub fn ranges(&self) -> &[(usize, usize)] {
        &self.ranges
    }

    /// Concatenates two touching single-range spans, in either order.
    pub fn join(&self, other: &Span) -> Result<Span> {
        let non_adjacent = || FrameEvalError::NonAdjacentSpan(self.clone(), other.clone());
        let (&[(a_start, a_stop)], &[(b_start, b_stop)]) = (&*self.ranges, &*other.ranges) else {
            return Err(non_adjacent());
        };
        if a_stop == b_start {
            Ok(Span::range(a_start, b_stop))
        } else if b_stop == a_start {
            Ok(Span::range(b_start, a_stop))
        } else {
            Err(non_adjacent())
        }
    }

    /// True if every index of `other` is in `self`.
    pub fn encompasses(&self, other: &Span) -> bool {
        other.iter().all(|i| self.contains(i))
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        other.iter().any(|i| self.contains(i))
    }

    /// True if the spans share indices but neither one holds the other.
    pub fn overlaps_partially(&self, other: &Span) -> bool {
        other.iter().any(|i| !self.contains(i)) && self.iter().any(|i| !other.contains(i))
    }

    /// No gaps between `minstart` and `maxstop`.
    pub fn contiguous(&self) -> bool {
        self.maxstop().saturating_sub(self.minstart()) == self.len()
    }

    pub fn subspans(&self) -> Vec<Span> {
        self.ranges
            .iter()
            .map(|&(start, stop)| Span::range(start, stop))
            .collect()
    }

    /// Elements of `sequence` at the covered indices. Indices past the end of the sequence are
    /// skipped, so a span from a differently tokenized sentence never panics.
    pub fn materialize<'a, T>(&self, sequence: &'a [T]) -> Vec<&'a T> {
        self.iter().filter_map(|i| sequence.get(i)).collect()
    }

    /// Same as `materialize`, joined with single spaces.
    pub fn materialize_text<S: AsRef<str>>(&self, sequence: &[S]) -> String {
        self.materialize(sequence)
            .into_iter()
            .map(|s| s.as_ref())
            .join(" ")
    }
}

impl Add<&Span> for &Span {
    type Output = Result<Span>;
    fn add(self, rhs: &Span) -> Self::Output {
        self.join(rhs)
    }
}

/// Best-effort ordering: `a < b` when `a` starts earlier or stops earlier. This is only meant to
/// make outputs deterministic; spans that are "smaller" in both directions are incomparable.
impl PartialOrd for Span {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let less = |a: &Span, b: &Span| a.minstart() < b.minstart() || a.maxstop() < b.maxstop();
        match (less(self, other), less(other, self)) {
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) if self == other => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Span({})",
            self.ranges
                .iter()
                .map(|(start, stop)| format!("{},{}", start, stop))
                .join(", ")
        )
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
