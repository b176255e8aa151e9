/**
This module holds the scoring table. Each row is keyed by a label and stores the base counts
(matches, predictions, gold items, optionally the correct-token count and the number of slots)
from which precision, recall, F1 and accuracy are derived. Tables of different sentences are
merged by adding the base counts and recomputing the ratios.
*/
use crate::error::{FrameEvalError, Result};
use ahash::AHashSet;
use indexmap::IndexMap;
use serde::Serialize;
use std::hash::Hash;
use std::ops::{Add, AddAssign};

/// Value of a row: a gold set and a predicted set, optionally with the number of slots `n`
/// they were drawn from. Only sized rows get a correct count and an accuracy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValue<T: Hash + Eq> {
    Sized {
        n: usize,
        gold: AHashSet<T>,
        pred: AHashSet<T>,
    },
    Unsized {
        gold: AHashSet<T>,
        pred: AHashSet<T>,
    },
}

/// One line of the table. Ratios are `NaN` when their denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Row {
    /// Size of the intersection of the gold and predicted sets.
    #[serde(rename = "Numer")]
    pub numer: usize,
    /// Size of the predicted set.
    #[serde(rename = "PDenom")]
    pub pdenom: usize,
    /// Size of the gold set.
    #[serde(rename = "RDenom")]
    pub rdenom: usize,
    #[serde(rename = "P")]
    pub precision: f64,
    #[serde(rename = "R")]
    pub recall: f64,
    #[serde(rename = "F")]
    pub fscore: f64,
    /// Number of correctly handled slots.
    #[serde(rename = "T")]
    pub correct: Option<usize>,
    /// Number of slots.
    #[serde(rename = "N")]
    pub n: Option<usize>,
    #[serde(rename = "Acc")]
    pub accuracy: Option<f64>,
}

#[inline]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

#[inline]
fn add_optional(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        (a, None) => a,
        (None, b) => b,
    }
}

impl Row {
    fn from_counts(
        numer: usize,
        pdenom: usize,
        rdenom: usize,
        correct: Option<usize>,
        n: Option<usize>,
    ) -> Self {
        let mut row = Row {
            numer,
            pdenom,
            rdenom,
            precision: f64::NAN,
            recall: f64::NAN,
            fscore: f64::NAN,
            correct,
            n,
            accuracy: None,
        };
        row.recompute();
        row
    }

    /// Derives P, R, F and Acc from the base counts.
    fn recompute(&mut self) {
        self.precision = ratio(self.numer, self.pdenom);
        self.recall = ratio(self.numer, self.rdenom);
        let sum = self.precision + self.recall;
        // `NaN > 0.0` is false, so undefined P or R gives an undefined F.
        self.fscore = if sum > 0.0 {
            2.0 * self.precision * self.recall / sum
        } else {
            f64::NAN
        };
        self.accuracy = match (self.correct, self.n) {
            (Some(correct), Some(n)) => Some(ratio(correct, n)),
            _ => None,
        };
    }

    fn add_counts(&mut self, other: &Row) {
        self.numer += other.numer;
        self.pdenom += other.pdenom;
        self.rdenom += other.rdenom;
        self.correct = add_optional(self.correct, other.correct);
        self.n = add_optional(self.n, other.n);
        self.recompute();
    }
}

/// Ordered table of rows. Rows keep the order in which their label was first set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PRCounter {
    rows: IndexMap<String, Row>,
}

impl PRCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the row `label` from a gold and a predicted set, replacing any previous row with
    /// the same label.
    ///
    /// For a sized row, the correct count is the match count when both sets fill all the `n`
    /// slots (one label per slot), and `n - false positives - false negatives` otherwise.
    pub fn set_row<T: Hash + Eq>(
        &mut self,
        label: impl Into<String>,
        value: RowValue<T>,
    ) -> Result<()> {
        let label = label.into();
        let row = match value {
            RowValue::Unsized { gold, pred } => {
                let numer = gold.intersection(&pred).count();
                Row::from_counts(numer, pred.len(), gold.len(), None, None)
            }
            RowValue::Sized { n, gold, pred } => {
                let numer = gold.intersection(&pred).count();
                let correct = if gold.len() == n && pred.len() == n {
                    numer as i64
                } else {
                    let false_positives = pred.difference(&gold).count();
                    let false_negatives = gold.difference(&pred).count();
                    n as i64 - false_positives as i64 - false_negatives as i64
                };
                if correct < 0 {
                    return Err(FrameEvalError::NegativeCorrectCount { label, correct });
                }
                Row::from_counts(numer, pred.len(), gold.len(), Some(correct as usize), Some(n))
            }
        };
        self.rows.insert(label, row);
        Ok(())
    }

    /// Adds the base counts of `other` to this table, row by row. Rows missing on one side
    /// count as zero.
    pub fn merge(&mut self, other: &PRCounter) {
        for (label, row) in other.rows.iter() {
            match self.rows.get_mut(label) {
                Some(existing) => existing.add_counts(row),
                None => {
                    self.rows.insert(label.clone(), *row);
                }
            }
        }
    }

    pub fn get(&self, label: &str) -> Option<&Row> {
        self.rows.get(label)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.rows.iter().map(|(label, row)| (label.as_str(), row))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl AddAssign<&PRCounter> for PRCounter {
    fn add_assign(&mut self, rhs: &PRCounter) {
        self.merge(rhs)
    }
}

impl Add for PRCounter {
    type Output = PRCounter;
    fn add(mut self, rhs: PRCounter) -> Self::Output {
        self.merge(&rhs);
        self
    }
}
