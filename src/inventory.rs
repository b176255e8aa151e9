//! Frequency counts of missed and extra targets, accumulated over a whole run.
use ahash::AHashMap;
use itertools::Itertools;
use serde::Serialize;
use std::fmt::Display;

/// A multiset of string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally(AHashMap<String, usize>);

impl Tally {
    pub fn increment(&mut self, key: impl Into<String>) {
        *self.0.entry(key.into()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> usize {
        self.0.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries by decreasing count, ties broken alphabetically.
    pub fn most_common(&self) -> Vec<(&str, usize)> {
        self.0
            .iter()
            .map(|(key, count)| (key.as_str(), *count))
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            .collect()
    }
}

impl Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.most_common()
                .into_iter()
                .map(|(key, count)| format!("{:?}: {}", key, count))
                .join(", ")
        )
    }
}

/// Targets the parser missed and targets it invented. Single-token targets are counted twice:
/// under their part-of-speech tag, and under `text_TAG`. Longer targets are counted under their
/// text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorInventory {
    pub miss: Tally,
    pub extra: Tally,
}

impl ErrorInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: &ErrorInventory) {
        for (key, count) in other.miss.0.iter() {
            *self.miss.0.entry(key.clone()).or_insert(0) += count;
        }
        for (key, count) in other.extra.0.iter() {
            *self.extra.0.entry(key.clone()).or_insert(0) += count;
        }
    }
}

impl Display for ErrorInventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "miss: {}", self.miss)?;
        write!(f, "extra: {}", self.extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally() {
        let mut tally = Tally::default();
        tally.increment("VB");
        tally.increment("NN");
        tally.increment("VB");
        assert_eq!(tally.get("VB"), 2);
        assert_eq!(tally.get("JJ"), 0);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.most_common(), vec![("VB", 2), ("NN", 1)]);
        assert_eq!(tally.to_string(), r#"{"VB": 2, "NN": 1}"#);
    }

    #[test]
    fn test_merge_inventories() {
        let mut first = ErrorInventory::new();
        first.miss.increment("ran_VBD");
        let mut second = ErrorInventory::new();
        second.miss.increment("ran_VBD");
        second.extra.increment("NN");
        first.merge(&second);
        assert_eq!(first.miss.get("ran_VBD"), 2);
        assert_eq!(first.extra.get("NN"), 1);
        assert_eq!(first.to_string(), "miss: {\"ran_VBD\": 2}\nextra: {\"NN\": 1}");
    }
}
