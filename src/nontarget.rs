//! Spans of a gold sentence that should not be scored as frame targets on their own.
use crate::annotation::GoldSentence;
use crate::span::Span;
use ahash::{AHashMap, AHashSet};
use std::sync::LazyLock;

const DAYS_AND_MONTHS: [&str; 19] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Day and month names, their three-letter abbreviations, and the abbreviations with a period.
pub static DATE_NAMES: LazyLock<AHashSet<String>> = LazyLock::new(|| {
    DAYS_AND_MONTHS
        .iter()
        .flat_map(|name| {
            let abbreviation = &name[..3];
            [
                name.to_string(),
                abbreviation.to_string(),
                format!("{}.", abbreviation),
            ]
        })
        .collect()
});

/// Named-entity types (lowercased) that may also evoke frames. Corpora tag weapons `WEA`.
const WEAPON: [&str; 2] = ["wea", "weapon"];
const DATE: &str = "date";

/// Named entities of these kinds are not excluded: weapons, and dates written as a day or month
/// name.
pub fn may_evoke_frame(entity_type: &str, text: &str) -> bool {
    WEAPON.contains(&entity_type)
        || (entity_type == DATE && DATE_NAMES.contains(text.to_lowercase().as_str()))
}

#[derive(Debug, Clone, Default)]
pub struct NonTargets {
    /// Multiword expressions: span -> (lowercased type, text).
    pub wsl: AHashMap<Span, (String, String)>,
    /// Named entities: span -> (lowercased type, text).
    pub ner: AHashMap<Span, (String, String)>,
    /// Uppercased part-of-speech tag of each tagged span.
    pub poses: AHashMap<Span, String>,
    /// Multiword expressions plus the named entities that cannot evoke a frame.
    pub excluded: AHashSet<Span>,
}

impl NonTargets {
    pub fn from_gold(gold: &GoldSentence) -> Self {
        let wsl: AHashMap<Span, (String, String)> = gold
            .wsl
            .iter()
            .map(|e| (e.span(), (e.name.to_lowercase(), e.text.clone())))
            .collect();
        let ner: AHashMap<Span, (String, String)> = gold
            .ner
            .iter()
            .map(|e| (e.span(), (e.name.to_lowercase(), e.text.clone())))
            .collect();
        let poses = gold
            .pos
            .iter()
            .map(|e| (e.span(), e.name.to_uppercase()))
            .collect();
        let excluded = wsl
            .keys()
            .cloned()
            .chain(
                ner.iter()
                    .filter(|(_, (entity_type, text))| !may_evoke_frame(entity_type, text))
                    .map(|(span, _)| span.clone()),
            )
            .collect();
        NonTargets {
            wsl,
            ner,
            poses,
            excluded,
        }
    }

    /// Part-of-speech tag of a span, `?` when the span is not tagged.
    pub fn pos(&self, span: &Span) -> &str {
        self.poses.get(span).map(String::as_str).unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::TaggedRange;
    use rstest::rstest;

    fn tagged(start: usize, end: usize, name: &str, text: &str) -> TaggedRange {
        TaggedRange {
            start,
            end,
            name: name.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_date_names() {
        // "may" is its own abbreviation.
        assert_eq!(DATE_NAMES.len(), 19 * 3 - 1);
        assert!(DATE_NAMES.contains("sep."));
        assert!(DATE_NAMES.contains("thu"));
        assert!(!DATE_NAMES.contains("thurs"));
    }

    #[rstest]
    #[case("date", "monday", true)]
    #[case("date", "Monday", true)]
    #[case("date", "JAN.", true)]
    #[case("date", "2024", false)]
    #[case("date", "next monday", false)]
    #[case("wea", "rifle", true)]
    #[case("weapon", "rifle", true)]
    #[case("per", "Monday", false)]
    fn test_may_evoke_frame(#[case] entity_type: &str, #[case] text: &str, #[case] expected: bool) {
        assert_eq!(may_evoke_frame(entity_type, text), expected);
    }

    #[test]
    fn test_excluded_spans() {
        let gold = GoldSentence {
            tokens: ["On", "Monday", "in", "2024", "John", "took", "off", "a", "gun"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            frames: vec![],
            wsl: vec![tagged(5, 7, "VPC", "took off")],
            ner: vec![
                tagged(1, 2, "DATE", "Monday"),
                tagged(3, 4, "DATE", "2024"),
                tagged(4, 5, "PER", "John"),
                tagged(8, 9, "WEA", "gun"),
            ],
            pos: vec![tagged(1, 2, "nnp", "")],
        };
        let non_targets = NonTargets::from_gold(&gold);
        let expected: AHashSet<Span> = [Span::range(5, 7), Span::range(3, 4), Span::range(4, 5)]
            .into_iter()
            .collect();
        assert_eq!(non_targets.excluded, expected);
        assert_eq!(non_targets.wsl[&Span::range(5, 7)].0, "vpc");
        assert_eq!(non_targets.ner[&Span::range(8, 9)].0, "wea");
        assert_eq!(non_targets.pos(&Span::range(1, 2)), "NNP");
        assert_eq!(non_targets.pos(&Span::range(2, 3)), "?");
    }
}
