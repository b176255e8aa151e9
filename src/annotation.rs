/*!
Deserialized form of one line of the gold or predicted JSON-lines files.

```json
{"tokens": ["He", "ran", "home"],
 "frames": [{"target": {"name": "Self_motion", "spans": [{"start": 1, "end": 2, "text": "ran"}]},
             "annotationSets": [{"rank": 0, "frameElements": [
                 {"name": "Self_mover", "spans": [{"start": 0, "end": 1, "text": "He"}]}]}]}],
 "wsl": [], "ner": [], "pos": [{"start": 0, "end": 1, "name": "prp"}]}
```

Unknown fields are ignored. Only the gold file needs `wsl`, `ner` and `pos`.
*/
use crate::error::Result;
use crate::span::Span;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// One contiguous piece of an annotated element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SpanBounds {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Anything annotated with a list of (possibly discontinuous) pieces.
pub trait HasSpans {
    fn bounds(&self) -> &[SpanBounds];

    /// Joins the pieces into a single `Span`.
    fn span(&self) -> Result<Span> {
        span_from_bounds(self.bounds())
    }
}

pub fn span_from_bounds(bounds: &[SpanBounds]) -> Result<Span> {
    let flat: Vec<usize> = bounds.iter().flat_map(|b| [b.start, b.end]).collect();
    Span::new(&flat)
}

/// The frame-evoking word(s). `name` is absent when only target identification was done.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Target {
    #[serde(default)]
    pub name: Option<String>,
    pub spans: Vec<SpanBounds>,
}

impl HasSpans for Target {
    fn bounds(&self) -> &[SpanBounds] {
        &self.spans
    }
}

impl Target {
    /// Text of the first piece, as written in the annotation.
    pub fn first_text(&self) -> Option<&str> {
        self.spans.first().and_then(|b| b.text.as_deref())
    }
}

/// A role-labeled argument of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FrameElement {
    pub name: String,
    pub spans: Vec<SpanBounds>,
}

impl HasSpans for FrameElement {
    fn bounds(&self) -> &[SpanBounds] {
        &self.spans
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnnotationSet {
    #[serde(default)]
    pub rank: Option<usize>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(rename = "frameElements", default)]
    pub frame_elements: Vec<FrameElement>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Frame {
    pub target: Target,
    #[serde(rename = "annotationSets", default, skip_serializing_if = "Option::is_none")]
    pub annotation_sets: Option<Vec<AnnotationSet>>,
}

impl Frame {
    /// Arguments of the top-ranked annotation set, indexed by span. The remaining k-best sets are
    /// ignored. A frame without annotation sets has no arguments.
    pub fn top_ranked_arguments(&self) -> Result<AHashMap<Span, String>> {
        let Some(top) = self.annotation_sets.as_ref().and_then(|sets| sets.first()) else {
            return Ok(AHashMap::new());
        };
        top.frame_elements
            .iter()
            .map(|fe| fe.span().map(|span| (span, fe.name.clone())))
            .collect()
    }
}

/// A multiword expression, named entity or part-of-speech tag over a contiguous range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaggedRange {
    pub start: usize,
    pub end: usize,
    pub name: String,
    #[serde(default)]
    pub text: String,
}

impl TaggedRange {
    pub fn span(&self) -> Span {
        Span::range(self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GoldSentence {
    pub tokens: Vec<String>,
    #[serde(default)]
    pub frames: Vec<Frame>,
    /// Multiword expressions.
    #[serde(default)]
    pub wsl: Vec<TaggedRange>,
    #[serde(default)]
    pub ner: Vec<TaggedRange>,
    #[serde(default)]
    pub pos: Vec<TaggedRange>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PredictedSentence {
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLD_LINE: &str = r#"{"tokens": ["He", "ran", "home"],
        "frames": [{"target": {"name": "Self_motion", "spans": [{"start": 1, "end": 2, "text": "ran"}]},
                    "annotationSets": [{"rank": 0, "score": 1.0, "frameElements": [
                        {"name": "Self_mover", "spans": [{"start": 0, "end": 1, "text": "He"}]},
                        {"name": "Goal", "spans": [{"start": 2, "end": 3, "text": "home"}]}]},
                        {"rank": 1, "frameElements": []}]}],
        "wsl": [], "ner": [], "pos": [{"start": 0, "end": 1, "name": "prp"}],
        "extra_field": 3}"#;

    #[test]
    fn test_deserialize_gold() {
        let gold: GoldSentence = serde_json::from_str(GOLD_LINE).unwrap();
        assert_eq!(gold.tokens, vec!["He", "ran", "home"]);
        assert_eq!(gold.pos[0].name, "prp");
        let frame = &gold.frames[0];
        assert_eq!(frame.target.span().unwrap(), Span::range(1, 2));
        assert_eq!(frame.target.first_text(), Some("ran"));
        let args = frame.top_ranked_arguments().unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[&Span::range(2, 3)], "Goal");
    }

    #[test]
    fn test_prediction_without_annotation_sets() {
        let line = r#"{"frames": [{"target": {"spans": [{"start": 0, "end": 1}, {"start": 2, "end": 3}]}}]}"#;
        let pred: PredictedSentence = serde_json::from_str(line).unwrap();
        let frame = &pred.frames[0];
        assert_eq!(frame.target.name, None);
        assert_eq!(
            frame.target.span().unwrap(),
            Span::new(&[0, 1, 2, 3]).unwrap()
        );
        assert!(frame.top_ranked_arguments().unwrap().is_empty());
    }

    #[test]
    fn test_overlapping_pieces_are_rejected() {
        let target = Target {
            name: None,
            spans: vec![
                SpanBounds { start: 0, end: 2, text: None },
                SpanBounds { start: 1, end: 3, text: None },
            ],
        };
        assert!(target.span().is_err());
    }
}
