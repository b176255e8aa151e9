//! Span-keyed view of the frames predicted for one sentence.
use crate::annotation::{Frame, HasSpans};
use crate::error::Result;
use crate::span::Span;
use ahash::{AHashMap, AHashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionIndex {
    /// Every token covered by a predicted target.
    pub coverage: AHashSet<usize>,
    /// Frame name of each predicted target. `None` when the parser only identified targets.
    pub frame_names: AHashMap<Span, Option<String>>,
    /// Top-ranked arguments of each predicted target: argument span -> role.
    pub arguments: AHashMap<Span, AHashMap<Span, String>>,
}

impl PredictionIndex {
    pub fn from_frames(frames: &[Frame]) -> Result<Self> {
        let mut index = PredictionIndex::default();
        for frame in frames {
            let target_span = frame.target.span()?;
            index.coverage.extend(target_span.iter());
            index
                .frame_names
                .insert(target_span.clone(), frame.target.name.clone());
            index
                .arguments
                .insert(target_span, frame.top_ranked_arguments()?);
        }
        Ok(index)
    }

    /// True if at least one predicted target carries a non-empty frame name.
    pub fn has_frame_names(&self) -> bool {
        self.frame_names
            .values()
            .any(|name| name.as_deref().is_some_and(|n| !n.is_empty()))
    }

    /// True if at least one predicted target carries an argument.
    pub fn has_arguments(&self) -> bool {
        self.arguments.values().any(|args| !args.is_empty())
    }

    pub fn target_spans(&self) -> AHashSet<Span> {
        self.frame_names.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationSet, FrameElement, SpanBounds, Target};

    fn bounds(start: usize, end: usize) -> SpanBounds {
        SpanBounds {
            start,
            end,
            text: None,
        }
    }

    fn frame(name: Option<&str>, target: Vec<SpanBounds>, args: Option<Vec<(&str, usize, usize)>>) -> Frame {
        Frame {
            target: Target {
                name: name.map(String::from),
                spans: target,
            },
            annotation_sets: args.map(|args| {
                vec![
                    AnnotationSet {
                        rank: Some(0),
                        score: None,
                        frame_elements: args
                            .into_iter()
                            .map(|(role, start, end)| FrameElement {
                                name: role.to_string(),
                                spans: vec![bounds(start, end)],
                            })
                            .collect(),
                    },
                    AnnotationSet {
                        rank: Some(1),
                        score: None,
                        frame_elements: vec![FrameElement {
                            name: String::from("Ignored"),
                            spans: vec![bounds(0, 9)],
                        }],
                    },
                ]
            }),
        }
    }

    #[test]
    fn test_index_predictions() {
        let frames = vec![
            frame(Some("Motion"), vec![bounds(2, 3)], Some(vec![("Theme", 0, 2)])),
            frame(None, vec![bounds(4, 5), bounds(6, 7)], None),
        ];
        let index = PredictionIndex::from_frames(&frames).unwrap();
        let expected_coverage: AHashSet<usize> = [2, 4, 6].into_iter().collect();
        assert_eq!(index.coverage, expected_coverage);
        assert_eq!(
            index.frame_names[&Span::range(2, 3)],
            Some(String::from("Motion"))
        );
        let discontinuous = Span::new(&[4, 5, 6, 7]).unwrap();
        assert_eq!(index.frame_names[&discontinuous], None);
        assert!(index.arguments[&discontinuous].is_empty());
        let args = &index.arguments[&Span::range(2, 3)];
        assert_eq!(args.len(), 1);
        assert_eq!(args[&Span::range(0, 2)], "Theme");
        assert!(index.has_frame_names());
        assert!(index.has_arguments());
        assert_eq!(index.target_spans().len(), 2);
    }

    #[test]
    fn test_targets_only() {
        let frames = vec![frame(None, vec![bounds(1, 2)], None)];
        let index = PredictionIndex::from_frames(&frames).unwrap();
        assert!(!index.has_frame_names());
        assert!(!index.has_arguments());
    }

    #[test]
    fn test_invalid_target() {
        let frames = vec![frame(None, vec![bounds(1, 3), bounds(2, 4)], None)];
        assert!(PredictionIndex::from_frames(&frames).is_err());
    }
}
