/*!
This library scores the output of a frame-semantic parser against gold annotations. It reads two
parallel JSON-lines files, one sentence per line, and produces a precision / recall / F1 /
accuracy table at several granularities, along with an inventory of the targets the parser
missed or invented.

# Rows of the table
* `Targets by token`: tokens covered by a target. The gold side is every token that is not part
    of a multiword expression or of a named entity that cannot evoke a frame.
* `Targets by span`: whole target spans. Gold tokens that should be targets but carry no gold
    frame count as single-token spans.
* `Frames with correct targets (ignore P)` and `Frames (correct targets only)`: `(target, frame)`
    pairs. Only scored if the parser predicted at least one frame name.
* `Argument spans ...` and `Arguments, labeled, ...`: `(target, argument)` pairs and
    `(target, argument, role)` triples of the top-ranked annotation set. Only scored if the parser
    predicted at least one argument.

Rows of several sentences are merged by adding their base counts, so a corpus score is the sum
of the sentence scores, not their average.

# Terminology
* A span is a set of token indices, possibly discontinuous, e.g. `Span(3,6, 9,12)`.
* A target is the word or words that evoke a frame.
* A frame element (or argument) is a role-labeled span attached to a target.
* Non-targets are the multiword expressions (`wsl`) and the named entities (`ner`) of the gold
    sentence. Weapons, and dates written as a day or month name, may still evoke frames.

#Example
```rust
use frameval::{score_sentence, ErrorInventory, GoldSentence, PredictedSentence};

let gold: GoldSentence = serde_json::from_str(
    r#"{"tokens": ["He", "ran"],
        "frames": [{"target": {"name": "Self_motion", "spans": [{"start": 1, "end": 2}]}}]}"#,
).unwrap();
let predicted: PredictedSentence = serde_json::from_str(
    r#"{"frames": [{"target": {"name": "Self_motion", "spans": [{"start": 1, "end": 2}]}}]}"#,
).unwrap();

let mut errors = ErrorInventory::new();
let scores = score_sentence(&gold, &predicted, &mut errors).unwrap();
assert_eq!(scores.len(), 4);
assert_eq!(scores.get("Targets by span").unwrap().recall, 0.5);
assert_eq!(scores.get("Frames (correct targets only)").unwrap().fscore, 1.0);
assert_eq!(errors.miss.get("He_?"), 1);
```
*/

mod annotation;
mod config;
mod counter;
mod error;
mod inventory;
mod nontarget;
mod prediction;
mod reporter;
mod scorer;
mod span;

// The public api starts here
pub use span::Span;

pub use counter::{PRCounter, Row, RowValue};

pub use reporter::{OutputFormat, OutputFormatParsingError, COLUMNS};

pub use annotation::{
    span_from_bounds, AnnotationSet, Frame, FrameElement, GoldSentence, HasSpans,
    PredictedSentence, SpanBounds, TaggedRange, Target,
};

pub use nontarget::{may_evoke_frame, NonTargets, DATE_NAMES};

pub use prediction::PredictionIndex;

pub use inventory::{ErrorInventory, Tally};

pub use scorer::{check_tokens, score_corpus, score_sentence, Metric};

pub use config::{ParsingTokenCheckError, ScorerConfig, ScorerConfigBuilder, TokenCheck};

pub use error::{FrameEvalError, Result};
