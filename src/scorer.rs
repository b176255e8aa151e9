/**
This module scores one predicted sentence against its gold annotation, and a whole corpus of
line-paired sentences.

Scoring is staged. Targets are always scored. Frames are scored only if the parser predicted at
least one frame name, and arguments only if it also predicted at least one argument. Each stage
is reported twice: over all targets, and restricted to the targets the parser got right.
*/
use crate::annotation::{GoldSentence, HasSpans, PredictedSentence};
use crate::config::{ScorerConfig, TokenCheck};
use crate::counter::{PRCounter, RowValue};
use crate::error::{FrameEvalError, Result};
use crate::inventory::{ErrorInventory, Tally};
use crate::nontarget::NonTargets;
use crate::prediction::PredictionIndex;
use crate::span::Span;
use ahash::{AHashMap, AHashSet};
use enum_iterator::Sequence;
use itertools::Itertools;
use log::{debug, info, warn};
use serde_jsonlines::JsonLinesReader;
use std::fmt::Display;
use std::io::BufRead;

/// Rows of the scoring table, in the order they are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
pub enum Metric {
    TargetsByToken,
    TargetsBySpan,
    FramesWithCorrectTargetsIgnoreP,
    FramesCorrectTargetsOnly,
    ArgumentSpansWithCorrectTargets,
    ArgumentsLabeledWithCorrectTargets,
    ArgumentSpansCorrectTargetsOnly,
    ArgumentsLabeledCorrectTargetsOnly,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Self::TargetsByToken => "Targets by token",
            Self::TargetsBySpan => "Targets by span",
            Self::FramesWithCorrectTargetsIgnoreP => "Frames with correct targets (ignore P)",
            Self::FramesCorrectTargetsOnly => "Frames (correct targets only)",
            Self::ArgumentSpansWithCorrectTargets => "Argument spans with correct targets",
            Self::ArgumentsLabeledWithCorrectTargets => "Arguments, labeled, with correct targets",
            Self::ArgumentSpansCorrectTargetsOnly => "Argument spans (correct targets only)",
            Self::ArgumentsLabeledCorrectTargetsOnly => "Arguments, labeled (correct targets only)",
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<Metric> for String {
    fn from(value: Metric) -> Self {
        value.label().to_string()
    }
}

type ArgumentsBySpan = AHashMap<Span, AHashMap<Span, String>>;

fn argument_spans(arguments: &ArgumentsBySpan) -> AHashSet<(Span, Span)> {
    arguments
        .iter()
        .flat_map(|(target, args)| args.keys().map(|arg| (target.clone(), arg.clone())))
        .collect()
}

fn labeled_arguments(arguments: &ArgumentsBySpan) -> AHashSet<(Span, Span, String)> {
    arguments
        .iter()
        .flat_map(|(target, args)| {
            args.iter()
                .map(|(arg, role)| (target.clone(), arg.clone(), role.clone()))
        })
        .collect()
}

fn frame_pairs(frames: &AHashMap<Span, Option<String>>) -> AHashSet<(Span, Option<String>)> {
    frames
        .iter()
        .map(|(span, name)| (span.clone(), name.clone()))
        .collect()
}

/// Counts a missed or extra target. Single-token targets are counted under their POS tag and
/// under `text_TAG`; longer ones under their text.
fn tally_target(tally: &mut Tally, span: &Span, tokens: &[String], non_targets: &NonTargets) {
    let text = span.materialize_text(tokens);
    if span.len() == 1 {
        let pos = non_targets.pos(span);
        tally.increment(pos);
        tally.increment(format!("{}_{}", text, pos));
    } else {
        tally.increment(text);
    }
}

/// Spans sorted by their ranges, so diagnostics come out in a stable order.
fn sorted_spans(spans: &AHashSet<Span>) -> Vec<&Span> {
    spans
        .iter()
        .sorted_by(|a, b| a.ranges().cmp(b.ranges()))
        .collect()
}

/// Scores one sentence and adds its missed and extra targets to `errors`.
///
/// Gold annotations that contradict the exclusion lists are logged, not rejected. A gold target
/// that is itself a multiword expression is taken out of the exclusions.
///
/// The gold and predicted token sequences are not compared here, see `check_tokens`.
pub fn score_sentence(
    gold: &GoldSentence,
    predicted: &PredictedSentence,
    errors: &mut ErrorInventory,
) -> Result<PRCounter> {
    let mut stats = PRCounter::new();
    let num_tokens = gold.tokens.len();
    let prediction = PredictionIndex::from_frames(&predicted.frames)?;
    let has_frame_names = prediction.has_frame_names();
    let has_arguments = prediction.has_arguments();
    let pred_target_spans = prediction.target_spans();
    let PredictionIndex {
        coverage: pred_target_coverage,
        frame_names: mut pred_frames,
        arguments: mut pred_args,
    } = prediction;

    let mut non_targets = NonTargets::from_gold(gold);

    // Target spans with gold frames, plus the other tokens that should be targets on their own.
    let mut gold_target_spans: AHashSet<Span> = AHashSet::new();
    // Tokens inside targets with gold frames.
    let mut gold_frame_target_coverage: AHashSet<usize> = AHashSet::new();
    let mut gold_frames: AHashMap<Span, Option<String>> = AHashMap::new();
    let mut gold_args: ArgumentsBySpan = AHashMap::new();

    for frame in gold.frames.iter() {
        let target_span = frame.target.span()?;
        gold_target_spans.insert(target_span.clone());
        gold_frame_target_coverage.extend(target_span.iter());
        gold_frames.insert(target_span.clone(), frame.target.name.clone());
        gold_args.insert(target_span.clone(), frame.top_ranked_arguments()?);

        if non_targets.excluded.contains(&target_span) {
            if non_targets.wsl.contains_key(&target_span) {
                warn!(
                    "WSL bug: {} {:?}",
                    target_span,
                    target_span.materialize_text(&gold.tokens)
                );
                non_targets.excluded.remove(&target_span);
            } else {
                let entity_types = gold
                    .ner
                    .iter()
                    .filter(|e| e.start == target_span.minstart())
                    .map(|e| e.name.as_str())
                    .sorted()
                    .dedup()
                    .join(", ");
                let text = frame
                    .target
                    .first_text()
                    .map(String::from)
                    .unwrap_or_else(|| target_span.materialize_text(&gold.tokens));
                warn!("Target {:?} is a named entity of type {{{}}}", text, entity_types);
            }
        } else if target_span.len() > 1 {
            for excluded in sorted_spans(&non_targets.excluded) {
                if target_span.overlaps(excluded) {
                    warn!(
                        "Target span {} {:?} overlaps with excluded span {} {:?}",
                        target_span,
                        target_span.materialize_text(&gold.tokens),
                        excluded,
                        excluded.materialize_text(&gold.tokens)
                    );
                }
            }
        }
    }

    // Tokens that should in principle be part of a target.
    let mut gold_target_coverage: AHashSet<usize> = (0..num_tokens).collect();
    for span in non_targets.excluded.iter() {
        for token in span.iter() {
            gold_target_coverage.remove(&token);
        }
    }
    for &token in gold_target_coverage.iter() {
        if !gold_frame_target_coverage.contains(&token) {
            gold_target_spans.insert(Span::token(token));
        }
    }

    stats.set_row(
        Metric::TargetsByToken,
        RowValue::Sized {
            n: num_tokens,
            gold: gold_target_coverage,
            pred: pred_target_coverage,
        },
    )?;
    stats.set_row(
        Metric::TargetsBySpan,
        RowValue::Unsized {
            gold: gold_target_spans.clone(),
            pred: pred_target_spans.clone(),
        },
    )?;

    for span in gold_target_spans.difference(&pred_target_spans) {
        tally_target(&mut errors.miss, span, &gold.tokens, &non_targets);
    }
    for span in pred_target_spans.difference(&gold_target_spans) {
        tally_target(&mut errors.extra, span, &gold.tokens, &non_targets);
    }

    if !has_frame_names {
        debug!("No frame names predicted, scoring targets only");
        return Ok(stats);
    }

    let correct_target_spans: AHashSet<Span> = gold_frames
        .keys()
        .filter(|span| pred_frames.contains_key(*span))
        .cloned()
        .collect();
    stats.set_row(
        Metric::FramesWithCorrectTargetsIgnoreP,
        RowValue::Unsized {
            gold: frame_pairs(&gold_frames),
            pred: frame_pairs(&pred_frames),
        },
    )?;
    gold_frames.retain(|span, _| correct_target_spans.contains(span));
    pred_frames.retain(|span, _| correct_target_spans.contains(span));
    stats.set_row(
        Metric::FramesCorrectTargetsOnly,
        RowValue::Sized {
            n: correct_target_spans.len(),
            gold: frame_pairs(&gold_frames),
            pred: frame_pairs(&pred_frames),
        },
    )?;

    if !has_arguments {
        debug!("No arguments predicted, scoring targets and frames only");
        return Ok(stats);
    }

    // Arguments get credit as soon as their target is right, whatever the predicted frame.
    stats.set_row(
        Metric::ArgumentSpansWithCorrectTargets,
        RowValue::Unsized {
            gold: argument_spans(&gold_args),
            pred: argument_spans(&pred_args),
        },
    )?;
    stats.set_row(
        Metric::ArgumentsLabeledWithCorrectTargets,
        RowValue::Unsized {
            gold: labeled_arguments(&gold_args),
            pred: labeled_arguments(&pred_args),
        },
    )?;
    gold_args.retain(|span, _| correct_target_spans.contains(span));
    pred_args.retain(|span, _| correct_target_spans.contains(span));
    stats.set_row(
        Metric::ArgumentSpansCorrectTargetsOnly,
        RowValue::Unsized {
            gold: argument_spans(&gold_args),
            pred: argument_spans(&pred_args),
        },
    )?;
    stats.set_row(
        Metric::ArgumentsLabeledCorrectTargetsOnly,
        RowValue::Unsized {
            gold: labeled_arguments(&gold_args),
            pred: labeled_arguments(&pred_args),
        },
    )?;

    Ok(stats)
}

/// Compares the token sequences of a gold and a predicted sentence according to `policy`.
/// Predictions that carry no tokens are never checked.
pub fn check_tokens(
    sentence: usize,
    gold: &GoldSentence,
    predicted: &PredictedSentence,
    policy: TokenCheck,
) -> Result<()> {
    if policy == TokenCheck::Disabled
        || predicted.tokens.is_empty()
        || gold.tokens == predicted.tokens
    {
        return Ok(());
    }
    let gold_text = gold.tokens.join(" ");
    let predicted_text = predicted.tokens.join(" ");
    match policy {
        TokenCheck::Strict => Err(FrameEvalError::TokenMismatch {
            sentence,
            gold: gold_text,
            predicted: predicted_text,
        }),
        _ => {
            warn!(
                "Token mismatch in sentence {}: gold {:?}, predicted {:?}",
                sentence, gold_text, predicted_text
            );
            Ok(())
        }
    }
}

/// Scores two JSON-lines streams read in lockstep, one sentence per line, and merges the
/// per-sentence tables. Reading stops at the end of the shorter stream.
pub fn score_corpus<G: BufRead, P: BufRead>(
    gold: G,
    predicted: P,
    config: &ScorerConfig,
    errors: &mut ErrorInventory,
) -> Result<PRCounter> {
    let gold_sentences = JsonLinesReader::new(gold).read_all::<GoldSentence>();
    let predicted_sentences = JsonLinesReader::new(predicted).read_all::<PredictedSentence>();
    let mut scores = PRCounter::new();
    let mut num_sentences = 0;
    for (sentence, (gold, predicted)) in gold_sentences.zip(predicted_sentences).enumerate() {
        let (gold, predicted) = (gold?, predicted?);
        check_tokens(sentence, &gold, &predicted, config.token_check)?;
        let sentence_scores = score_sentence(&gold, &predicted, errors)?;
        debug!("Sentence {}: {} rows", sentence, sentence_scores.len());
        scores.merge(&sentence_scores);
        num_sentences += 1;
    }
    info!("Scored {} sentences", num_sentences);
    Ok(scores)
}
