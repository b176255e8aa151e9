use criterion::{criterion_group, criterion_main, Criterion};
use frameval::{
    score_corpus, score_sentence, AnnotationSet, ErrorInventory, Frame, FrameElement,
    GoldSentence, PredictedSentence, ScorerConfig, SpanBounds, TaggedRange, Target,
};
use pprof::criterion::{Output, PProfProfiler};
use serde::Serialize;

const SENTENCE_LENGTH: usize = 30;

fn bounds(start: usize, end: usize) -> SpanBounds {
    SpanBounds {
        start,
        end,
        text: None,
    }
}

/// One frame every three tokens, with its two neighbours as arguments. `shift` moves the
/// predicted arguments so that some of them are wrong.
fn frames(shift: usize) -> Vec<Frame> {
    (1..SENTENCE_LENGTH - 1)
        .step_by(3)
        .map(|i| Frame {
            target: Target {
                name: Some(format!("Frame_{}", i % 7)),
                spans: vec![bounds(i, i + 1)],
            },
            annotation_sets: Some(vec![AnnotationSet {
                rank: Some(0),
                score: None,
                frame_elements: vec![
                    FrameElement {
                        name: String::from("Agent"),
                        spans: vec![bounds(i - 1, i)],
                    },
                    FrameElement {
                        name: String::from("Theme"),
                        spans: vec![bounds(i + 1, (i + 2 + shift).min(SENTENCE_LENGTH))],
                    },
                ],
            }]),
        })
        .collect()
}

fn gold_sentence() -> GoldSentence {
    let tokens: Vec<String> = (0..SENTENCE_LENGTH).map(|i| format!("w{}", i)).collect();
    let pos = (0..SENTENCE_LENGTH)
        .map(|i| TaggedRange {
            start: i,
            end: i + 1,
            name: String::from(if i % 3 == 1 { "vb" } else { "nn" }),
            text: tokens[i].clone(),
        })
        .collect();
    GoldSentence {
        ner: vec![TaggedRange {
            start: 0,
            end: 2,
            name: String::from("PER"),
            text: format!("{} {}", tokens[0], tokens[1]),
        }],
        wsl: vec![],
        pos,
        frames: frames(0),
        tokens,
    }
}

fn predicted_sentence() -> PredictedSentence {
    PredictedSentence {
        tokens: vec![],
        frames: frames(1),
    }
}

fn to_json_lines<T: Serialize>(value: &T, n_lines: usize) -> String {
    let line = serde_json::to_string(value).unwrap();
    let mut out = String::with_capacity((line.len() + 1) * n_lines);
    for _ in 0..n_lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn benchmark_sentence(c: &mut Criterion) {
    let gold = gold_sentence();
    let pred = predicted_sentence();
    c.bench_function("score_sentence", |b| {
        b.iter(|| {
            let mut errors = ErrorInventory::new();
            score_sentence(&gold, &pred, &mut errors).unwrap()
        })
    });
}

fn benchmark_corpus(c: &mut Criterion) {
    let gold = to_json_lines(&gold_sentence(), 1000);
    let pred = to_json_lines(&predicted_sentence(), 1000);
    let config = ScorerConfig::default();
    c.bench_function("score_corpus_1000_sentences", |b| {
        b.iter(|| {
            let mut errors = ErrorInventory::new();
            score_corpus(gold.as_bytes(), pred.as_bytes(), &config, &mut errors).unwrap()
        })
    });
}

criterion_group!(
    name=score_benches;
    config = Criterion::default().sample_size(50).with_profiler(PProfProfiler::new(3000, Output::Flamegraph(None)));
    targets = benchmark_sentence,
    benchmark_corpus
);
criterion_main!(score_benches);
