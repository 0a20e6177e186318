// Headless integration of the full pipeline without a TTY:
// corpus -> generator -> session -> highlighter/score.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;

use keydrill::corpus::WordCorpus;
use keydrill::exercise::{ExerciseGenerator, GenConfig};
use keydrill::highlight::{compute_highlights, HighlightTag};
use keydrill::score;
use keydrill::session::{Effect, Phase, TypingEvent, TypingSession};

fn test_corpus() -> WordCorpus {
    let mut corpus = WordCorpus::default();
    corpus.merge(
        "english",
        ["the", "of", "and", "to", "in", "that", "was"]
            .iter()
            .map(|w| w.to_string())
            .collect(),
    );
    corpus
}

fn generate(num_lines: usize, width: usize, seed: u64) -> keydrill::exercise::Exercise {
    let gen = ExerciseGenerator::new(GenConfig {
        num_lines,
        top_n_words: 7,
        max_line_width: width,
        ..GenConfig::default()
    });
    gen.generate(&test_corpus(), &mut StdRng::seed_from_u64(seed))
}

#[test]
fn perfect_run_scores_full_accuracy() {
    let exercise = generate(3, 20, 17);
    let words: Vec<String> = exercise
        .lines()
        .iter()
        .flat_map(|l| l.words().iter().cloned())
        .collect();

    let mut session = TypingSession::new(exercise);
    let t0 = Instant::now();
    session.start(t0);

    let mut completed = false;
    for word in &words {
        for c in word.chars() {
            session.apply(TypingEvent::Character(c));
            assert!(!session.active_mismatch());
        }
        if session
            .apply(TypingEvent::WordBoundary)
            .contains(&Effect::Completed)
        {
            completed = true;
        }
    }

    assert!(completed);
    assert_eq!(session.phase(), Phase::Completed);

    let score = score::compute(session.results(), Duration::from_secs(60));
    assert_eq!(score.accuracy, 1.0);
    assert_eq!(score.wpm, words.len() as f64);
}

#[test]
fn mistakes_show_up_in_highlights_and_score() {
    let exercise = generate(1, 30, 3);
    let line = exercise.line(0).unwrap().clone();
    assert!(line.len() >= 2, "need at least two words on the line");

    let mut session = TypingSession::new(exercise);
    session.start(Instant::now());

    // Mangle the first word, type the second correctly.
    let first: String = line.word(0).unwrap().chars().rev().collect();
    for c in first.chars() {
        session.apply(TypingEvent::Character(c));
    }
    session.apply(TypingEvent::WordBoundary);
    for c in line.word(1).unwrap().chars() {
        session.apply(TypingEvent::Character(c));
    }

    let ranges = compute_highlights(
        &line,
        &session.line_correctness(),
        session.curr_word(),
        session.active_mismatch(),
    );

    let first_len = line.word(0).unwrap().chars().count();
    assert!(ranges
        .iter()
        .any(|r| r.tag == HighlightTag::Mistyped && r.start == 0 && r.end == first_len));
    assert!(ranges
        .iter()
        .any(|r| r.tag == HighlightTag::Active && r.start == first_len + 1));

    session.apply(TypingEvent::WordBoundary);
    let results = session.results();
    // single-character first words reverse to themselves
    if first_len > 1 {
        assert!(!results[0].correct);
    }
    assert!(results[1].correct);
}

#[test]
fn line_advance_effect_matches_exercise_text() {
    let exercise = generate(2, 18, 5);
    let expected_next = exercise.line(1).unwrap().render();
    let first_line: Vec<String> = exercise.line(0).unwrap().words().to_vec();

    let mut session = TypingSession::new(exercise);
    session.start(Instant::now());

    let mut effects = Vec::new();
    for word in &first_line {
        for c in word.chars() {
            session.apply(TypingEvent::Character(c));
        }
        effects.extend(session.apply(TypingEvent::WordBoundary));
    }

    assert_eq!(effects, [Effect::LineAdvanced(expected_next)]);
}

#[test]
fn early_finish_still_produces_a_score() {
    let exercise = generate(4, 25, 8);
    let first = exercise.line(0).unwrap().word(0).unwrap().to_string();

    let mut session = TypingSession::new(exercise);
    let t0 = Instant::now();
    session.start(t0);
    for c in first.chars() {
        session.apply(TypingEvent::Character(c));
    }
    session.apply(TypingEvent::WordBoundary);
    session.finish();

    assert_eq!(session.phase(), Phase::Completed);
    let score = score::compute(session.results(), Duration::from_secs(30));
    assert_eq!(score.wpm, 2.0);
    assert_eq!(score.accuracy, 1.0);
}

#[test]
fn bundled_corpus_supports_generation_end_to_end() {
    let corpus = WordCorpus::load_or_bundled("/nonexistent/corpus.json");
    let gen = ExerciseGenerator::new(GenConfig {
        num_lines: 5,
        top_n_words: 100,
        ..GenConfig::default()
    });
    let exercise = gen.generate(&corpus, &mut StdRng::seed_from_u64(1));

    assert_eq!(exercise.len(), 5);
    for line in exercise.lines() {
        assert!(!line.is_empty());
        assert!(line.width() <= keydrill::exercise::DEFAULT_LINE_WIDTH);
    }
}
