use crate::exercise::Exercise;
use std::time::{Duration, Instant};

/// Lifecycle of a typing attempt. One-directional; a new attempt means a new
/// session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Completed,
}

/// One keystroke event delivered by the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypingEvent {
    Character(char),
    Backspace,
    WordBoundary,
}

/// Side effects the rendering layer interprets. The session itself never
/// touches a display primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The active word moved to a new line; carries the rendered text of the
    /// newly current line.
    LineAdvanced(String),
    Completed,
}

/// Outcome of one finalized word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedWordResult {
    pub expected: String,
    pub typed: String,
    pub correct: bool,
}

/// Tracks a user's progress through an exercise, one keystroke at a time.
///
/// Events arriving while Idle or Completed are silently ignored; advancing
/// past the last line is the expected terminal condition, not an error.
#[derive(Debug)]
pub struct TypingSession {
    exercise: Exercise,
    phase: Phase,
    curr_line: usize,
    curr_word: usize,
    typed: String,
    active_mismatch: bool,
    results: Vec<TypedWordResult>,
    started_at: Option<Instant>,
}

impl TypingSession {
    pub fn new(exercise: Exercise) -> Self {
        Self {
            exercise,
            phase: Phase::Idle,
            curr_line: 0,
            curr_word: 0,
            typed: String::new(),
            active_mismatch: false,
            results: Vec::new(),
            started_at: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    pub fn curr_line(&self) -> usize {
        self.curr_line
    }

    pub fn curr_word(&self) -> usize {
        self.curr_word
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn results(&self) -> &[TypedWordResult] {
        &self.results
    }

    pub fn active_mismatch(&self) -> bool {
        self.active_mismatch
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Correctness of the words already finalized on the current line, in
    /// word order. Feeds the highlighter.
    pub fn line_correctness(&self) -> Vec<bool> {
        let tail = self.results.len() - self.curr_word;
        self.results[tail..].iter().map(|r| r.correct).collect()
    }

    /// Expected text of the active word, if the session still has one.
    pub fn active_word(&self) -> Option<&str> {
        self.exercise.line(self.curr_line)?.word(self.curr_word)
    }

    /// Idle → Active. Ignored once the session has left Idle; an exercise
    /// with no lines completes immediately.
    pub fn start(&mut self, now: Instant) {
        if self.phase != Phase::Idle {
            return;
        }
        self.typed.clear();
        self.results.clear();
        self.curr_line = 0;
        self.curr_word = 0;
        self.active_mismatch = false;
        self.started_at = Some(now);
        self.phase = if self.exercise.is_empty() {
            Phase::Completed
        } else {
            Phase::Active
        };
    }

    /// Applies one keystroke event and returns the effects for the display
    /// layer. A no-op (empty effect list) outside the Active phase.
    pub fn apply(&mut self, event: TypingEvent) -> Vec<Effect> {
        if self.phase != Phase::Active {
            return Vec::new();
        }
        match event {
            TypingEvent::Character(c) => {
                self.typed.push(c);
                self.recompute_mismatch();
                Vec::new()
            }
            TypingEvent::Backspace => {
                self.typed.pop();
                self.recompute_mismatch();
                Vec::new()
            }
            TypingEvent::WordBoundary => self.finalize_word(),
        }
    }

    /// Clears the in-progress buffer and the advisory mistyped mark.
    /// Finalized results, position, and the start instant survive.
    pub fn reset(&mut self) {
        self.typed.clear();
        self.active_mismatch = false;
    }

    /// Elapsed time since `start`, for scoring a completed or early-finished
    /// session.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map(|t| now.duration_since(t))
            .unwrap_or_default()
    }

    /// Explicit early finish: Active → Completed without consuming the rest
    /// of the exercise.
    pub fn finish(&mut self) {
        if self.phase == Phase::Active {
            self.phase = Phase::Completed;
        }
    }

    // Advisory flag only: compares the buffer and the expected word over
    // their common prefix, so trailing extra characters do not add a fresh
    // mismatch beyond any existing one.
    fn recompute_mismatch(&mut self) {
        let expected = match self.active_word() {
            Some(w) => w,
            None => return,
        };
        self.active_mismatch = self
            .typed
            .chars()
            .zip(expected.chars())
            .any(|(t, e)| t != e);
    }

    fn finalize_word(&mut self) -> Vec<Effect> {
        let expected = match self.active_word() {
            Some(w) => w.to_string(),
            None => return Vec::new(),
        };
        let typed = std::mem::take(&mut self.typed);
        self.results.push(TypedWordResult {
            correct: typed == expected,
            expected,
            typed,
        });
        self.active_mismatch = false;

        let line_len = self
            .exercise
            .line(self.curr_line)
            .map(|l| l.len())
            .unwrap_or(0);
        if self.curr_word + 1 < line_len {
            self.curr_word += 1;
            return Vec::new();
        }

        match self.exercise.line(self.curr_line + 1) {
            Some(next) => {
                self.curr_line += 1;
                self.curr_word = 0;
                vec![Effect::LineAdvanced(next.render())]
            }
            None => {
                self.phase = Phase::Completed;
                vec![Effect::Completed]
            }
        }
    }
}
