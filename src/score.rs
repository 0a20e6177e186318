use crate::session::TypedWordResult;
use chrono::prelude::*;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Score {
    pub wpm: f64,
    pub accuracy: f64,
}

/// Words per minute and accuracy over the finalized words of a session.
///
/// Accuracy is a fraction in `0.0..=1.0`; both values are zero when there is
/// nothing to measure.
pub fn compute(results: &[TypedWordResult], elapsed: Duration) -> Score {
    let minutes = elapsed.as_secs_f64() / 60.0;
    let wpm = if minutes > 0.0 {
        results.len() as f64 / minutes
    } else {
        0.0
    };
    let accuracy = if results.is_empty() {
        0.0
    } else {
        results.iter().filter(|r| r.correct).count() as f64 / results.len() as f64
    };
    Score { wpm, accuracy }
}

/// Appends one run to the CSV history, emitting a header when the file is
/// created.
pub fn append_history<P: AsRef<Path>>(
    path: P,
    score: Score,
    words: usize,
    elapsed: Duration,
) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let needs_header = !path.exists();
    let mut log_file = OpenOptions::new().append(true).create(true).open(path)?;

    if needs_header {
        writeln!(log_file, "date,words,elapsed_secs,wpm,accuracy")?;
    }

    writeln!(
        log_file,
        "{},{},{:.2},{:.2},{:.3}",
        Local::now().format("%c"),
        words,
        elapsed.as_secs_f64(),
        score.wpm,
        score.accuracy,
    )
}
