use crate::corpus::WordCorpus;
use itertools::Itertools;
use rand::Rng;

pub const DEFAULT_LINE_WIDTH: usize = 60;

/// One display row of the drill: words rendered joined by single spaces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    words: Vec<String>,
}

impl Line {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word(&self, idx: usize) -> Option<&str> {
        self.words.get(idx).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn render(&self) -> String {
        self.words.iter().join(" ")
    }

    /// Character width of the rendered form.
    pub fn width(&self) -> usize {
        let chars: usize = self.words.iter().map(|w| w.chars().count()).sum();
        chars + self.words.len().saturating_sub(1)
    }
}

/// Generated practice text. An empty exercise signals that generation could
/// not produce anything (unknown language or an empty filtered word set).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exercise {
    lines: Vec<Line>,
}

impl Exercise {
    pub fn from_lines(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Configuration for drill generation
#[derive(Clone, Debug)]
pub struct GenConfig {
    pub num_lines: usize,
    pub top_n_words: usize,
    pub language: String,
    pub ignore_substrings: Vec<String>,
    pub max_line_width: usize,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            num_lines: 10,
            top_n_words: 200,
            language: "english".to_string(),
            ignore_substrings: Vec::new(),
            max_line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// Samples words from a corpus and wraps them into budgeted lines.
pub struct ExerciseGenerator {
    config: GenConfig,
}

impl ExerciseGenerator {
    pub fn new(config: GenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Draws words uniformly at random, with replacement, from the filtered
    /// top-N slice of the language's list and closes lines as the width
    /// budget fills. Only fully closed lines are returned; the trailing
    /// in-progress line is discarded.
    pub fn generate<R: Rng>(&self, corpus: &WordCorpus, rng: &mut R) -> Exercise {
        let pool = self.word_pool(corpus);
        if pool.is_empty() {
            return Exercise::default();
        }

        let max_width = self.config.max_line_width;
        let mut lines: Vec<Line> = Vec::with_capacity(self.config.num_lines);
        let mut current: Vec<String> = Vec::new();
        let mut width = 0usize;

        while lines.len() < self.config.num_lines {
            let word = pool[rng.gen_range(0..pool.len())];
            let wlen = word.chars().count();

            if current.is_empty() {
                if wlen > max_width {
                    // an over-width word always sits alone on a closed line
                    lines.push(Line::new(vec![word.clone()]));
                } else {
                    current.push(word.clone());
                    width = wlen;
                }
            } else if width + wlen + 1 > max_width {
                lines.push(Line::new(std::mem::take(&mut current)));
                if wlen > max_width {
                    if lines.len() < self.config.num_lines {
                        lines.push(Line::new(vec![word.clone()]));
                    }
                } else {
                    current.push(word.clone());
                    width = wlen;
                }
            } else {
                current.push(word.clone());
                width += wlen + 1;
            }
        }

        Exercise { lines }
    }

    fn word_pool<'a>(&self, corpus: &'a WordCorpus) -> Vec<&'a String> {
        let ranked = corpus.words_for(&self.config.language);
        let top = &ranked[..self.config.top_n_words.min(ranked.len())];
        top.iter()
            .filter(|w| !self.config.ignore_substrings.iter().any(|s| w.contains(s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn corpus_of(words: &[&str]) -> WordCorpus {
        let mut corpus = WordCorpus::default();
        corpus.merge("english", words.iter().map(|w| w.to_string()).collect());
        corpus
    }

    fn config(num_lines: usize, top_n: usize, width: usize) -> GenConfig {
        GenConfig {
            num_lines,
            top_n_words: top_n,
            language: "english".to_string(),
            ignore_substrings: Vec::new(),
            max_line_width: width,
        }
    }

    #[test]
    fn line_render_joins_with_single_spaces() {
        let line = Line::new(vec!["the".into(), "of".into(), "and".into()]);
        assert_eq!(line.render(), "the of and");
        assert_eq!(line.width(), 10);
    }

    #[test]
    fn produces_requested_line_count() {
        let corpus = corpus_of(&["the", "of", "and", "to", "in"]);
        let gen = ExerciseGenerator::new(config(5, 5, 20));
        let mut rng = StdRng::seed_from_u64(7);
        let exercise = gen.generate(&corpus, &mut rng);
        assert_eq!(exercise.len(), 5);
    }

    #[test]
    fn lines_respect_width_budget() {
        let corpus = corpus_of(&["the", "of", "and", "to", "in", "that", "was"]);
        let gen = ExerciseGenerator::new(config(8, 7, 20));
        let mut rng = StdRng::seed_from_u64(42);
        let exercise = gen.generate(&corpus, &mut rng);
        for line in exercise.lines() {
            assert!(!line.is_empty());
            assert!(line.width() <= 20, "line too wide: {:?}", line.render());
        }
    }

    #[test]
    fn over_width_word_sits_alone() {
        let corpus = corpus_of(&["incomprehensibilities"]);
        let gen = ExerciseGenerator::new(config(3, 1, 10));
        let mut rng = StdRng::seed_from_u64(1);
        let exercise = gen.generate(&corpus, &mut rng);
        assert_eq!(exercise.len(), 3);
        for line in exercise.lines() {
            assert_eq!(line.len(), 1);
            assert_eq!(line.word(0), Some("incomprehensibilities"));
        }
    }

    #[test]
    fn unknown_language_yields_empty_exercise() {
        let corpus = corpus_of(&["the", "of"]);
        let mut cfg = config(5, 10, 20);
        cfg.language = "xx".to_string();
        let gen = ExerciseGenerator::new(cfg);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(gen.generate(&corpus, &mut rng).is_empty());
    }

    #[test]
    fn fully_filtered_pool_yields_empty_exercise() {
        let corpus = corpus_of(&["cat", "dog", "bat"]);
        let mut cfg = config(5, 3, 20);
        cfg.ignore_substrings = vec!["a".to_string(), "o".to_string()];
        let gen = ExerciseGenerator::new(cfg);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(gen.generate(&corpus, &mut rng).is_empty());
    }

    #[test]
    fn ignore_filter_removes_matching_words() {
        let corpus = corpus_of(&["cat", "dog", "bat"]);
        let mut cfg = config(4, 3, 15);
        cfg.ignore_substrings = vec!["a".to_string()];
        let gen = ExerciseGenerator::new(cfg);
        let mut rng = StdRng::seed_from_u64(3);
        let exercise = gen.generate(&corpus, &mut rng);
        for line in exercise.lines() {
            for word in line.words() {
                assert_eq!(word, "dog");
            }
        }
    }

    #[test]
    fn top_n_limits_the_pool() {
        let corpus = corpus_of(&["the", "zebra", "yonder"]);
        let gen = ExerciseGenerator::new(config(3, 1, 12));
        let mut rng = StdRng::seed_from_u64(11);
        let exercise = gen.generate(&corpus, &mut rng);
        for line in exercise.lines() {
            for word in line.words() {
                assert_eq!(word, "the");
            }
        }
    }

    #[test]
    fn top_n_larger_than_list_is_fine() {
        let corpus = corpus_of(&["the", "of"]);
        let gen = ExerciseGenerator::new(config(2, 500, 20));
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(gen.generate(&corpus, &mut rng).len(), 2);
    }

    #[test]
    fn same_seed_same_exercise() {
        let corpus = corpus_of(&["the", "of", "and", "to", "in"]);
        let gen = ExerciseGenerator::new(config(4, 5, 18));
        let a = gen.generate(&corpus, &mut StdRng::seed_from_u64(9));
        let b = gen.generate(&corpus, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
