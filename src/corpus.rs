use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

static CORPUS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/corpus");

const EMPTY: &[String] = &[];

/// Ranked word lists keyed by language name.
///
/// The on-disk format is the plain `{"language": ["word", ...]}` shape the
/// fetcher writes; word order is rank order (most frequent first).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordCorpus {
    languages: HashMap<String, Vec<String>>,
}

impl WordCorpus {
    /// The word list compiled into the binary, used when no corpus file
    /// exists yet.
    pub fn bundled() -> Self {
        CORPUS_DIR
            .get_file("default.json")
            .and_then(|f| f.contents_utf8())
            .and_then(|s| serde_json::from_str(s).ok())
            .unwrap_or_default()
    }

    /// Loads a corpus file. A missing or unreadable file degrades to an
    /// empty corpus; it is never an error the caller has to handle.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        fs::read(path.as_ref())
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .unwrap_or_default()
    }

    /// Loads `path` if it holds anything, otherwise falls back to the
    /// bundled list.
    pub fn load_or_bundled<P: AsRef<Path>>(path: P) -> Self {
        let corpus = Self::load(path);
        if corpus.is_empty() {
            Self::bundled()
        } else {
            corpus
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)
    }

    /// Ordered words for `language`, or an empty slice if the language is
    /// unknown.
    pub fn words_for(&self, language: &str) -> &[String] {
        self.languages
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY)
    }

    /// Replaces the word list for `language`.
    pub fn merge(&mut self, language: &str, words: Vec<String>) {
        self.languages.insert(language.to_string(), words);
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }
}
