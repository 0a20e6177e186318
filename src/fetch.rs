use crate::corpus::WordCorpus;
use crate::jsonpath::{get_path, Key};
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::path::Path;

/// Frequency list the bundled english corpus was built from.
pub const DEFAULT_WIKI_URL: &str = "https://en.wiktionary.org/w/api.php?action=query&prop=revisions&titles=Wiktionary:Frequency_lists/English/Wikipedia_(2016)&rvslots=*&rvprop=content&formatversion=2";

/// Minimum alphabetic characters for a harvested word to count as typable.
pub const SHORTEST_WORD: usize = 2;

const REVISION_CONTENT: &[Key<'static>] = &[
    Key::Name("query"),
    Key::Name("pages"),
    Key::Index(0),
    Key::Name("revisions"),
    Key::Index(0),
    Key::Name("slots"),
    Key::Name("main"),
    Key::Name("content"),
];

/// Downloads a wiki frequency-list page and harvests its ranked words.
pub fn fetch_word_list(url: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let body = reqwest::blocking::get(url)?.text()?;
    Ok(parse_word_list(&body))
}

/// Fetches `url`, filters the harvest down to single typable words, merges
/// them into the corpus file at `path`, and reports how many words landed.
pub fn fetch_and_store<P: AsRef<Path>>(
    language: &str,
    url: &str,
    path: P,
) -> Result<usize, Box<dyn Error>> {
    let words = single_words(fetch_word_list(url)?, SHORTEST_WORD);
    let count = words.len();
    let mut corpus = WordCorpus::load(&path);
    corpus.merge(language, words);
    corpus.save(&path)?;
    Ok(count)
}

/// Pulls the ranked word list out of an api.php HTML response: the JSON
/// payload sits entity-escaped inside a `<pre>` block, and the wikitext lives
/// at `query.pages[0].revisions[0].slots.main.content`. Anything missing
/// along the way degrades to an empty list.
pub fn parse_word_list(html: &str) -> Vec<String> {
    let payload = match extract_pre_payload(html) {
        Some(p) => p,
        None => return Vec::new(),
    };
    let json: Value = match serde_json::from_str(&payload) {
        Ok(v) => v,
        Err(_) => return Vec::new(),
    };
    get_path(&json, REVISION_CONTENT)
        .and_then(Value::as_str)
        .map(link_targets)
        .unwrap_or_default()
}

fn extract_pre_payload(html: &str) -> Option<String> {
    let re = Regex::new(r"(?s)<pre[^>]*>(.*?)</pre>").ok()?;
    let escaped = re.captures(html)?.get(1)?.as_str();
    Some(html_escape::decode_html_entities(escaped).into_owned())
}

/// Display halves of `[[target|word]]` wiki links, in page order.
pub fn link_targets(wikitext: &str) -> Vec<String> {
    // unwrap: the pattern is a compile-time constant
    let re = Regex::new(r"\|(.*?)\]").unwrap();
    re.captures_iter(wikitext)
        .map(|c| c[1].to_string())
        .collect()
}

/// Keeps entries without spaces whose alphabetic length meets `shortest`.
pub fn single_words(words: Vec<String>, shortest: usize) -> Vec<String> {
    words
        .into_iter()
        .filter(|w| {
            !w.contains(' ') && w.chars().filter(|c| c.is_alphabetic()).count() >= shortest
        })
        .collect()
}
