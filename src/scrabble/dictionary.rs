use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use fst::raw::Node;
use fst::{Set, SetBuilder};
use tracing::info;

use super::error::ConfigError;

/// Normalises one record of a word list: first comma separated field,
/// trimmed and uppercased.
fn normalise(record: &str) -> String {
    record
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_uppercase()
}

fn read_word_file<P: AsRef<Path>>(path: P, min_len: usize) -> Result<Vec<String>, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        let word = normalise(&line?);
        if word.is_empty() || word.chars().count() < min_len {
            continue;
        }
        words.push(word);
    }
    Ok(words)
}

/// Set of legal words, stored as an FST so move generation can walk it
/// prefix by prefix. Read-only once built.
pub struct Dictionary {
    words: Set<Vec<u8>>,
}

impl Dictionary {
    pub fn from_words<I, S>(words: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words = words
            .into_iter()
            .map(|w| normalise(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>();
        words.sort_unstable();
        words.dedup();

        let mut build = SetBuilder::memory();
        build.extend_iter(words)?;
        Ok(Self {
            words: build.into_set(),
        })
    }

    /// Loads a word list with one word per line. Words with fewer than
    /// `min_len` characters are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P, min_len: usize) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let words = read_word_file(path, min_len)?;
        let dict = Self::from_words(words)?;
        info!(path = %path.display(), words = dict.len(), "loaded dictionary");
        Ok(dict)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Start state for a prefix walk
    pub fn root(&self) -> Node<'_> {
        self.words.as_fst().root()
    }

    /// Follows `text` from `node`. Returns `None` once no word has the
    /// resulting prefix.
    pub fn advance<'a>(&'a self, node: &Node<'a>, text: &str) -> Option<Node<'a>> {
        let fst = self.words.as_fst();
        let mut curr = node.clone();
        for byte in text.bytes() {
            let idx = curr.find_input(byte)?;
            curr = fst.node(curr.transition(idx).addr);
        }
        Some(curr)
    }
}
