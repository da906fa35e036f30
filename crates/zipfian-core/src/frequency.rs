//! Word frequency counting and top-N ranking.
//!
//! Text is normalized (ASCII punctuation removed, lowercased), split on
//! whitespace, and counted into a [`WordFrequencyTable`] that remembers the
//! order in which each word was first seen. Ranking is a stable descending
//! sort over that order, so ties always resolve to first-seen words first.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentSet};
use crate::error::{AnalysisError, AnalysisResult};

/// Default number of top-ranked words retained per document.
pub const DEFAULT_DEPTH: usize = 10;

/// The ASCII punctuation characters removed during normalization.
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Strip ASCII punctuation and fold to lowercase.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !PUNCTUATION.contains(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Split normalized text into words on runs of whitespace.
///
/// The ASCII information separators U+001C..=U+001F also split words.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split(is_separator)
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Word counts in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencyTable {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl WordFrequencyTable {
    /// Count every token.
    pub fn from_tokens<'a, I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut table = Self::default();
        for token in tokens {
            table.increment(token);
        }
        table
    }

    fn increment(&mut self, word: &str) {
        if let Some(&pos) = self.index.get(word) {
            self.entries[pos].1 += 1;
        } else {
            self.index.insert(word.to_string(), self.entries.len());
            self.entries.push((word.to_string(), 1));
        }
    }

    /// Occurrences of `word`, if it was seen.
    pub fn get(&self, word: &str) -> Option<usize> {
        self.index.get(word).map(|&pos| self.entries[pos].1)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no words were counted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, equal to the number of tokens counted.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Iterate `(word, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(w, c)| (w.as_str(), *c))
    }

    /// The `depth` most frequent words, ties kept in first-seen order.
    pub fn ranked(&self, depth: usize) -> RankedTopWords {
        let mut words: Vec<RankedWord> = self
            .iter()
            .map(|(word, count)| RankedWord {
                word: word.to_string(),
                count,
            })
            .collect();
        // sort_by is stable
        words.sort_by(|a, b| b.count.cmp(&a.count));
        words.truncate(depth);
        RankedTopWords(words)
    }
}

/// A word and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RankedWord {
    /// The normalized word.
    pub word: String,
    /// Number of occurrences in the document.
    pub count: usize,
}

/// Words sorted by descending count, at most `depth` long.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RankedTopWords(Vec<RankedWord>);

impl RankedTopWords {
    /// Number of ranked words.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was ranked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate from rank 1 downward.
    pub fn iter(&self) -> std::slice::Iter<'_, RankedWord> {
        self.0.iter()
    }

    /// Counts in rank order.
    pub fn counts(&self) -> Vec<usize> {
        self.0.iter().map(|w| w.count).collect()
    }
}

impl<'a> IntoIterator for &'a RankedTopWords {
    type Item = &'a RankedWord;
    type IntoIter = std::slice::Iter<'a, RankedWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Integer percentages of each count relative to rank 1, in `0..=100`.
pub type PercentageSeries = Vec<u32>;

/// Convert ranked counts to whole percentages of the top count.
///
/// Rounds half to even, so 12.5% becomes 12. An empty ranking yields an
/// empty series rather than dividing by zero.
pub fn percentages(top: &RankedTopWords) -> PercentageSeries {
    let Some(first) = top.iter().next() else {
        return Vec::new();
    };
    let max = first.count as f64;
    top.iter()
        .map(|w| (w.count as f64 / max * 100.0).round_ties_even() as u32)
        .collect()
}

/// Frequency analysis result for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentFrequencies {
    /// Document identifier.
    pub id: String,
    /// Number of words in the whole document, before truncation.
    pub total_words: usize,
    /// The top-ranked words.
    pub top_words: RankedTopWords,
}

impl DocumentFrequencies {
    /// Percentages of the top words relative to rank 1.
    pub fn percentages(&self) -> PercentageSeries {
        percentages(&self.top_words)
    }
}

/// Normalize, count, and rank a single document.
#[tracing::instrument(skip(doc), fields(id = doc.id(), text_len = doc.text().len()))]
pub fn analyze_document(doc: &Document, depth: usize) -> AnalysisResult<DocumentFrequencies> {
    if depth == 0 {
        return Err(AnalysisError::InvalidDepth(depth));
    }

    let normalized = normalize(doc.text());
    let tokens = tokenize(&normalized);
    let total_words = tokens.len();
    let table = WordFrequencyTable::from_tokens(tokens);
    let top_words = table.ranked(depth);

    tracing::debug!(
        total_words,
        distinct = table.len(),
        ranked = top_words.len(),
        "counted words"
    );

    Ok(DocumentFrequencies {
        id: doc.id().to_string(),
        total_words,
        top_words,
    })
}

/// Analyze every document in the set, in order.
pub fn analyze(docs: &DocumentSet, depth: usize) -> AnalysisResult<Vec<DocumentFrequencies>> {
    docs.iter().map(|doc| analyze_document(doc, depth)).collect()
}
