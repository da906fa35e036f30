//! Documents and the decoding boundary.
//!
//! Raw uploads arrive as bytes. They are decoded here, once, so the
//! frequency analyzer only ever sees valid text.

use std::collections::HashMap;

use crate::error::{AnalysisError, AnalysisResult};

const BOM: char = '\u{feff}';

/// A named text ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    text: String,
}

impl Document {
    /// Create a document from already-decoded text.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    /// Decode uploaded bytes as UTF-8 and derive the id from `file_name`.
    ///
    /// A leading byte-order mark is dropped. Invalid UTF-8 yields
    /// [`AnalysisError::Decode`] carrying the derived id.
    pub fn from_bytes(file_name: &str, bytes: &[u8]) -> AnalysisResult<Self> {
        let id = document_id(file_name);
        let text = std::str::from_utf8(bytes)
            .map_err(|source| AnalysisError::Decode {
                id: id.clone(),
                source,
            })?;
        let text = text.strip_prefix(BOM).unwrap_or(text);
        Ok(Self::new(id, text))
    }

    /// The document identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The decoded text, exactly as read.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Derive a document id from a file name.
///
/// Directory components are dropped and everything from the first `.` of
/// the base name onward is cut: `notes/essay.v2.txt` → `essay`. Names that
/// start with a dot fall back to the text between the leading dot and the
/// last extension.
pub fn document_id(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    match base.split('.').next() {
        Some(head) if !head.is_empty() => head.to_string(),
        _ => {
            let trimmed = base.trim_start_matches('.');
            trimmed
                .rsplit_once('.')
                .map_or(trimmed, |(stem, _)| stem)
                .to_string()
        }
    }
}

/// An ordered set of documents keyed by id.
///
/// Re-inserting an id replaces its text but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    docs: Vec<Document>,
    index: HashMap<String, usize>,
}

impl DocumentSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any earlier one with the same id.
    ///
    /// Returns `true` when an existing document was replaced.
    pub fn insert(&mut self, doc: Document) -> bool {
        if let Some(&pos) = self.index.get(doc.id()) {
            tracing::warn!(id = doc.id(), "duplicate document id, replacing earlier text");
            self.docs[pos] = doc;
            true
        } else {
            self.index.insert(doc.id.clone(), self.docs.len());
            self.docs.push(doc);
            false
        }
    }

    /// Look up a document by id.
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.index.get(id).map(|&pos| &self.docs[pos])
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the set holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Iterate in first-insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.docs.iter()
    }
}

impl FromIterator<Document> for DocumentSet {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        let mut set = Self::new();
        for doc in iter {
            set.insert(doc);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DocumentSet {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
