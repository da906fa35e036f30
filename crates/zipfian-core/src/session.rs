//! One analysis pass over a batch of uploaded texts.
//!
//! [`run`] decodes each input, ranks its words, converts the ranking to
//! percentages, and smooths the result. A failure in one document never
//! stops the others; it is recorded as that document's outcome instead.
//! The Zipfian reference curve is computed once per session.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::curve::{self, SmoothedCurve, SmoothingOptions, ZIPF_LABEL};
use crate::document::{Document, DocumentSet};
use crate::error::{AnalysisError, AnalysisResult};
use crate::frequency::{self, DEFAULT_DEPTH, DocumentFrequencies, PercentageSeries, RankedTopWords};

/// Settings for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Number of top-ranked words kept per document.
    pub depth: usize,
    /// Curve resampling settings.
    pub smoothing: SmoothingOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            smoothing: SmoothingOptions::default(),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            depth: config.depth,
            smoothing: SmoothingOptions {
                samples: config.samples,
                boundary: config.boundary,
                short_series: config.short_series,
            },
        }
    }
}

/// A named blob of uploaded bytes, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBlob {
    /// File name as uploaded.
    pub name: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

impl InputBlob {
    /// Create a blob.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A curve with its legend label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabeledCurve {
    /// Legend label.
    pub label: String,
    /// The values the curve was fitted through.
    pub values: Vec<f64>,
    /// The smoothed samples.
    pub curve: SmoothedCurve,
}

/// Why a document has no curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SkipReason {
    /// The document contains no words.
    NoWords,
    /// Too few distinct words for the interpolation.
    TooFewWords {
        /// Values required.
        needed: usize,
        /// Values available.
        got: usize,
    },
    /// The curve could not be fitted for another reason.
    SmoothingFailed {
        /// Underlying error message.
        reason: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoWords => f.write_str("no words"),
            Self::TooFewWords { needed, got } => {
                write!(f, "{got} distinct words, need {needed} to plot")
            }
            Self::SmoothingFailed { reason } => write!(f, "smoothing failed: {reason}"),
        }
    }
}

/// Ranked data for a document that decoded successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DocumentReport {
    /// Document identifier.
    pub id: String,
    /// Legend label, `"<id> [<total> words]"`.
    pub label: String,
    /// Words in the whole document.
    pub total_words: usize,
    /// Top-ranked words with counts.
    pub top_words: RankedTopWords,
    /// Percentages relative to rank 1.
    pub percentages: PercentageSeries,
    /// The smoothed curve, absent when skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve: Option<SmoothedCurve>,
    /// Why there is no curve.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

/// What happened to one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum DocumentOutcome {
    /// Decoded and ranked; may or may not have a curve.
    Analyzed(DocumentReport),
    /// Could not be decoded.
    Failed {
        /// Input file name.
        name: String,
        /// Human-readable cause.
        reason: String,
    },
}

impl DocumentOutcome {
    /// The report, if the document was analyzed.
    pub const fn report(&self) -> Option<&DocumentReport> {
        match self {
            Self::Analyzed(report) => Some(report),
            Self::Failed { .. } => None,
        }
    }
}

/// Results of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SessionReport {
    /// Number of ranks plotted.
    pub depth: usize,
    /// The Zipfian reference, absent when depth is too small to smooth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<LabeledCurve>,
    /// Per-input outcomes in input order.
    pub documents: Vec<DocumentOutcome>,
}

impl SessionReport {
    /// Reports for documents that produced a curve.
    pub fn plotted(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents
            .iter()
            .filter_map(DocumentOutcome::report)
            .filter(|r| r.curve.is_some())
    }

    /// Number of inputs that failed to decode.
    pub fn failed_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| matches!(d, DocumentOutcome::Failed { .. }))
            .count()
    }
}

/// Legend label for a document.
pub fn label(id: &str, total_words: usize) -> String {
    format!("{id} [{total_words} words]")
}

/// Analyze a batch of uploads.
///
/// Errors only when `options.depth` is zero; everything document-specific
/// is reported per document.
#[tracing::instrument(skip_all, fields(inputs = inputs.len(), depth = options.depth))]
pub fn run(inputs: Vec<InputBlob>, options: &SessionOptions) -> AnalysisResult<SessionReport> {
    if options.depth == 0 {
        return Err(AnalysisError::InvalidDepth(0));
    }

    let reference = reference_curve(options);

    // Decode at the boundary; failures keep their slot in input order.
    let mut docs = DocumentSet::new();
    let mut slots: Vec<Slot> = Vec::with_capacity(inputs.len());
    for blob in inputs {
        match Document::from_bytes(&blob.name, &blob.bytes) {
            Ok(doc) => {
                let id = doc.id().to_string();
                if !docs.insert(doc) {
                    slots.push(Slot::Doc(id));
                }
            }
            Err(err) => {
                tracing::warn!(name = %blob.name, error = %err, "skipping undecodable input");
                slots.push(Slot::Failed {
                    name: blob.name,
                    reason: err.to_string(),
                });
            }
        }
    }

    let mut documents = Vec::with_capacity(slots.len());
    for slot in slots {
        let outcome = match slot {
            Slot::Doc(id) => {
                let Some(doc) = docs.get(&id) else { continue };
                let freq = frequency::analyze_document(doc, options.depth)?;
                DocumentOutcome::Analyzed(document_report(freq, &options.smoothing))
            }
            Slot::Failed { name, reason } => DocumentOutcome::Failed { name, reason },
        };
        documents.push(outcome);
    }

    Ok(SessionReport {
        depth: options.depth,
        reference,
        documents,
    })
}

enum Slot {
    Doc(String),
    Failed { name: String, reason: String },
}

fn reference_curve(options: &SessionOptions) -> Option<LabeledCurve> {
    let values = curve::zipf_sequence(options.depth);
    match curve::smooth_with(&values, &options.smoothing) {
        Ok(curve) => Some(LabeledCurve {
            label: ZIPF_LABEL.to_string(),
            values,
            curve,
        }),
        Err(err) => {
            tracing::warn!(depth = options.depth, error = %err, "no reference curve");
            None
        }
    }
}

fn document_report(freq: DocumentFrequencies, smoothing: &SmoothingOptions) -> DocumentReport {
    let percentages = freq.percentages();
    let label = label(&freq.id, freq.total_words);

    let (curve, skipped) = if percentages.is_empty() {
        tracing::debug!(id = %freq.id, "empty document, not plotted");
        (None, Some(SkipReason::NoWords))
    } else {
        let values: Vec<f64> = percentages.iter().map(|&p| f64::from(p)).collect();
        match curve::smooth_with(&values, smoothing) {
            Ok(curve) => (Some(curve), None),
            Err(AnalysisError::InsufficientData { needed, got }) => {
                tracing::warn!(id = %freq.id, needed, got, "too few words to plot");
                (None, Some(SkipReason::TooFewWords { needed, got }))
            }
            Err(err) => {
                tracing::warn!(id = %freq.id, error = %err, "curve smoothing failed");
                let reason = err.to_string();
                (None, Some(SkipReason::SmoothingFailed { reason }))
            }
        }
    };

    DocumentReport {
        id: freq.id,
        label,
        total_words: freq.total_words,
        top_words: freq.top_words,
        percentages,
        curve,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{DEFAULT_SAMPLES, ShortSeriesPolicy};

    fn blob(name: &str, text: &str) -> InputBlob {
        InputBlob::new(name, text.as_bytes())
    }

    #[test]
    fn plots_documents_and_reference() {
        let inputs = vec![
            blob("cats.txt", "the cat sat on the mat the cat ran"),
            blob("nums.txt", "one two two three three three four four four four"),
        ];
        let report = run(inputs, &SessionOptions::default()).unwrap();

        let reference = report.reference.as_ref().unwrap();
        assert_eq!(reference.label, "Zipfian Curve");
        assert_eq!(reference.values.len(), 10);
        assert_eq!(reference.curve.len(), DEFAULT_SAMPLES);

        let plotted: Vec<&DocumentReport> = report.plotted().collect();
        assert_eq!(plotted.len(), 2);
        assert_eq!(plotted[0].label, "cats [9 words]");
        assert_eq!(plotted[0].percentages, [100, 67, 33, 33, 33, 33]);
        assert_eq!(plotted[1].label, "nums [10 words]");
        assert_eq!(plotted[1].percentages, [100, 75, 50, 25]);
    }

    #[test]
    fn decode_failure_is_isolated() {
        let inputs = vec![
            InputBlob::new("bad.txt", vec![0xC3, 0x28]),
            blob("good.txt", "a b c d a b c a b a"),
        ];
        let report = run(inputs, &SessionOptions::default()).unwrap();

        assert_eq!(report.failed_count(), 1);
        assert!(matches!(
            &report.documents[0],
            DocumentOutcome::Failed { name, .. } if name == "bad.txt"
        ));
        assert_eq!(report.plotted().count(), 1);
    }

    #[test]
    fn empty_document_is_skipped_not_failed() {
        let report = run(vec![blob("empty.txt", "")], &SessionOptions::default()).unwrap();
        let doc = report.documents[0].report().unwrap();
        assert_eq!(doc.total_words, 0);
        assert!(doc.top_words.is_empty());
        assert!(doc.curve.is_none());
        assert_eq!(doc.skipped, Some(SkipReason::NoWords));
        assert_eq!(report.plotted().count(), 0);
    }

    #[test]
    fn short_document_is_skipped_by_default() {
        let report = run(vec![blob("short.txt", "yes no yes")], &SessionOptions::default()).unwrap();
        let doc = report.documents[0].report().unwrap();
        assert_eq!(doc.percentages, [100, 50]);
        assert_eq!(
            doc.skipped,
            Some(SkipReason::TooFewWords { needed: 4, got: 2 })
        );
    }

    #[test]
    fn short_document_plots_linearly_when_allowed() {
        let options = SessionOptions {
            smoothing: SmoothingOptions {
                short_series: ShortSeriesPolicy::Linear,
                ..SmoothingOptions::default()
            },
            ..SessionOptions::default()
        };
        let report = run(vec![blob("short.txt", "yes no yes")], &options).unwrap();
        assert_eq!(report.plotted().count(), 1);
    }

    #[test]
    fn single_word_reports_linear_minimum() {
        let options = SessionOptions {
            smoothing: SmoothingOptions {
                short_series: ShortSeriesPolicy::Linear,
                ..SmoothingOptions::default()
            },
            ..SessionOptions::default()
        };
        let report = run(vec![blob("one.txt", "echo echo echo")], &options).unwrap();
        let doc = report.documents[0].report().unwrap();
        assert_eq!(doc.percentages, [100]);
        assert_eq!(
            doc.skipped,
            Some(SkipReason::TooFewWords { needed: 2, got: 1 })
        );
    }

    #[test]
    fn skip_reasons_describe_their_cause() {
        let too_few = SkipReason::TooFewWords { needed: 4, got: 3 };
        assert_eq!(too_few.to_string(), "3 distinct words, need 4 to plot");

        let failed = SkipReason::SmoothingFailed {
            reason: "depth must be at least 1, got 0".to_string(),
        };
        assert_eq!(
            failed.to_string(),
            "smoothing failed: depth must be at least 1, got 0"
        );
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["kind"], "smoothing-failed");
    }

    #[test]
    fn small_depth_has_no_reference() {
        let options = SessionOptions {
            depth: 3,
            ..SessionOptions::default()
        };
        let report = run(vec![blob("a.txt", "a b c d e")], &options).unwrap();
        assert!(report.reference.is_none());
        let doc = report.documents[0].report().unwrap();
        assert_eq!(doc.top_words.len(), 3);
    }

    #[test]
    fn duplicate_ids_keep_first_slot_with_later_text() {
        let inputs = vec![
            blob("a.txt", "old old"),
            blob("b.txt", "b"),
            blob("a.md", "new new new"),
        ];
        let report = run(inputs, &SessionOptions::default()).unwrap();
        assert_eq!(report.documents.len(), 2);
        let first = report.documents[0].report().unwrap();
        assert_eq!(first.id, "a");
        assert_eq!(first.total_words, 3);
    }

    #[test]
    fn zero_depth_fails_the_session() {
        let options = SessionOptions {
            depth: 0,
            ..SessionOptions::default()
        };
        assert!(matches!(
            run(Vec::new(), &options),
            Err(AnalysisError::InvalidDepth(0))
        ));
    }

    #[test]
    fn empty_batch_still_has_reference() {
        let report = run(Vec::new(), &SessionOptions::default()).unwrap();
        assert!(report.documents.is_empty());
        assert!(report.reference.is_some());
    }

    #[test]
    fn report_serializes_with_status_tags() {
        let inputs = vec![blob("cats.txt", "the cat sat on the mat the cat ran")];
        let report = run(inputs, &SessionOptions::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["documents"][0]["status"], "analyzed");
        assert_eq!(json["documents"][0]["top_words"][0]["word"], "the");
        assert_eq!(json["reference"]["label"], "Zipfian Curve");
    }

    #[test]
    fn options_from_config() {
        let config = Config {
            depth: 7,
            samples: 120,
            ..Config::default()
        };
        let options = SessionOptions::from(&config);
        assert_eq!(options.depth, 7);
        assert_eq!(options.smoothing.samples, 120);
    }
}
