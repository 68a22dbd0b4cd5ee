//! Heuristic isolation of the tabular test-result section from a noisy OCR
//! transcript.
//!
//! Lab reports bury the result table between letterheads, patient details,
//! and signature footers. The segmenter finds the table header by keyword,
//! then filters the lines after it by length and residual keywords. The rules
//! are deliberately exposed as a named policy so their heuristic nature stays
//! documented and independently testable.

use std::sync::LazyLock;

use regex::Regex;

/// Splits a transcript into paragraphs on any run of one-or-more blank lines.
static PARAGRAPH_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Case-insensitive keywords that identify the table header paragraph.
const HEADER_KEYWORDS: &[&str] = &["test", "result", "unit", "value"];

/// Case-insensitive keywords that mark residual header/footer lines inside
/// the candidate block.
const FORBIDDEN_KEYWORDS: &[&str] = &["test", "result", "unit", "value", "report"];

/// Number of leading candidate lines sampled for the length threshold.
const LENGTH_SAMPLE_SIZE: usize = 3;

/// Tunable rule set for [`segment_with_policy`].
#[derive(Debug, Clone)]
pub struct SegmentPolicy {
    /// A paragraph containing any of these marks the table header; everything
    /// after it is a candidate row.
    pub header_keywords: &'static [&'static str],
    /// Candidate lines containing any of these are discarded as residual
    /// headers/footers.
    pub forbidden_keywords: &'static [&'static str],
    /// How many leading candidate lines set the length threshold (their
    /// maximum length). Tabular rows are short and consistent-width; trailing
    /// prose is not.
    pub length_sample_size: usize,
    /// Unconditionally drop the last surviving line. In the observed report
    /// formats the final line is consistently a footer artifact; on other
    /// layouts this may discard a legitimate last row, hence the switch.
    pub drop_trailing_line: bool,
}

impl Default for SegmentPolicy {
    fn default() -> Self {
        Self {
            header_keywords: HEADER_KEYWORDS,
            forbidden_keywords: FORBIDDEN_KEYWORDS,
            length_sample_size: LENGTH_SAMPLE_SIZE,
            drop_trailing_line: true,
        }
    }
}

/// Isolate the test-result lines of an OCR transcript with the default policy.
///
/// Returns an empty sequence when no paragraph matches the header keywords;
/// "no recognizable table structure" is a valid outcome, not an error.
pub fn segment_test_block(transcript: &str) -> Vec<String> {
    segment_with_policy(transcript, &SegmentPolicy::default())
}

/// Isolate the test-result lines of an OCR transcript.
///
/// Pure and deterministic: identical input yields identical output.
pub fn segment_with_policy(transcript: &str, policy: &SegmentPolicy) -> Vec<String> {
    let paragraphs: Vec<&str> = PARAGRAPH_SPLIT
        .split(transcript)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    // Only the first header match counts; later matches are table footers or
    // repeated boilerplate.
    let Some(header_idx) = paragraphs
        .iter()
        .position(|p| contains_any(p, policy.header_keywords))
    else {
        return Vec::new();
    };

    let candidates: Vec<&str> = paragraphs[header_idx + 1..]
        .iter()
        .flat_map(|p| p.split('\n'))
        .collect();

    let max_len = match candidates
        .iter()
        .take(policy.length_sample_size)
        .map(|line| line.chars().count())
        .max()
    {
        Some(len) => len,
        // Header was the last paragraph: nothing to segment.
        None => return Vec::new(),
    };

    let mut lines: Vec<String> = candidates
        .iter()
        .filter(|line| line.chars().count() <= max_len)
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .filter(|line| !contains_any(line, policy.forbidden_keywords))
        .map(str::to_string)
        .collect();

    if policy.drop_trailing_line {
        lines.pop();
    }

    lines
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}
