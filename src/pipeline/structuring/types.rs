use serde::{Deserialize, Serialize};

use super::StructuringError;

/// Abnormality status of a test relative to its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Normal,
    Low,
    High,
}

/// Numeric reference range for a test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefRange {
    pub low: f64,
    pub high: f64,
}

/// One test row recognized by the generation model. Never produced by
/// deterministic code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTest {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub status: TestStatus,
    pub ref_range: RefRange,
}

/// Structured extraction stage output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub tests: Vec<ExtractedTest>,
    /// Model-computed: (fraction of tests successfully parsed) x OCR
    /// confidence. Clamped to `[0, 1]` during validation.
    pub normalization_confidence: f32,
}

impl ExtractionResult {
    /// Defined fallback when the generation reply cannot be decoded.
    pub fn empty() -> Self {
        Self {
            tests: Vec::new(),
            normalization_confidence: 0.0,
        }
    }
}

/// Patient-facing summary stage output. `summary` covers abnormal findings
/// only; `explanations` holds one entry per abnormal test, in test order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub explanations: Vec<String>,
}

/// Text-generation service abstraction (allows mocking).
pub trait GenerationClient {
    /// Single blocking generation call; no retry, no streaming.
    fn generate(&self, prompt: &str) -> Result<String, StructuringError>;
}

/// Structured-extraction seam consumed by the pipeline entry point.
pub trait StructuredExtractor {
    fn extract_structured(
        &self,
        lines: &[String],
        ocr_confidence: f32,
    ) -> Result<(ExtractionResult, SummaryResult), StructuringError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&TestStatus::Normal).unwrap(), "\"normal\"");
        assert_eq!(serde_json::to_string(&TestStatus::Low).unwrap(), "\"low\"");
        assert_eq!(serde_json::to_string(&TestStatus::High).unwrap(), "\"high\"");
    }

    #[test]
    fn status_rejects_unknown_values() {
        let result: Result<TestStatus, _> = serde_json::from_str("\"critical\"");
        assert!(result.is_err());
    }

    #[test]
    fn empty_extraction_has_zero_confidence() {
        let fallback = ExtractionResult::empty();
        assert!(fallback.tests.is_empty());
        assert_eq!(fallback.normalization_confidence, 0.0);
    }

    #[test]
    fn default_summary_is_neutral() {
        let fallback = SummaryResult::default();
        assert!(fallback.summary.is_empty());
        assert!(fallback.explanations.is_empty());
    }
}
