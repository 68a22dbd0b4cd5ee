use tracing::{debug, warn};

use super::parser::parse_generation_reply;
use super::prompt::build_extraction_prompt;
use super::types::{
    ExtractionResult, GenerationClient, StructuredExtractor, SummaryResult,
};
use super::validation::validate_reply;
use super::StructuringError;

/// Orchestrates the structured-extraction stage:
/// prompt -> generation call -> parse -> validate.
///
/// One generation call per report; no retry, no streaming. Transport
/// failures propagate; an undecodable reply degrades to the empty fallback
/// result because downstream consumers expect the result shape to always be
/// present.
pub struct ReportStructurer {
    client: Box<dyn GenerationClient + Send + Sync>,
}

impl ReportStructurer {
    pub fn new(client: Box<dyn GenerationClient + Send + Sync>) -> Self {
        Self { client }
    }
}

impl StructuredExtractor for ReportStructurer {
    fn extract_structured(
        &self,
        lines: &[String],
        ocr_confidence: f32,
    ) -> Result<(ExtractionResult, SummaryResult), StructuringError> {
        let prompt = build_extraction_prompt(lines, ocr_confidence);
        debug!(
            candidate_lines = lines.len(),
            ocr_confidence, "Requesting structured extraction"
        );

        let reply = self.client.generate(&prompt)?;

        match parse_generation_reply(&reply) {
            Ok(decoded) => Ok(validate_reply(decoded)),
            Err(e) => {
                warn!(error = %e, reply_chars = reply.len(), "Generation reply could not be decoded, substituting empty result");
                Ok((ExtractionResult::empty(), SummaryResult::default()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::structuring::gemini::MockGenerationClient;
    use crate::pipeline::structuring::types::TestStatus;

    /// Generation client that always fails at the transport level.
    struct UnreachableClient;

    impl GenerationClient for UnreachableClient {
        fn generate(&self, _prompt: &str) -> Result<String, StructuringError> {
            Err(StructuringError::Connection(
                "https://generativelanguage.googleapis.com/v1beta".into(),
            ))
        }
    }

    fn well_formed_reply() -> String {
        r#"```json
{
  "extraction": {
    "tests": [
      {
        "name": "Hemoglobin",
        "value": 10.2,
        "unit": "g/dL",
        "status": "low",
        "ref_range": {"low": 12.0, "high": 15.0}
      }
    ],
    "normalization_confidence": 0.95
  },
  "summary": {
    "summary": "Low hemoglobin.",
    "explanations": ["Low hemoglobin may relate to anemia or blood loss."]
  }
}
```"#
            .to_string()
    }

    fn sample_lines() -> Vec<String> {
        vec!["Hemoglobin 10.2 g/dL 12-15".to_string()]
    }

    #[test]
    fn well_formed_reply_round_trips() {
        let structurer =
            ReportStructurer::new(Box::new(MockGenerationClient::new(&well_formed_reply())));
        let (extraction, summary) = structurer
            .extract_structured(&sample_lines(), 0.83)
            .unwrap();

        assert_eq!(extraction.tests.len(), 1);
        assert_eq!(extraction.tests[0].name, "Hemoglobin");
        assert_eq!(extraction.tests[0].status, TestStatus::Low);
        assert!((extraction.normalization_confidence - 0.95).abs() < f32::EPSILON);
        assert_eq!(summary.summary, "Low hemoglobin.");
        assert_eq!(summary.explanations.len(), 1);
    }

    #[test]
    fn malformed_reply_degrades_to_empty_result() {
        let structurer = ReportStructurer::new(Box::new(MockGenerationClient::new(
            "I'm sorry, I cannot read this report.",
        )));
        let (extraction, summary) = structurer
            .extract_structured(&sample_lines(), 0.83)
            .unwrap();

        assert!(extraction.tests.is_empty());
        assert_eq!(extraction.normalization_confidence, 0.0);
        assert!(summary.summary.is_empty());
        assert!(summary.explanations.is_empty());
    }

    #[test]
    fn key_incomplete_reply_degrades_to_empty_result() {
        let structurer = ReportStructurer::new(Box::new(MockGenerationClient::new(
            r#"{"extraction": {"tests": []}}"#,
        )));
        let (extraction, summary) = structurer.extract_structured(&[], 0.0).unwrap();
        assert_eq!(extraction, ExtractionResult::empty());
        assert_eq!(summary, SummaryResult::default());
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        let reply = r#"{
            "extraction": {"tests": [], "normalization_confidence": 3.4},
            "summary": {"summary": "", "explanations": []}
        }"#;
        let structurer = ReportStructurer::new(Box::new(MockGenerationClient::new(reply)));
        let (extraction, _) = structurer.extract_structured(&[], 0.9).unwrap();
        assert_eq!(extraction.normalization_confidence, 1.0);
    }

    #[test]
    fn transport_failure_propagates() {
        let structurer = ReportStructurer::new(Box::new(UnreachableClient));
        let result = structurer.extract_structured(&sample_lines(), 0.83);
        assert!(matches!(result, Err(StructuringError::Connection(_))));
    }

    #[test]
    fn empty_lines_still_produce_a_result() {
        let reply = r#"{
            "extraction": {"tests": [], "normalization_confidence": 0.0},
            "summary": {"summary": "", "explanations": []}
        }"#;
        let structurer = ReportStructurer::new(Box::new(MockGenerationClient::new(reply)));
        let (extraction, summary) = structurer.extract_structured(&[], 0.0).unwrap();
        assert!(extraction.tests.is_empty());
        assert!(summary.explanations.is_empty());
    }
}
