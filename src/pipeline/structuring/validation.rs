use tracing::warn;

use super::parser::GenerationReply;
use super::types::{ExtractionResult, SummaryResult, TestStatus};

/// Bound a decoded reply before handing it downstream.
///
/// The model computes `normalization_confidence` itself from the prompt
/// formula; its arithmetic is bounded here so an out-of-range value can
/// never leak into the result. Suspect explanation counts are logged but
/// passed through; the narrative is still useful to the reader.
pub fn validate_reply(reply: GenerationReply) -> (ExtractionResult, SummaryResult) {
    let GenerationReply {
        mut extraction,
        summary,
    } = reply;

    let reported = extraction.normalization_confidence;
    if !reported.is_finite() || !(0.0..=1.0).contains(&reported) {
        warn!(reported, "Model-reported normalization confidence out of range, clamping");
        extraction.normalization_confidence = if reported.is_finite() {
            reported.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    let abnormal = extraction
        .tests
        .iter()
        .filter(|t| t.status != TestStatus::Normal)
        .count();
    if summary.explanations.len() != abnormal {
        warn!(
            explanations = summary.explanations.len(),
            abnormal, "Explanation count does not match abnormal test count"
        );
    }

    (extraction, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::structuring::types::{ExtractedTest, RefRange};

    fn make_test(name: &str, status: TestStatus) -> ExtractedTest {
        ExtractedTest {
            name: name.into(),
            value: 1.0,
            unit: "mg/dL".into(),
            status,
            ref_range: RefRange { low: 0.5, high: 1.5 },
        }
    }

    fn make_reply(confidence: f32) -> GenerationReply {
        GenerationReply {
            extraction: ExtractionResult {
                tests: vec![
                    make_test("Blood Urea", TestStatus::Normal),
                    make_test("SGOT", TestStatus::High),
                ],
                normalization_confidence: confidence,
            },
            summary: SummaryResult {
                summary: "High SGOT.".into(),
                explanations: vec!["High SGOT can indicate liver cell stress.".into()],
            },
        }
    }

    #[test]
    fn in_range_reply_passes_through_unchanged() {
        let (extraction, summary) = validate_reply(make_reply(0.88));
        assert!((extraction.normalization_confidence - 0.88).abs() < f32::EPSILON);
        assert_eq!(extraction.tests.len(), 2);
        assert_eq!(summary.summary, "High SGOT.");
        assert_eq!(summary.explanations.len(), 1);
    }

    #[test]
    fn overshooting_confidence_clamps_to_one() {
        let (extraction, _) = validate_reply(make_reply(1.7));
        assert_eq!(extraction.normalization_confidence, 1.0);
    }

    #[test]
    fn negative_confidence_clamps_to_zero() {
        let (extraction, _) = validate_reply(make_reply(-0.2));
        assert_eq!(extraction.normalization_confidence, 0.0);
    }

    #[test]
    fn non_finite_confidence_becomes_zero() {
        let (extraction, _) = validate_reply(make_reply(f32::NAN));
        assert_eq!(extraction.normalization_confidence, 0.0);
    }

    #[test]
    fn explanation_mismatch_is_not_rejected() {
        let mut reply = make_reply(0.9);
        reply.summary.explanations.clear();
        let (extraction, summary) = validate_reply(reply);
        // Mismatch is logged, but both halves survive intact.
        assert_eq!(extraction.tests.len(), 2);
        assert!(summary.explanations.is_empty());
    }
}
