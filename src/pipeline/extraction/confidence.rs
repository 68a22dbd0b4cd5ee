use super::types::TokenConfidence;

/// The engine reports token confidence on a 0-100 scale.
const CONFIDENCE_SCALE: f32 = 100.0;

/// Reduce a per-token confidence dataset to a single document-level score
/// in `[0.0, 1.0]`.
///
/// Negative confidences are the engine's marker for non-text regions and are
/// excluded. An empty filtered set yields exactly `0.0`: an unreadable image
/// is a valid (if poor) outcome, not a pipeline failure.
pub fn aggregate_confidence(tokens: &[TokenConfidence]) -> f32 {
    let valid: Vec<f32> = tokens
        .iter()
        .map(|t| t.confidence)
        .filter(|c| *c >= 0.0)
        .collect();

    if valid.is_empty() {
        return 0.0;
    }

    let mean = valid.iter().sum::<f32>() / valid.len() as f32;
    mean / CONFIDENCE_SCALE
}
