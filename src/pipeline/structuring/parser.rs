use serde::Deserialize;

use super::types::{ExtractionResult, SummaryResult};
use super::StructuringError;

/// Typed shape of the generation reply, matching the structure the prompt
/// demands. Decoding fails closed: a missing key or wrong type is an error
/// here, and the caller substitutes the defined fallback.
#[derive(Debug, Deserialize)]
pub struct GenerationReply {
    pub extraction: ExtractionResult,
    pub summary: SummaryResult,
}

/// Parse a generation reply into its typed form.
///
/// Tolerates models that wrap their output in a markdown code block: a
/// leading ```` ```json ```` fence and a trailing ```` ``` ```` fence are
/// stripped if present before decoding.
pub fn parse_generation_reply(response: &str) -> Result<GenerationReply, StructuringError> {
    let json_str = strip_code_fence(response);
    if json_str.is_empty() {
        return Err(StructuringError::MalformedReply(
            "Empty generation reply".into(),
        ));
    }

    serde_json::from_str(json_str).map_err(|e| StructuringError::JsonParsing(e.to_string()))
}

fn strip_code_fence(response: &str) -> &str {
    let mut text = response.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}
