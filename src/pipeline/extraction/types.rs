use std::path::{Path, PathBuf};

use image::GrayImage;
use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Cleaned-up image artifact produced by the normalizer.
///
/// Carries both the on-disk path and the pixel buffer so the recognizer can
/// operate on either without re-reading the file.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub path: PathBuf,
    pub image: GrayImage,
}

/// One recognized token with its confidence score.
///
/// `confidence` is on the engine's native 0-100 scale. Negative values are the
/// engine's sentinel for non-text regions (page, block, and line rows); the
/// aggregator filters them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfidence {
    pub text: String,
    pub confidence: f32,
    pub bounding_box: Option<BoundingBox>,
}

/// Pixel-space bounding box of a recognized token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// OCR engine abstraction (allows mocking for tests).
///
/// The transcript and token-confidence passes are separate operations so
/// callers only pay for the passes they need. Any backend exposing both
/// satisfies the contract.
pub trait OcrEngine {
    /// Full-page transcript in reading order.
    fn recognize_text(&self, image_path: &Path) -> Result<String, ExtractionError>;

    /// Per-token confidence dataset for the same image.
    fn recognize_tokens(&self, image_path: &Path)
        -> Result<Vec<TokenConfidence>, ExtractionError>;
}
