use std::path::Path;

use super::types::{BoundingBox, OcrEngine, TokenConfidence};
use super::ExtractionError;

/// Tesseract OCR engine.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct TesseractEngine {
    tessdata_dir: Option<std::path::PathBuf>,
    language: String,
}

#[cfg(feature = "ocr")]
impl TesseractEngine {
    pub fn new(tessdata_dir: Option<&Path>, language: &str) -> Self {
        Self {
            tessdata_dir: tessdata_dir.map(Path::to_path_buf),
            language: language.to_string(),
        }
    }

    /// Build from process configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.tessdata_dir.as_deref(), &config.ocr_language)
    }

    /// The binding consumes its handle per recognition pass, so each call
    /// initializes a fresh engine.
    fn init(&self, image_path: &Path) -> Result<tesseract::Tesseract, ExtractionError> {
        let datapath = match self.tessdata_dir.as_deref() {
            Some(dir) => Some(
                dir.to_str()
                    .ok_or_else(|| ExtractionError::OcrInit("Invalid tessdata path".into()))?,
            ),
            None => None,
        };

        let tess = tesseract::Tesseract::new(datapath, Some(self.language.as_str()))
            .map_err(|e| ExtractionError::OcrInit(format!("{e:?}")))?;

        let path = image_path
            .to_str()
            .ok_or_else(|| ExtractionError::OcrProcessing("Non-UTF-8 image path".into()))?;
        tess.set_image(path)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))
    }
}

#[cfg(feature = "ocr")]
impl OcrEngine for TesseractEngine {
    fn recognize_text(&self, image_path: &Path) -> Result<String, ExtractionError> {
        let mut tess = self.init(image_path)?;
        tess.get_text()
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))
    }

    fn recognize_tokens(
        &self,
        image_path: &Path,
    ) -> Result<Vec<TokenConfidence>, ExtractionError> {
        let mut tess = self.init(image_path)?;
        let tsv = tess
            .get_tsv_text(0)
            .map_err(|e| ExtractionError::OcrProcessing(format!("{e:?}")))?;
        Ok(parse_tsv_tokens(&tsv))
    }
}

/// Mock OCR engine for unit testing without Tesseract.
pub struct MockOcrEngine {
    transcript: String,
    token_confidence: f32,
}

impl MockOcrEngine {
    pub fn new(transcript: &str, token_confidence: f32) -> Self {
        Self {
            transcript: transcript.to_string(),
            token_confidence,
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn recognize_text(&self, _image_path: &Path) -> Result<String, ExtractionError> {
        Ok(self.transcript.clone())
    }

    fn recognize_tokens(
        &self,
        _image_path: &Path,
    ) -> Result<Vec<TokenConfidence>, ExtractionError> {
        Ok(self
            .transcript
            .split_whitespace()
            .map(|w| TokenConfidence {
                text: w.to_string(),
                confidence: self.token_confidence,
                bounding_box: None,
            })
            .collect())
    }
}

/// Parse Tesseract TSV output into the per-token confidence dataset.
///
/// TSV columns: level page_num block_num par_num line_num word_num left top
/// width height conf text. Every row with a parseable confidence is kept:
/// word rows carry real 0-100 scores, while structural rows (page, block,
/// paragraph, line) keep the engine's -1 sentinel and an empty text field so
/// the aggregator's negative-filtering contract stays observable. Rows with
/// an unparsable confidence or too few columns are skipped.
pub fn parse_tsv_tokens(tsv: &str) -> Vec<TokenConfidence> {
    let mut tokens = Vec::new();

    for line in tsv.lines().skip(1) {
        // Skip header row
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let confidence: f32 = match fields[10].parse() {
            Ok(c) => c,
            Err(_) => continue,
        };

        let bounding_box = parse_bounding_box(fields[6], fields[7], fields[8], fields[9]);

        tokens.push(TokenConfidence {
            text: fields[11].trim().to_string(),
            confidence,
            bounding_box,
        });
    }

    tokens
}

/// Parse bounding box coordinates from TSV string fields.
/// Returns None if any field fails to parse (graceful degradation).
fn parse_bounding_box(left: &str, top: &str, width: &str, height: &str) -> Option<BoundingBox> {
    Some(BoundingBox {
        x: left.parse().ok()?,
        y: top.parse().ok()?,
        width: width.parse().ok()?,
        height: height.parse().ok()?,
    })
}
