//! Report processing entry point.
//!
//! Single operation that drives the full pipeline for one uploaded image:
//! normalize -> recognize -> {aggregate confidence, segment} -> structured
//! extraction. Strictly linear, no stage loops back or retries; the first
//! fatal error aborts the request.
//!
//! Uses trait-based DI for the OCR engine and the structured extractor so
//! the whole pipeline is testable with mock implementations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::pipeline::extraction::confidence::aggregate_confidence;
use crate::pipeline::extraction::preprocess::normalize_for_ocr;
use crate::pipeline::extraction::segment::segment_test_block;
use crate::pipeline::extraction::types::OcrEngine;
use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::structuring::types::{
    ExtractionResult, StructuredExtractor, SummaryResult,
};
use crate::pipeline::structuring::StructuringError;

/// Name of the normalized image artifact inside the per-request work dir.
const NORMALIZED_IMAGE_NAME: &str = "normalized.png";

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Structuring failed: {0}")]
    Structuring(#[from] StructuringError),
}

/// Composite pipeline output handed to the transport layer.
#[derive(Debug, Clone, Serialize)]
pub struct ReportAnalysis {
    /// Candidate lines isolated from the OCR transcript. May be empty when
    /// no table structure was recognized.
    pub lines: Vec<String>,
    pub extraction: ExtractionResult,
    pub summary: SummaryResult,
    /// Combined view duplicating extraction + summary for consumers that
    /// want a single object.
    pub combined: CombinedReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct CombinedReport {
    pub extraction: ExtractionResult,
    pub summary: SummaryResult,
}

/// Drives the pipeline for one request.
pub struct ReportProcessor {
    ocr: Box<dyn OcrEngine + Send + Sync>,
    structurer: Box<dyn StructuredExtractor + Send + Sync>,
    work_dir: PathBuf,
}

impl ReportProcessor {
    /// The work dir holds this request's image artifacts; the caller is
    /// responsible for keeping it unique across concurrent requests.
    pub fn new(
        ocr: Box<dyn OcrEngine + Send + Sync>,
        structurer: Box<dyn StructuredExtractor + Send + Sync>,
        work_dir: &Path,
    ) -> Self {
        Self {
            ocr,
            structurer,
            work_dir: work_dir.to_path_buf(),
        }
    }

    /// Wire the production engines from process configuration.
    #[cfg(feature = "ocr")]
    pub fn from_config(config: &crate::config::Config) -> Self {
        use crate::pipeline::extraction::ocr::TesseractEngine;
        use crate::pipeline::structuring::gemini::GeminiClient;
        use crate::pipeline::structuring::orchestrator::ReportStructurer;

        Self::new(
            Box::new(TesseractEngine::from_config(config)),
            Box::new(ReportStructurer::new(Box::new(GeminiClient::from_config(
                config,
            )))),
            &config.work_dir,
        )
    }

    /// Process one uploaded report image end to end.
    pub fn process(
        &self,
        image_bytes: &[u8],
        filename: &str,
    ) -> Result<ReportAnalysis, ProcessingError> {
        let _span = info_span!("process_report", filename).entered();

        fs::create_dir_all(&self.work_dir)?;
        let upload_path = self.work_dir.join(filename);
        fs::write(&upload_path, image_bytes)?;

        let normalized =
            normalize_for_ocr(&upload_path, &self.work_dir.join(NORMALIZED_IMAGE_NAME))?;

        let transcript = self.ocr.recognize_text(&normalized.path)?;
        let tokens = self.ocr.recognize_tokens(&normalized.path)?;
        let ocr_confidence = aggregate_confidence(&tokens);
        debug!(
            transcript_chars = transcript.len(),
            tokens = tokens.len(),
            ocr_confidence,
            "Recognition complete"
        );

        let lines = segment_test_block(&transcript);
        debug!(candidate_lines = lines.len(), "Test block segmented");

        let (extraction, summary) = self.structurer.extract_structured(&lines, ocr_confidence)?;
        info!(
            tests = extraction.tests.len(),
            explanations = summary.explanations.len(),
            "Report processed"
        );

        Ok(ReportAnalysis {
            lines,
            combined: CombinedReport {
                extraction: extraction.clone(),
                summary: summary.clone(),
            },
            extraction,
            summary,
        })
    }
}
