pub mod confidence;
pub mod ocr;
pub mod preprocess;
pub mod segment;
pub mod types;

pub use confidence::*;
pub use ocr::*;
pub use preprocess::*;
pub use segment::*;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot load image at {path}: {reason}")]
    ImageLoad { path: PathBuf, reason: String },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("OCR engine initialization failed: {0}")]
    OcrInit(String),

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),
}
