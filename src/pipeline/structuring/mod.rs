pub mod gemini;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod types;
pub mod validation;

pub use gemini::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;
pub use types::*;
pub use validation::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("Cannot reach the generation service at {0}")]
    Connection(String),

    #[error("Generation request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Generation service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed generation reply: {0}")]
    MalformedReply(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Response envelope parsing error: {0}")]
    ResponseParsing(String),
}
