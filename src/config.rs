use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Generation model used when `GEMINI_MODEL` is unset.
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-2.0-flash";

/// OCR language code used when none is configured.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Per-request working directory used when none is configured.
pub const DEFAULT_WORK_DIR: &str = "temp";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),
}

/// Process-wide configuration, read once at startup and passed by reference
/// into component constructors. Read-only afterwards, so concurrent requests
/// share it without synchronization.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the text-generation service.
    pub gemini_api_key: String,
    /// Generation model identifier.
    pub gemini_model: String,
    /// Tesseract traineddata directory. Engine default when `None`.
    pub tessdata_dir: Option<PathBuf>,
    /// OCR language code (e.g. "eng").
    pub ocr_language: String,
    /// Working directory for per-request image artifacts. The caller is
    /// responsible for making this unique per concurrent request.
    pub work_dir: PathBuf,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `GEMINI_API_KEY` is required; `GEMINI_MODEL` and `TESSDATA_DIR` are
    /// optional overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_api_key =
            env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingVar("GEMINI_API_KEY"))?;

        Ok(Self {
            gemini_api_key,
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_MODEL.to_string()),
            tessdata_dir: env::var("TESSDATA_DIR").ok().map(PathBuf::from),
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
        })
    }

    /// Set the OCR language code (e.g. "eng", "eng+fra").
    pub fn with_ocr_language(mut self, language: &str) -> Self {
        self.ocr_language = language.to_string();
        self
    }

    /// Set the per-request working directory.
    pub fn with_work_dir(mut self, dir: &Path) -> Self {
        self.work_dir = dir.to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config() -> Config {
        Config {
            gemini_api_key: "test-key".into(),
            gemini_model: DEFAULT_GENERATION_MODEL.into(),
            tessdata_dir: None,
            ocr_language: DEFAULT_OCR_LANGUAGE.into(),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
        }
    }

    #[test]
    fn builders_override_defaults() {
        let config = make_config()
            .with_ocr_language("eng+fra")
            .with_work_dir(Path::new("/tmp/req-42"));
        assert_eq!(config.ocr_language, "eng+fra");
        assert_eq!(config.work_dir, PathBuf::from("/tmp/req-42"));
    }

    // Environment access is process-global, so the env round trip lives in a
    // single test to avoid interleaving with itself under the parallel runner.
    #[test]
    fn from_env_reads_key_and_applies_defaults() {
        env::set_var("GEMINI_API_KEY", "k-123");
        env::remove_var("GEMINI_MODEL");
        env::remove_var("TESSDATA_DIR");

        let config = Config::from_env().unwrap();
        assert_eq!(config.gemini_api_key, "k-123");
        assert_eq!(config.gemini_model, DEFAULT_GENERATION_MODEL);
        assert!(config.tessdata_dir.is_none());
        assert_eq!(config.ocr_language, DEFAULT_OCR_LANGUAGE);
        assert_eq!(config.work_dir, PathBuf::from(DEFAULT_WORK_DIR));

        env::set_var("GEMINI_MODEL", "gemini-2.5-pro");
        env::set_var("TESSDATA_DIR", "/usr/share/tessdata");
        let config = Config::from_env().unwrap();
        assert_eq!(config.gemini_model, "gemini-2.5-pro");
        assert_eq!(
            config.tessdata_dir.as_deref(),
            Some(Path::new("/usr/share/tessdata"))
        );

        env::remove_var("GEMINI_API_KEY");
        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::MissingVar("GEMINI_API_KEY"))));

        env::remove_var("GEMINI_MODEL");
        env::remove_var("TESSDATA_DIR");
    }
}
