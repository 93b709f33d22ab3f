//! Error types for the extraction pipeline

use thiserror::Error;

/// Pipeline-level failures. Every variant is recoverable; the session turns
/// them into user-facing notices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("Please upload a JPEG, PNG or PDF file (got '{media_type}')")]
    UnsupportedType { media_type: String },

    #[error("File size must be less than {}", format_limit(*.limit))]
    TooLarge { size: u64, limit: u64 },

    #[error("Failed to extract text from the file. Please try again.")]
    ExtractionFailed,

    #[error("Failed to copy text to clipboard")]
    CopyFailed,

    #[error("Please select a file first")]
    NoArtifact,

    #[error("Extraction superseded by a newer request")]
    Superseded,
}

impl PipelineError {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "unsupported_type",
            Self::TooLarge { .. } => "too_large",
            Self::ExtractionFailed => "extraction_failed",
            Self::CopyFailed => "copy_failed",
            Self::NoArtifact => "no_artifact",
            Self::Superseded => "superseded",
        }
    }
}

/// Render a byte limit in the largest whole unit that fits
fn format_limit(limit: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if limit >= MB && limit % MB == 0 {
        format!("{}MB", limit / MB)
    } else if limit >= KB && limit % KB == 0 {
        format!("{}KB", limit / KB)
    } else {
        format!("{} bytes", limit)
    }
}

/// Failures reported by a recognition engine. Logged, never shown verbatim.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OCR server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Malformed engine response: {0}")]
    Protocol(String),

    #[error("Engine reported failure: {0}")]
    Engine(String),
}
