use crate::error::PipelineError;
use crate::models::artifact::{ArtifactCandidate, InputArtifact, MediaType};
use crate::models::config::DEFAULT_MAX_FILE_BYTES;

/// Type and size policy for incoming files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validator {
    max_bytes: u64,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl Validator {
    pub fn with_limit(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Check a candidate. Type is checked before size.
    pub fn validate(&self, candidate: ArtifactCandidate) -> Result<InputArtifact, PipelineError> {
        let media_type = MediaType::from_mime(&candidate.declared_type).ok_or_else(|| {
            PipelineError::UnsupportedType {
                media_type: candidate.declared_type.clone(),
            }
        })?;

        if candidate.size > self.max_bytes {
            return Err(PipelineError::TooLarge {
                size: candidate.size,
                limit: self.max_bytes,
            });
        }

        Ok(InputArtifact::new(
            candidate.name,
            media_type,
            candidate.size,
            candidate.bytes,
        ))
    }
}

/// Validate against the default 10 MiB policy
pub fn validate(candidate: ArtifactCandidate) -> Result<InputArtifact, PipelineError> {
    Validator::default().validate(candidate)
}
