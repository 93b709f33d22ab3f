use crate::error::EngineError;
use crate::models::artifact::MediaType;
use crate::models::job::EngineStatus;
use crate::models::language::Language;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Channel the engine reports its status events on
pub type ProgressSender = mpsc::UnboundedSender<EngineStatus>;

/// Recognition engine trait - abstraction for different OCR backends
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Recognize text from a raw image or PDF payload.
    ///
    /// Status events go to `progress` as they happen; the sender is dropped
    /// when the call settles. The returned text is passed on verbatim.
    async fn recognize(
        &self,
        payload: &[u8],
        media_type: MediaType,
        language: Language,
        progress: ProgressSender,
    ) -> Result<String, EngineError>;
}
