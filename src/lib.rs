pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

pub use error::{EngineError, PipelineError};
pub use models::artifact::{ArtifactCandidate, InputArtifact, MediaType};
pub use models::config::AppConfig;
pub use models::export::{Notice, NoticeLevel, TextBlob};
pub use models::job::{EngineStatus, JobStatus, JobUpdate, RecognitionJob};
pub use models::language::Language;
pub use services::config::ConfigManager;
pub use services::exporter::{Clipboard, CommandClipboard, DirectoryFileSaver, Exporter, FileSaver};
pub use services::ocr::{HttpRecognitionEngine, RecognitionEngine, RecognitionInvoker};
pub use services::preview::{DataUrlAllocator, PreviewAllocator, PreviewHandle};
pub use services::session::ExtractionSession;
pub use services::validator::{validate, Validator};
pub use utils::logging::init_tracing;

/// Wire a session against the configured OCR server, the system clipboard and
/// the download directory.
pub fn build_session(config: &AppConfig) -> Result<ExtractionSession, String> {
    let engine = HttpRecognitionEngine::new(&config.engine)?;
    let exporter = Exporter::new(
        Arc::new(CommandClipboard::system()),
        Arc::new(DirectoryFileSaver::from_config(config.export.download_dir.as_deref())),
    );

    tracing::info!(
        engine = engine.base_url(),
        lang = %config.recognition.default_language,
        max_file_bytes = config.limits.max_file_bytes,
        "Extraction session ready"
    );

    Ok(ExtractionSession::new(Arc::new(engine), Arc::new(DataUrlAllocator::new()), exporter)
        .with_validator(Validator::with_limit(config.limits.max_file_bytes))
        .with_language(config.recognition.default_language))
}
