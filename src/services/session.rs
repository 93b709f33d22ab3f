//! Single-user extraction session.
//!
//! Owns the accepted artifact, its preview, the active language, the result
//! buffer and the recognition invoker, and turns every pipeline failure into
//! a user-facing [`Notice`]. State sits behind a short-lived lock that is
//! never held across the recognition await.

use crate::error::PipelineError;
use crate::models::artifact::{ArtifactCandidate, InputArtifact};
use crate::models::export::{Notice, TextBlob};
use crate::models::job::{JobUpdate, RecognitionJob};
use crate::models::language::Language;
use crate::services::exporter::Exporter;
use crate::services::ocr::{RecognitionEngine, RecognitionInvoker};
use crate::services::preview::{resolve_preview, PreviewAllocator, PreviewHandle};
use crate::services::result_store::ResultStore;
use crate::services::validator::Validator;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Default)]
struct SessionState {
    artifact: Option<InputArtifact>,
    preview: Option<PreviewHandle>,
    /// Bumped on every accepted artifact so late results can be recognized as stale
    artifact_generation: u64,
    /// Set once recognition has succeeded for the current file; gates user edits
    recognized: bool,
    language: Language,
    store: ResultStore,
    notices: Vec<Notice>,
}

impl SessionState {
    fn release_preview(&mut self) {
        if let Some(mut preview) = self.preview.take() {
            preview.release();
        }
    }
}

pub struct ExtractionSession {
    validator: Validator,
    allocator: Arc<dyn PreviewAllocator>,
    invoker: RecognitionInvoker,
    exporter: Exporter,
    state: Mutex<SessionState>,
}

impl ExtractionSession {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        allocator: Arc<dyn PreviewAllocator>,
        exporter: Exporter,
    ) -> Self {
        Self {
            validator: Validator::default(),
            allocator,
            invoker: RecognitionInvoker::new(engine),
            exporter,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_language(self, language: Language) -> Self {
        self.state.lock().language = language;
        self
    }

    /// Validate and adopt a new file.
    ///
    /// On rejection nothing changes. On acceptance the previous preview is
    /// released and the result buffer cleared before the new file is adopted.
    pub fn submit(&self, candidate: ArtifactCandidate) -> Result<(), PipelineError> {
        let name = candidate.name.clone();
        let artifact = match self.validator.validate(candidate) {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::warn!(file = %name, reason = e.code(), "File rejected");
                self.state.lock().notices.push(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        let preview = resolve_preview(&artifact, &self.allocator);

        let mut state = self.state.lock();
        state.release_preview();
        state.store.clear();
        state.recognized = false;
        state.artifact_generation += 1;
        tracing::info!(
            file = artifact.name(),
            media_type = %artifact.media_type(),
            size = artifact.size(),
            image_preview = preview.is_image(),
            "File accepted"
        );
        state.preview = Some(preview);
        state.artifact = Some(artifact);
        Ok(())
    }

    pub fn artifact(&self) -> Option<InputArtifact> {
        self.state.lock().artifact.clone()
    }

    /// Renderable preview reference, if the current file has one
    pub fn preview_url(&self) -> Option<String> {
        self.state
            .lock()
            .preview
            .as_ref()
            .and_then(|p| p.url().map(str::to_string))
    }

    pub fn has_preview(&self) -> bool {
        self.state.lock().preview.is_some()
    }

    pub fn language(&self) -> Language {
        self.state.lock().language
    }

    /// Takes effect on the next extraction
    pub fn set_language(&self, language: Language) {
        self.state.lock().language = language;
        tracing::debug!(lang = %language, "Language selected");
    }

    /// Run recognition on the current file with the current language.
    ///
    /// On success the result buffer is overwritten. On failure it is left as
    /// it was. A run overtaken by a newer run or a newer file returns
    /// `Superseded` without touching the buffer or raising a notice.
    pub async fn extract(&self) -> Result<(), PipelineError> {
        let (artifact, language, generation) = {
            let mut state = self.state.lock();
            match state.artifact.clone() {
                Some(artifact) => (artifact, state.language, state.artifact_generation),
                None => {
                    let e = PipelineError::NoArtifact;
                    state.notices.push(Notice::error(e.to_string()));
                    return Err(e);
                }
            }
        };

        let result = self.invoker.extract(&artifact, language).await;

        let mut state = self.state.lock();
        if state.artifact_generation != generation {
            tracing::warn!(file = artifact.name(), "File replaced during extraction, dropping outcome");
            return Err(PipelineError::Superseded);
        }

        match result {
            Ok(text) => {
                state.store.set(text);
                state.recognized = true;
                state.notices.push(Notice::success("Text extracted successfully!"));
                Ok(())
            }
            Err(PipelineError::Superseded) => Err(PipelineError::Superseded),
            Err(e) => {
                state.notices.push(Notice::error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn current_job(&self) -> Option<RecognitionJob> {
        self.invoker.current_job()
    }

    pub fn is_extracting(&self) -> bool {
        self.invoker.is_running()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<JobUpdate> {
        self.invoker.subscribe()
    }

    /// Replace the buffer with user-edited text.
    ///
    /// Ignored (returns false) until recognition has succeeded for the current file.
    pub fn edit_text(&self, text: impl Into<String>) -> bool {
        let mut state = self.state.lock();
        if !state.recognized {
            tracing::debug!("Ignoring edit before any successful extraction");
            return false;
        }
        state.store.set(text);
        true
    }

    pub fn text(&self) -> String {
        self.state.lock().store.get().to_string()
    }

    pub fn word_count(&self) -> usize {
        self.state.lock().store.word_count()
    }

    pub fn char_count(&self) -> usize {
        self.state.lock().store.char_count()
    }

    /// Whether copy/download are available
    pub fn can_export(&self) -> bool {
        !self.state.lock().store.is_empty()
    }

    /// Copy the buffer to the clipboard. `Ok(false)` when there is nothing to copy.
    pub fn copy(&self) -> Result<bool, PipelineError> {
        let text = self.text();
        let result = self.exporter.copy(&text);

        let mut state = self.state.lock();
        match &result {
            Ok(true) => state.notices.push(Notice::success("Text copied to clipboard!")),
            Ok(false) => {}
            Err(e) => state.notices.push(Notice::error(e.to_string())),
        }
        result
    }

    /// Offer the buffer as a text file. `None` when there is nothing to save.
    pub fn download(&self) -> Option<TextBlob> {
        let text = self.text();
        let blob = self.exporter.download(&text)?;
        self.state
            .lock()
            .notices
            .push(Notice::success("Text downloaded successfully!"));
        Some(blob)
    }

    /// Drain pending notices
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut self.state.lock().notices)
    }

    /// End the session: release the preview and drop the file and text
    pub fn teardown(&self) {
        let mut state = self.state.lock();
        state.release_preview();
        state.artifact = None;
        state.store.clear();
        state.recognized = false;
        state.artifact_generation += 1;
        tracing::info!("Session torn down");
    }
}
