use super::engine::RecognitionEngine;
use crate::error::PipelineError;
use crate::models::artifact::InputArtifact;
use crate::models::job::{EngineStatus, JobStatus, JobUpdate, RecognitionJob};
use crate::models::language::Language;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

const UPDATE_BUFFER: usize = 64;

/// Runs recognition jobs against an engine and tracks the current one.
///
/// Only the most recently started job is authoritative: a newer `extract`
/// supersedes any job still in flight, whose later progress and result are
/// dropped. The superseded engine call is left to finish on its own.
pub struct RecognitionInvoker {
    engine: Arc<dyn RecognitionEngine>,
    current: Mutex<Option<RecognitionJob>>,
    generation: AtomicU64,
    updates: broadcast::Sender<JobUpdate>,
}

impl RecognitionInvoker {
    pub fn new(engine: Arc<dyn RecognitionEngine>) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Self {
            engine,
            current: Mutex::new(None),
            generation: AtomicU64::new(0),
            updates,
        }
    }

    /// Receive progress/status updates for every job started after subscribing
    pub fn subscribe(&self) -> broadcast::Receiver<JobUpdate> {
        self.updates.subscribe()
    }

    /// Snapshot of the current (or last settled) job
    pub fn current_job(&self) -> Option<RecognitionJob> {
        self.current.lock().clone()
    }

    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .map(RecognitionJob::is_running)
            .unwrap_or(false)
    }

    /// Recognize the artifact's text in `language`.
    ///
    /// Engine errors are logged and surface as `ExtractionFailed`. A job
    /// overtaken by a newer one resolves to `Superseded`.
    pub async fn extract(
        &self,
        artifact: &InputArtifact,
        language: Language,
    ) -> Result<String, PipelineError> {
        let job_id = self.start_job(artifact, language);

        let (tx, mut rx) = mpsc::unbounded_channel::<EngineStatus>();
        self.mark_running(job_id);
        tracing::info!(job_id, file = artifact.name(), lang = %language, "Recognition started");
        let mut call = self
            .engine
            .recognize(artifact.bytes(), artifact.media_type(), language, tx);

        let result = loop {
            tokio::select! {
                biased;
                Some(status) = rx.recv() => self.apply_status(job_id, &status),
                result = &mut call => break result,
            }
        };
        // Events sent right before settling
        while let Ok(status) = rx.try_recv() {
            self.apply_status(job_id, &status);
        }

        if !self.settle(job_id, result.is_ok()) {
            tracing::warn!(job_id, "Discarding result of superseded recognition job");
            return Err(PipelineError::Superseded);
        }

        match result {
            Ok(text) => {
                tracing::info!(job_id, chars = text.chars().count(), "Recognition succeeded");
                Ok(text)
            }
            Err(e) => {
                tracing::error!(job_id, error = %e, "Recognition failed");
                Err(PipelineError::ExtractionFailed)
            }
        }
    }

    /// Register a pending job as current. The id is taken under the lock so
    /// the most recently registered job always carries the highest id.
    fn start_job(&self, artifact: &InputArtifact, language: Language) -> u64 {
        let mut current = self.current.lock();
        let job_id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(previous) = current.as_ref().filter(|job| job.is_running()) {
            tracing::warn!(previous = previous.id, job_id, "Superseding in-flight recognition job");
        }

        *current = Some(RecognitionJob {
            id: job_id,
            artifact_name: artifact.name().to_string(),
            language,
            progress: 0,
            status: JobStatus::Pending,
        });
        self.publish(job_id, 0, JobStatus::Pending);
        job_id
    }

    fn mark_running(&self, job_id: u64) {
        let mut current = self.current.lock();
        if let Some(job) = current.as_mut().filter(|job| job.id == job_id) {
            job.status = JobStatus::Running;
            self.publish(job_id, 0, JobStatus::Running);
        }
    }

    fn apply_status(&self, job_id: u64, status: &EngineStatus) {
        if !status.is_recognizing() {
            tracing::debug!(job_id, phase = %status.status, progress = status.progress, "Engine status");
            return;
        }

        let mut current = self.current.lock();
        let job = match current.as_mut() {
            Some(job) if job.id == job_id && job.is_running() => job,
            _ => {
                tracing::debug!(job_id, "Ignoring progress from stale job");
                return;
            }
        };

        let percent = status.percent();
        if percent < job.progress {
            return;
        }
        job.progress = percent;
        self.publish(job_id, percent, JobStatus::Running);
    }

    /// Reset progress and record the outcome. Returns false if the job is no longer current.
    fn settle(&self, job_id: u64, succeeded: bool) -> bool {
        let mut current = self.current.lock();
        match current.as_mut() {
            Some(job) if job.id == job_id => {
                job.progress = 0;
                job.status = if succeeded {
                    JobStatus::Succeeded
                } else {
                    JobStatus::Failed
                };
                self.publish(job_id, 0, job.status);
                true
            }
            _ => false,
        }
    }

    fn publish(&self, job_id: u64, progress: u8, status: JobStatus) {
        // No subscribers is fine
        self.updates
            .send(JobUpdate {
                job_id,
                progress,
                status,
            })
            .ok();
    }
}
