use crate::models::language::Language;
use serde::{Deserialize, Serialize};

/// Engine phase whose progress drives the job's progress bar
pub const RECOGNIZING_TEXT: &str = "recognizing text";

/// Status event emitted by the recognition engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineStatus {
    pub status: String,
    /// Fractional completion of this phase (0.0 - 1.0)
    pub progress: f32,
}

impl EngineStatus {
    pub fn new(status: impl Into<String>, progress: f32) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }

    pub fn recognizing(progress: f32) -> Self {
        Self::new(RECOGNIZING_TEXT, progress)
    }

    pub fn is_recognizing(&self) -> bool {
        self.status == RECOGNIZING_TEXT
    }

    /// Fractional progress as a whole percentage, clamped to 0..=100
    pub fn percent(&self) -> u8 {
        if !self.progress.is_finite() {
            return 0;
        }
        (self.progress * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// Snapshot of the current recognition job
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecognitionJob {
    pub id: u64,
    pub artifact_name: String,
    pub language: Language,
    pub progress: u8,
    pub status: JobStatus,
}

impl RecognitionJob {
    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }
}

/// Progress event payload for subscribers
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct JobUpdate {
    pub job_id: u64,
    pub progress: u8,
    pub status: JobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_rounds() {
        assert_eq!(EngineStatus::recognizing(0.0).percent(), 0);
        assert_eq!(EngineStatus::recognizing(0.104).percent(), 10);
        assert_eq!(EngineStatus::recognizing(0.555).percent(), 56);
        assert_eq!(EngineStatus::recognizing(1.0).percent(), 100);
    }

    #[test]
    fn test_percent_clamps_out_of_range() {
        assert_eq!(EngineStatus::recognizing(1.7).percent(), 100);
        assert_eq!(EngineStatus::recognizing(-0.2).percent(), 0);
        assert_eq!(EngineStatus::recognizing(f32::NAN).percent(), 0);
    }

    #[test]
    fn test_phase_filter() {
        assert!(EngineStatus::recognizing(0.5).is_recognizing());
        assert!(!EngineStatus::new("loading language traineddata", 0.5).is_recognizing());
    }

    #[test]
    fn test_engine_status_deserialize() {
        let status: EngineStatus =
            serde_json::from_str(r#"{"status":"recognizing text","progress":0.25}"#).unwrap();
        assert_eq!(status, EngineStatus::recognizing(0.25));
    }
}
