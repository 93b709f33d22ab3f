use crate::models::language::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest file the pipeline accepts by default (10 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// OCR server connection settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:39835".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Recognition defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RecognitionConfig {
    pub default_language: Language,
}

/// Input limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    pub max_file_bytes: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExportConfig {
    /// Where downloads are written; the user's download directory when unset
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub recognition: RecognitionConfig,
    pub limits: LimitsConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.engine.base_url, "http://127.0.0.1:39835");
        assert_eq!(config.engine.timeout_secs, 120);
        assert_eq!(config.recognition.default_language, Language::Eng);
        assert_eq!(config.limits.max_file_bytes, 10_485_760);
        assert!(config.export.download_dir.is_none());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_app_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();

        let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_optional_sections_default_when_missing() {
        let json = r#"{
            "engine": { "base_url": "http://localhost:9000", "timeout_secs": 30 },
            "recognition": { "default_language": "deu" },
            "limits": { "max_file_bytes": 1024 }
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.recognition.default_language, Language::Deu);
        assert_eq!(config.limits.max_file_bytes, 1024);
        assert_eq!(config.export, ExportConfig::default());
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
