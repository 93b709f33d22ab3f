use crate::models::config::AppConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager for app settings
pub struct ConfigManager {
    config_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a manager rooted at the platform config directory.
    ///
    /// The directory is created if missing.
    pub fn new() -> Result<Self, String> {
        let config_dir = dirs::config_dir()
            .ok_or("Failed to determine config directory")?
            .join("text-extractor");

        fs::create_dir_all(&config_dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        Ok(Self::in_dir(config_dir))
    }

    /// Create a manager for an explicit directory (created lazily on save)
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let config_path = config_dir.join("config.json");
        Self {
            config_dir,
            config_path,
        }
    }

    /// Save configuration to disk
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;

        let json = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_path, json)
            .map_err(|e| format!("Failed to write config file: {}", e))?;

        tracing::debug!(path = %self.config_path.display(), "Config saved");
        Ok(())
    }

    /// Load configuration from disk
    ///
    /// If config file doesn't exist, returns default configuration
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config_exists(&self) -> bool {
        self.config_path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::language::Language;

    /// Helper to create a temporary test config manager
    fn create_test_manager() -> ConfigManager {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir().join(format!(
            "text-extractor-test-{}-{}",
            std::process::id(),
            id
        ));
        let _ = fs::remove_dir_all(&temp_dir);

        ConfigManager::in_dir(temp_dir)
    }

    fn cleanup_test_files(manager: &ConfigManager) {
        let _ = fs::remove_dir_all(&manager.config_dir);
    }

    #[test]
    fn test_load_default_when_not_exists() {
        let manager = create_test_manager();
        assert!(!manager.config_exists());

        let config = manager.load().expect("load should fall back to defaults");
        assert_eq!(config, AppConfig::default());

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_save_and_load() {
        let manager = create_test_manager();

        let mut config = AppConfig::default();
        config.recognition.default_language = Language::Jpn;
        config.limits.max_file_bytes = 2048;
        config.engine.base_url = "http://10.0.0.2:8080".to_string();

        manager.save(&config).expect("save should succeed");
        assert!(manager.config_exists());

        let loaded = manager.load().expect("load should succeed");
        assert_eq!(loaded, config);

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_config_overwrite() {
        let manager = create_test_manager();

        let mut first = AppConfig::default();
        first.logging.json = true;
        manager.save(&first).unwrap();

        let mut second = AppConfig::default();
        second.logging.level = "debug".to_string();
        manager.save(&second).unwrap();

        let loaded = manager.load().unwrap();
        assert!(!loaded.logging.json);
        assert_eq!(loaded.logging.level, "debug");

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_corrupt_file_reports_error() {
        let manager = create_test_manager();
        fs::create_dir_all(&manager.config_dir).unwrap();
        fs::write(&manager.config_path, "{ not json").unwrap();

        let err = manager.load().unwrap_err();
        assert!(err.starts_with("Failed to parse config file"));

        cleanup_test_files(&manager);
    }

    #[test]
    fn test_config_file_path() {
        let manager = create_test_manager();
        assert!(manager.config_file_path().ends_with("config.json"));
    }
}
