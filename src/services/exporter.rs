use crate::error::PipelineError;
use crate::models::export::TextBlob;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// System clipboard boundary
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), String>;
}

/// Save-dialog boundary. Outcome of the save is not reported back.
pub trait FileSaver: Send + Sync {
    fn save(&self, blob: &TextBlob);
}

/// Copy and download actions over the result buffer
#[derive(Clone)]
pub struct Exporter {
    clipboard: Arc<dyn Clipboard>,
    saver: Arc<dyn FileSaver>,
}

impl Exporter {
    pub fn new(clipboard: Arc<dyn Clipboard>, saver: Arc<dyn FileSaver>) -> Self {
        Self { clipboard, saver }
    }

    /// Copy text verbatim. Returns `Ok(false)` without touching the clipboard when empty.
    pub fn copy(&self, text: &str) -> Result<bool, PipelineError> {
        if text.is_empty() {
            return Ok(false);
        }

        self.clipboard.write_text(text).map_err(|e| {
            tracing::warn!(error = %e, "Clipboard write denied");
            PipelineError::CopyFailed
        })?;

        tracing::info!(chars = text.chars().count(), "Text copied to clipboard");
        Ok(true)
    }

    /// Offer the text as `extracted-text-<now millis>.txt`. `None` when empty.
    pub fn download(&self, text: &str) -> Option<TextBlob> {
        self.download_at(text, chrono::Utc::now().timestamp_millis())
    }

    pub fn download_at(&self, text: &str, timestamp_millis: i64) -> Option<TextBlob> {
        if text.is_empty() {
            return None;
        }

        let blob = TextBlob::plain_text(text, timestamp_millis);
        self.saver.save(&blob);
        tracing::info!(file = %blob.file_name, bytes = blob.bytes.len(), "Text offered for download");
        Some(blob)
    }
}

/// Clipboard backed by the platform's copy utility
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Pick the copy utility for the current platform
    pub fn system() -> Self {
        if cfg!(target_os = "macos") {
            Self::with_command("pbcopy", &[])
        } else if cfg!(target_os = "windows") {
            Self::with_command("clip", &[])
        } else if std::env::var_os("WAYLAND_DISPLAY").is_some() {
            Self::with_command("wl-copy", &[])
        } else {
            Self::with_command("xclip", &["-selection", "clipboard"])
        }
    }

    pub fn with_command(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("Failed to start {}: {}", self.program, e))?;

        {
            let stdin = child
                .stdin
                .as_mut()
                .ok_or_else(|| format!("Failed to open stdin of {}", self.program))?;
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| format!("Failed to write to {}: {}", self.program, e))?;
        }
        // Close stdin so the utility sees EOF
        drop(child.stdin.take());

        let status = child
            .wait()
            .map_err(|e| format!("Failed to wait for {}: {}", self.program, e))?;
        if !status.success() {
            return Err(format!("{} exited with {}", self.program, status));
        }

        Ok(())
    }
}

/// Saver that writes blobs into a directory
pub struct DirectoryFileSaver {
    dir: PathBuf,
}

impl DirectoryFileSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Configured directory, else the user's download directory, else the temp directory
    pub fn from_config(download_dir: Option<&Path>) -> Self {
        let dir = download_dir
            .map(Path::to_path_buf)
            .or_else(dirs::download_dir)
            .unwrap_or_else(std::env::temp_dir);
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn write(&self, blob: &TextBlob) -> Result<PathBuf, String> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| format!("Failed to create download directory: {}", e))?;

        let path = self.dir.join(&blob.file_name);
        std::fs::write(&path, &blob.bytes)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
        Ok(path)
    }
}

impl FileSaver for DirectoryFileSaver {
    fn save(&self, blob: &TextBlob) {
        match self.write(blob) {
            Ok(path) => tracing::info!(path = %path.display(), "Saved extracted text"),
            Err(e) => tracing::error!(error = %e, "Failed to save extracted text"),
        }
    }
}
