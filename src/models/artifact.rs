use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Media types the pipeline accepts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaType {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "application/pdf")]
    Pdf,
}

impl MediaType {
    /// Parse a declared MIME string. Parameters (`; charset=...`) and case are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    /// Whether the payload can be rendered directly as a preview
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Jpeg | Self::Png)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Guess a declared MIME type from a file extension
pub fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// A file the user picked or dropped, before validation
#[derive(Debug, Clone)]
pub struct ArtifactCandidate {
    pub name: String,
    pub declared_type: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl ArtifactCandidate {
    /// Create a candidate whose size is the payload length
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    /// Read a candidate from disk, declaring its type from the extension
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());

        Ok(Self::new(name, mime_from_extension(path), bytes))
    }
}

/// An accepted input file. Immutable; cloning shares the payload.
#[derive(Debug, Clone)]
pub struct InputArtifact {
    name: String,
    media_type: MediaType,
    size: u64,
    bytes: Arc<[u8]>,
}

impl InputArtifact {
    pub(crate) fn new(name: String, media_type: MediaType, size: u64, bytes: Vec<u8>) -> Self {
        Self {
            name,
            media_type,
            size,
            bytes: bytes.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(MediaType::from_mime("image/jpeg"), Some(MediaType::Jpeg));
        assert_eq!(MediaType::from_mime("IMAGE/PNG"), Some(MediaType::Png));
        assert_eq!(
            MediaType::from_mime("application/pdf; charset=binary"),
            Some(MediaType::Pdf)
        );
        assert_eq!(MediaType::from_mime("image/gif"), None);
        assert_eq!(MediaType::from_mime(""), None);
    }

    #[test]
    fn test_is_image() {
        assert!(MediaType::Jpeg.is_image());
        assert!(MediaType::Png.is_image());
        assert!(!MediaType::Pdf.is_image());
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_from_extension(&PathBuf::from("scan.JPG")), "image/jpeg");
        assert_eq!(mime_from_extension(&PathBuf::from("a/b/page.png")), "image/png");
        assert_eq!(mime_from_extension(&PathBuf::from("doc.pdf")), "application/pdf");
        assert_eq!(
            mime_from_extension(&PathBuf::from("notes.txt")),
            "application/octet-stream"
        );
        assert_eq!(
            mime_from_extension(&PathBuf::from("noext")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_candidate_size_matches_payload() {
        let candidate = ArtifactCandidate::new("a.png", "image/png", vec![0u8; 42]);
        assert_eq!(candidate.size, 42);
    }

    #[test]
    fn test_candidate_from_path() {
        let path = std::env::temp_dir().join(format!("text-extractor-candidate-{}.pdf", std::process::id()));
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let candidate = ArtifactCandidate::from_path(&path).unwrap();
        assert_eq!(candidate.declared_type, "application/pdf");
        assert_eq!(candidate.size, 8);
        assert!(candidate.name.ends_with(".pdf"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_candidate_from_missing_path() {
        let result = ArtifactCandidate::from_path(Path::new("/definitely/not/here.png"));
        assert!(result.is_err());
    }
}
