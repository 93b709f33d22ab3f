use crate::models::artifact::{InputArtifact, MediaType};
use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Allocates revocable references to image payloads for rendering
pub trait PreviewAllocator: Send + Sync {
    /// Allocate a reference for the artifact's payload
    fn acquire(&self, artifact: &InputArtifact) -> Result<String, String>;

    /// Revoke a reference. Unknown or already-revoked references are ignored.
    fn release(&self, url: &str);
}

/// Scoped image reference, released once on `release()` or drop
pub struct ImagePreview {
    url: String,
    allocator: Arc<dyn PreviewAllocator>,
    released: bool,
}

impl ImagePreview {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.allocator.release(&self.url);
        self.released = true;
    }
}

impl Drop for ImagePreview {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ImagePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePreview")
            .field("url", &self.url)
            .field("released", &self.released)
            .finish()
    }
}

/// Displayable representation of an accepted artifact
#[derive(Debug)]
pub enum PreviewHandle {
    Image(ImagePreview),
    /// Non-renderable file (PDF) or failed allocation; carries the display name
    Placeholder { name: String },
}

impl PreviewHandle {
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Image(preview) => Some(preview.url()),
            Self::Placeholder { .. } => None,
        }
    }

    /// Release the underlying reference, if any. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Self::Image(preview) = self {
            preview.release();
        }
    }
}

/// Derive a preview for an artifact
pub fn resolve_preview(
    artifact: &InputArtifact,
    allocator: &Arc<dyn PreviewAllocator>,
) -> PreviewHandle {
    if !artifact.media_type().is_image() {
        return PreviewHandle::Placeholder {
            name: artifact.name().to_string(),
        };
    }

    match allocator.acquire(artifact) {
        Ok(url) => PreviewHandle::Image(ImagePreview {
            url,
            allocator: Arc::clone(allocator),
            released: false,
        }),
        Err(e) => {
            tracing::warn!(file = artifact.name(), error = %e, "Preview allocation failed, using placeholder");
            PreviewHandle::Placeholder {
                name: artifact.name().to_string(),
            }
        }
    }
}

/// In-memory allocator that hands out `blob:` ids backed by base64 data URLs
#[derive(Default)]
pub struct DataUrlAllocator {
    entries: Mutex<HashMap<String, String>>,
    next_id: AtomicU64,
    acquired: AtomicU64,
    released: AtomicU64,
}

impl DataUrlAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data URL behind a live reference
    pub fn resolve(&self, url: &str) -> Option<String> {
        self.entries.lock().get(url).cloned()
    }

    /// Number of references not yet released
    pub fn live(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::SeqCst)
    }

    fn expected_format(media_type: MediaType) -> Option<ImageFormat> {
        match media_type {
            MediaType::Jpeg => Some(ImageFormat::Jpeg),
            MediaType::Png => Some(ImageFormat::Png),
            MediaType::Pdf => None,
        }
    }
}

impl PreviewAllocator for DataUrlAllocator {
    fn acquire(&self, artifact: &InputArtifact) -> Result<String, String> {
        let expected = Self::expected_format(artifact.media_type())
            .ok_or_else(|| format!("{} is not previewable", artifact.media_type()))?;

        let actual = image::guess_format(artifact.bytes())
            .map_err(|e| format!("Unrecognized image data: {}", e))?;
        if actual != expected {
            return Err(format!(
                "Payload is {:?} but was declared as {}",
                actual,
                artifact.media_type()
            ));
        }

        let data_url = format!(
            "data:{};base64,{}",
            artifact.media_type().mime(),
            general_purpose::STANDARD.encode(artifact.bytes())
        );
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let url = format!("blob:text-extractor/{}", id);

        self.entries.lock().insert(url.clone(), data_url);
        self.acquired.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(url = %url, file = artifact.name(), "Preview reference acquired");

        Ok(url)
    }

    fn release(&self, url: &str) {
        if self.entries.lock().remove(url).is_some() {
            self.released.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(url = %url, "Preview reference released");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::artifact::ArtifactCandidate;
    use crate::services::validator::validate;
    use image::{DynamicImage, Rgb, RgbImage};

    /// Helper: encode a tiny solid image in the given format
    pub(crate) fn encoded_image(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([255, 255, 255])));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), format)
            .expect("encode test image");
        bytes
    }

    fn artifact(name: &str, mime: &str, bytes: Vec<u8>) -> InputArtifact {
        validate(ArtifactCandidate::new(name, mime, bytes)).unwrap()
    }

    fn allocator() -> (Arc<DataUrlAllocator>, Arc<dyn PreviewAllocator>) {
        let concrete = Arc::new(DataUrlAllocator::new());
        let shared: Arc<dyn PreviewAllocator> = concrete.clone();
        (concrete, shared)
    }

    #[test]
    fn test_png_resolves_to_image_handle() {
        let (concrete, shared) = allocator();
        let png = artifact("a.png", "image/png", encoded_image(ImageFormat::Png));

        let handle = resolve_preview(&png, &shared);

        assert!(handle.is_image());
        let url = handle.url().unwrap();
        assert!(url.starts_with("blob:"));
        assert!(concrete.resolve(url).unwrap().starts_with("data:image/png;base64,"));
        assert_eq!(concrete.live(), 1);
    }

    #[test]
    fn test_jpeg_resolves_to_image_handle() {
        let (_concrete, shared) = allocator();
        let jpeg = artifact("a.jpg", "image/jpeg", encoded_image(ImageFormat::Jpeg));
        assert!(resolve_preview(&jpeg, &shared).is_image());
    }

    #[test]
    fn test_pdf_resolves_to_placeholder_without_allocation() {
        let (concrete, shared) = allocator();
        let pdf = artifact("report.pdf", "application/pdf", b"%PDF-1.7".to_vec());

        let handle = resolve_preview(&pdf, &shared);

        match handle {
            PreviewHandle::Placeholder { ref name } => assert_eq!(name, "report.pdf"),
            _ => panic!("expected placeholder"),
        }
        assert_eq!(concrete.acquired(), 0);
    }

    #[test]
    fn test_allocation_failure_falls_back_to_placeholder() {
        let (concrete, shared) = allocator();
        // Declared PNG, payload is not an image
        let bogus = artifact("fake.png", "image/png", b"not an image".to_vec());

        let handle = resolve_preview(&bogus, &shared);

        assert!(!handle.is_image());
        assert_eq!(concrete.acquired(), 0);
    }

    #[test]
    fn test_mismatched_payload_falls_back_to_placeholder() {
        let (_concrete, shared) = allocator();
        let mislabeled = artifact("a.jpg", "image/jpeg", encoded_image(ImageFormat::Png));
        assert!(!resolve_preview(&mislabeled, &shared).is_image());
    }

    #[test]
    fn test_release_is_idempotent() {
        let (concrete, shared) = allocator();
        let png = artifact("a.png", "image/png", encoded_image(ImageFormat::Png));

        let mut handle = resolve_preview(&png, &shared);
        handle.release();
        handle.release();
        drop(handle);

        assert_eq!(concrete.acquired(), 1);
        assert_eq!(concrete.released(), 1);
        assert_eq!(concrete.live(), 0);
    }

    #[test]
    fn test_drop_releases() {
        let (concrete, shared) = allocator();
        let png = artifact("a.png", "image/png", encoded_image(ImageFormat::Png));

        for _ in 0..5 {
            let _handle = resolve_preview(&png, &shared);
        }

        assert_eq!(concrete.acquired(), 5);
        assert_eq!(concrete.released(), 5);
        assert_eq!(concrete.live(), 0);
    }

    #[test]
    fn test_releasing_unknown_url_is_noop() {
        let (concrete, _shared) = allocator();
        concrete.release("blob:text-extractor/999");
        assert_eq!(concrete.released(), 0);
    }
}
