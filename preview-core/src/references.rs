//! Hair reference photos.
//!
//! A fixed before / operation / after series sent with every hair pass to
//! anchor density and growth direction. Read from disk on first use and kept
//! in memory for the life of the process.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::{Error, Result};
use crate::gemini::InlineImage;

/// Reference file names, in the order they are sent
pub const REFERENCE_FILES: [&str; 3] = ["hair-before.jpg", "hair-operation.jpg", "hair-after.jpg"];

const REFERENCE_MIME_TYPE: &str = "image/jpeg";

/// Lazily loaded reference set
pub struct ReferenceLibrary {
    dir: PathBuf,
    cache: RwLock<Option<Arc<Vec<InlineImage>>>>,
}

impl ReferenceLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Whether the set has been loaded yet
    pub async fn is_loaded(&self) -> bool {
        self.cache.read().await.is_some()
    }

    /// Get the reference set, reading it from disk on first use.
    pub async fn load(&self) -> Result<Arc<Vec<InlineImage>>> {
        if let Some(images) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(images));
        }

        let mut guard = self.cache.write().await;
        if let Some(images) = guard.as_ref() {
            return Ok(Arc::clone(images));
        }

        let mut images = Vec::with_capacity(REFERENCE_FILES.len());
        for name in REFERENCE_FILES {
            let path = self.dir.join(name);
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                Error::configuration(format!(
                    "Failed to read reference image {}: {}",
                    path.display(),
                    e
                ))
            })?;
            images.push(InlineImage::from_bytes(REFERENCE_MIME_TYPE, &bytes));
        }

        info!(dir = %self.dir.display(), count = images.len(), "Hair reference images loaded");

        let images = Arc::new(images);
        *guard = Some(Arc::clone(&images));
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_references(dir: &Path) {
        for (i, name) in REFERENCE_FILES.iter().enumerate() {
            std::fs::write(dir.join(name), format!("reference-{i}")).unwrap();
        }
    }

    #[tokio::test]
    async fn test_load_in_fixed_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_references(temp_dir.path());

        let library = ReferenceLibrary::new(temp_dir.path());
        assert!(!library.is_loaded().await);

        let images = library.load().await.unwrap();
        assert_eq!(images.len(), 3);
        for (i, image) in images.iter().enumerate() {
            assert_eq!(image.mime_type, "image/jpeg");
            assert_eq!(
                *image,
                InlineImage::from_bytes("image/jpeg", format!("reference-{i}").as_bytes())
            );
        }
        assert!(library.is_loaded().await);
    }

    #[tokio::test]
    async fn test_cached_after_first_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_references(temp_dir.path());

        let library = ReferenceLibrary::new(temp_dir.path());
        let first = library.load().await.unwrap();

        // Files are gone, the cache still answers
        for name in REFERENCE_FILES {
            std::fs::remove_file(temp_dir.path().join(name)).unwrap();
        }
        let second = library.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_first_loads_converge() {
        let temp_dir = tempfile::tempdir().unwrap();
        write_references(temp_dir.path());

        let library = Arc::new(ReferenceLibrary::new(temp_dir.path()));
        let (a, b) = tokio::join!(library.load(), library.load());
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    }

    #[tokio::test]
    async fn test_missing_file_is_configuration_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join(REFERENCE_FILES[0]), b"only one").unwrap();

        let library = ReferenceLibrary::new(temp_dir.path());
        let err = library.load().await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("hair-operation.jpg"));
        assert!(!library.is_loaded().await);
    }
}
