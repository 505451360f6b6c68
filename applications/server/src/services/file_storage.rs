/// File storage service - media blobs on local disk
use crate::error::{Result, ServerError};
use async_trait::async_trait;
use std::io::{ErrorKind, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};

/// Readable handle over a bounded window of a blob
pub type BlobReader = Pin<Box<dyn AsyncRead + Send>>;

/// Random-access byte store addressed by an opaque locator
#[async_trait]
pub trait BlobSource: Send + Sync {
    async fn exists(&self, locator: &str) -> Result<bool>;

    /// Total length in bytes. Fails with `ResourceUnavailable` if the blob is missing.
    async fn size(&self, locator: &str) -> Result<u64>;

    /// Reader over the inclusive byte window `[start, end]`
    async fn open_range(&self, locator: &str, start: u64, end: u64) -> Result<BlobReader>;

    /// Write a new blob and return its locator
    async fn store(&self, extension: &str, data: &[u8]) -> Result<String>;

    /// Remove a blob. Removing a missing blob succeeds.
    async fn delete(&self, locator: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Create the storage directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a locator to a path under the storage root.
    ///
    /// Locators are bare file names; anything with separators, `..` or a
    /// root component is rejected so no path can escape the root.
    pub fn resolve(&self, locator: &str) -> Result<PathBuf> {
        let mut components = Path::new(locator).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.base_path.join(name)),
            _ => Err(ServerError::BadRequest(format!(
                "Invalid media locator: {locator:?}"
            ))),
        }
    }
}

fn unavailable(locator: &str, err: std::io::Error) -> ServerError {
    if err.kind() == ErrorKind::NotFound {
        ServerError::ResourceUnavailable(locator.to_string())
    } else {
        ServerError::Io(err)
    }
}

#[async_trait]
impl BlobSource for FileStorage {
    async fn exists(&self, locator: &str) -> Result<bool> {
        let path = self.resolve(locator)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn size(&self, locator: &str) -> Result<u64> {
        let path = self.resolve(locator)?;
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| unavailable(locator, e))?;
        Ok(metadata.len())
    }

    async fn open_range(&self, locator: &str, start: u64, end: u64) -> Result<BlobReader> {
        if end < start {
            return Err(ServerError::Internal(format!(
                "Invalid byte window {start}-{end} for {locator}"
            )));
        }

        let path = self.resolve(locator)?;
        let mut file = fs::File::open(&path)
            .await
            .map_err(|e| unavailable(locator, e))?;
        file.seek(SeekFrom::Start(start)).await?;

        Ok(Box::pin(file.take(end - start + 1)))
    }

    async fn store(&self, extension: &str, data: &[u8]) -> Result<String> {
        let locator = format!("{}.{}", uuid::Uuid::new_v4(), extension);
        let path = self.resolve(&locator)?;

        fs::create_dir_all(&self.base_path).await?;
        fs::write(&path, data).await?;

        tracing::debug!(locator, bytes = data.len(), "Stored media file");
        Ok(locator)
    }

    async fn delete(&self, locator: &str) -> Result<()> {
        let path = self.resolve(locator)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locators_cannot_escape_the_root() {
        let storage = FileStorage::new(PathBuf::from("/srv/media"));

        assert_eq!(
            storage.resolve("abc.mp3").unwrap(),
            PathBuf::from("/srv/media/abc.mp3")
        );
        for bad in ["../etc/passwd", "/etc/passwd", "a/b.mp3", "..", "", "."] {
            assert!(storage.resolve(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
