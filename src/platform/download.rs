//! Client-side download of captured images

use std::path::PathBuf;

use super::PlatformError;

/// Hands a finished file to the user
pub trait Downloader {
    fn download(&self, file_name: &str, content_type: &str, bytes: &[u8])
        -> Result<(), PlatformError>;
}

/// Writes downloads into a directory on disk
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Downloader for DirectoryDownloader {
    fn download(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| PlatformError::Failed(format!("create {}: {}", self.dir.display(), e)))?;

        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)
            .map_err(|e| PlatformError::Failed(format!("write {}: {}", path.display(), e)))?;

        log::info!(
            "Saved {} ({}, {} bytes)",
            path.display(),
            content_type,
            bytes.len()
        );
        Ok(())
    }
}
