// Local filesystem adapter - File system operations on top of tokio::fs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        match tokio::fs::metadata(file_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to stat {}: {}",
                file_path.display(),
                e
            ))),
        }
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<u64, DomainError> {
        if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_directory(parent).await?;
        }

        let bytes = tokio::fs::copy(from, to).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => DomainError::FileNotFound(from.display().to_string()),
            ErrorKind::PermissionDenied => DomainError::PermissionDenied(to.display().to_string()),
            _ => DomainError::FsFail(format!(
                "Failed to copy {} to {}: {}",
                from.display(),
                to.display(),
                e
            )),
        })?;

        info!(from = %from.display(), to = %to.display(), bytes, "Copied file");
        Ok(bytes)
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(dir_path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to create directory: {}", e)))
    }

    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError> {
        match tokio::fs::remove_file(file_path).await {
            Ok(()) => {
                debug!(path = %file_path.display(), "Deleted file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!("Failed to delete file: {}", e))),
        }
    }

    async fn can_write_to_directory(&self, dir_path: &Path) -> Result<bool, DomainError> {
        let dir: PathBuf = if dir_path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir_path.to_path_buf()
        };

        // Anonymous temp file, removed as soon as it is dropped
        let probe = tokio::task::spawn_blocking(move || tempfile::tempfile_in(&dir))
            .await
            .map_err(|e| DomainError::InternalError(format!("Write probe task failed: {}", e)))?;

        match probe {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.kind(), ErrorKind::PermissionDenied | ErrorKind::NotFound) => {
                Ok(false)
            }
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to probe write access: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_exists() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("sample.mp4");
        let fs = LocalFsAdapter::new();

        assert!(!fs.file_exists(&file).await.unwrap());
        std::fs::write(&file, b"fake video data").unwrap();
        assert!(fs.file_exists(&file).await.unwrap());
        assert!(!fs.file_exists(dir.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_copy_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("asset.mp4");
        let to = dir.path().join("movies").join("nested").join("input.mp4");
        std::fs::write(&from, b"0123456789").unwrap();

        let copied = LocalFsAdapter::new().copy_file(&from, &to).await.unwrap();
        assert_eq!(copied, 10);
        assert_eq!(std::fs::read(&to).unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn test_copy_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = LocalFsAdapter::new()
            .copy_file(&dir.path().join("missing.mp4"), &dir.path().join("out.mp4"))
            .await;
        assert!(matches!(result, Err(DomainError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_file_tolerates_missing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("partial.mp4");
        std::fs::write(&file, b"partial").unwrap();

        let fs = LocalFsAdapter::new();
        fs.delete_file(&file).await.unwrap();
        assert!(!file.exists());
        fs.delete_file(&file).await.unwrap();
    }

    #[tokio::test]
    async fn test_can_write_to_directory() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFsAdapter::new();

        assert!(fs.can_write_to_directory(dir.path()).await.unwrap());
        assert!(!fs
            .can_write_to_directory(&dir.path().join("does-not-exist"))
            .await
            .unwrap());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
