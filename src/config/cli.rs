use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Filesystem storage rooted at `base_path`. Parent directories are created on write.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Storage for a single file path: rooted at its parent directory, returning
    /// the file name to use as the key.
    pub fn for_file(path: &str) -> (Self, String) {
        let path = Path::new(path);
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (Self::new(parent), name)
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = fs::read(self.full_path(path))?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    fn location(&self, path: &str) -> String {
        self.full_path(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("reports/a.csv", b"x,y\n").await.unwrap();
        assert_eq!(storage.read_file("reports/a.csv").await.unwrap(), b"x,y\n");
        assert!(storage
            .location("reports/a.csv")
            .ends_with("reports/a.csv"));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        match storage.read_file("nope.json").await {
            Err(crate::utils::error::CutListError::IoError(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_for_file_splits_path() {
        let (storage, name) = LocalStorage::for_file("cutlist.json");
        assert_eq!(name, "cutlist.json");
        assert_eq!(storage.base_path, PathBuf::from("."));

        let (storage, name) = LocalStorage::for_file("data/shop/cutlist.json");
        assert_eq!(name, "cutlist.json");
        assert_eq!(storage.base_path, PathBuf::from("data/shop"));
    }
}
