//! In-process file storage.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::FileStorage;
use crate::error::{BookingError, BookingResult};

/// Blobs kept in memory; URLs are `{base_url}/{path}`.
pub struct MemoryFiles {
    base_url: String,
    files: DashMap<String, Vec<u8>>,
}

impl MemoryFiles {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            files: DashMap::new(),
        }
    }

    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.get(path).map(|f| f.clone())
    }
}

impl Default for MemoryFiles {
    fn default() -> Self {
        Self::new("memory://files")
    }
}

#[async_trait]
impl FileStorage for MemoryFiles {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> BookingResult<String> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Err(BookingError::validation("Upload path is empty"));
        }
        debug!(path, size = bytes.len(), "file stored");
        self.files.insert(path.to_string(), bytes);
        Ok(format!("{}/{}", self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_returns_public_url() {
        let files = MemoryFiles::new("https://cdn.example/");
        let url = files.upload("images/cam.png", vec![1, 2, 3]).await.unwrap();
        assert_eq!(url, "https://cdn.example/images/cam.png");
        assert_eq!(files.read("images/cam.png"), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn empty_path_is_rejected() {
        let files = MemoryFiles::default();
        assert!(files.upload("/", vec![1]).await.is_err());
    }
}
