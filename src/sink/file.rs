// src/sink/file.rs
// =============================================================================
// Writes each page's text to <output_dir>/<slugify(url)>.txt
// =============================================================================

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{slugify, Sink, WriteError};

#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file a URL's text is written to.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", slugify(url)))
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn ensure_destination(&self) -> Result<(), WriteError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| WriteError::CreateDir {
                path: self.dir.clone(),
                source,
            })
    }

    async fn persist(&self, url: &str, text: &str) -> Result<PathBuf, WriteError> {
        let path = self.path_for(url);
        tokio::fs::write(&path, text)
            .await
            .map_err(|source| WriteError::Write {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }
}
