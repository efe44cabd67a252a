//! Local-disk file store used by the upload endpoint

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

/// Directory-backed store for uploaded files.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Start writing `filename`. Bytes go to a hidden temporary file next to
    /// the destination and only become visible under `filename` on
    /// [`PendingFile::commit`].
    ///
    /// `filename` must already be a single path component.
    pub async fn create(&self, filename: &str) -> io::Result<PendingFile> {
        let temp_path = self.root.join(format!(".{}.part", Uuid::new_v4()));
        let file = File::create(&temp_path).await?;
        Ok(PendingFile {
            file: Some(file),
            temp_path,
            final_path: self.root.join(filename),
            written: 0,
            committed: false,
        })
    }
}

/// A file being received. Dropping it without committing removes the
/// temporary file.
#[derive(Debug)]
pub struct PendingFile {
    file: Option<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
    committed: bool,
}

impl PendingFile {
    pub async fn write_chunk(&mut self, bytes: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "file already closed"))?;
        file.write_all(bytes).await?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush to disk and atomically move the file to its final name.
    pub async fn commit(mut self) -> io::Result<PathBuf> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        fs::rename(&self.temp_path, &self.final_path).await?;
        self.committed = true;
        Ok(self.final_path.clone())
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        self.file.take();
        // Drop cannot await. A single unlink is run inline on the current thread.
        if !self.committed {
            if let Err(e) = std::fs::remove_file(&self.temp_path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(
                        "Failed to remove partial upload {}: {}",
                        self.temp_path.display(),
                        e
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn commit_moves_bytes_to_final_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        let mut pending = store.create("report.bin").await.unwrap();
        pending.write_chunk(b"hello ").await.unwrap();
        pending.write_chunk(b"world").await.unwrap();
        assert_eq!(pending.written(), 11);
        assert_eq!(entries(dir.path()).len(), 1);
        assert!(!dir.path().join("report.bin").exists());

        let path = pending.commit().await.unwrap();
        assert_eq!(path, dir.path().join("report.bin"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
        assert_eq!(entries(dir.path()), vec!["report.bin".to_string()]);
    }

    #[tokio::test]
    async fn dropping_uncommitted_file_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());

        let mut pending = store.create("partial.bin").await.unwrap();
        pending.write_chunk(&[0u8; 1024]).await.unwrap();
        drop(pending);

        assert!(entries(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn commit_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path());
        std::fs::write(dir.path().join("same.txt"), b"old").unwrap();

        let mut pending = store.create("same.txt").await.unwrap();
        pending.write_chunk(b"new").await.unwrap();
        pending.commit().await.unwrap();

        assert_eq!(std::fs::read(dir.path().join("same.txt")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn create_fails_when_root_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalFileStore::new(dir.path().join("missing"));
        assert!(store.create("a.txt").await.is_err());

        store.ensure_root().await.unwrap();
        assert!(store.create("a.txt").await.is_ok());
    }
}
