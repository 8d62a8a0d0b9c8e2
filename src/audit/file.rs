use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{AuditEntry, AuditLog};

/// Append-only flat-text audit log.
///
/// Writers are serialized through a mutex and each record goes out in a single
/// `write_all` on a file opened in append mode, so records never interleave.
pub struct FileAuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, block: &str) -> std::io::Result<()> {
        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[async_trait]
impl AuditLog for FileAuditLog {
    async fn record(&self, entry: &AuditEntry<'_>) -> std::io::Result<()> {
        let block = entry.render();
        self.append(&block).await
    }
}
