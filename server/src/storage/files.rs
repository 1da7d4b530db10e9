//! File-backed submission storage.

use super::SubmissionRecord;
use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Writes each submission to `form_<formId>_<unixMillis>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: Arc<PathBuf>,
}

impl FileStore {
    /// Use `dir` for submissions, creating it if missing.
    pub async fn open(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if fs::metadata(&dir).await.is_err() {
            fs::create_dir_all(&dir).await?;
            tracing::info!("Created data directory {}", dir.display());
        }
        Ok(Self { dir: Arc::new(dir) })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a record as pretty-printed JSON. The file name is the
    /// submission id; an existing file is never overwritten.
    pub async fn write(&self, record: &SubmissionRecord) -> Result<String> {
        let contents = serde_json::to_vec_pretty(record)?;
        let form_id = sanitize_form_id(&record.form_id);
        let mut millis = record.submitted_at.timestamp_millis();

        loop {
            let file_name = format!("form_{}_{}.json", form_id, millis);
            let path = self.dir.join(&file_name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(&contents).await?;
                    file.sync_all().await?;
                    tracing::debug!(path = %path.display(), "submission written");
                    return Ok(file_name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Keep `[A-Za-z0-9_-]`, replace everything else with `_`.
pub fn sanitize_form_id(form_id: &str) -> String {
    form_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
