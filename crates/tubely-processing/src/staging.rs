//! Local staging of uploaded bytes.
//!
//! Every staged file is a `tempfile::TempPath`: the file is removed when the
//! `StagedFile` is dropped, whichever way the pipeline exits.

use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tubely_core::AppError;

const STAGED_PREFIX: &str = "tubely-upload-";

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("Staging I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Upload exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("Upload stream failed: {0}")]
    Aborted(String),

    #[error("Upload is empty")]
    Empty,
}

impl From<StagingError> for AppError {
    fn from(err: StagingError) -> Self {
        match err {
            StagingError::Io(e) => AppError::StagingFailed(e.to_string()),
            StagingError::TooLarge { limit } => AppError::PayloadTooLarge(format!(
                "Video exceeds the maximum upload size of {} bytes",
                limit
            )),
            StagingError::Aborted(msg) => AppError::UploadAborted(msg),
            StagingError::Empty => AppError::InvalidInput("Uploaded video is empty".to_string()),
        }
    }
}

/// An exclusively owned local file, deleted on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: TempPath,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the whole file back into memory.
    pub async fn read(&self) -> io::Result<Bytes> {
        let data = tokio::fs::read(&self.path).await?;
        Ok(Bytes::from(data))
    }
}

/// Directory in which staged files are created.
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl Default for StagingArea {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create an empty, uniquely named file for tool output.
    pub fn reserve(&self, suffix: &str) -> Result<StagedFile, StagingError> {
        let file = tempfile::Builder::new()
            .prefix(STAGED_PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.dir)?;
        Ok(StagedFile {
            path: file.into_temp_path(),
            size: 0,
        })
    }

    /// Write `stream` to a fresh `.mp4` staged file.
    ///
    /// Fails with `TooLarge` as soon as more than `max_bytes` have arrived, so
    /// an oversized body is never written out in full. A stream error aborts
    /// staging; the partial file is removed either way.
    pub async fn stage<S, E>(&self, stream: S, max_bytes: usize) -> Result<StagedFile, StagingError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Display,
    {
        let named = tempfile::Builder::new()
            .prefix(STAGED_PREFIX)
            .suffix(".mp4")
            .tempfile_in(&self.dir)?;
        let (file, path) = named.into_parts();
        let mut file = tokio::fs::File::from_std(file);

        let mut stream = std::pin::pin!(stream);
        let mut written: usize = 0;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StagingError::Aborted(e.to_string()))?;
            written = written.saturating_add(chunk.len());
            if written > max_bytes {
                return Err(StagingError::TooLarge { limit: max_bytes });
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if written == 0 {
            return Err(StagingError::Empty);
        }

        tracing::debug!(
            path = %path.display(),
            size_bytes = written,
            "Upload staged"
        );

        Ok(StagedFile {
            path,
            size: written as u64,
        })
    }
}
