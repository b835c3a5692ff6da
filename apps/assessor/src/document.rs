//! Source documents: the resume and job-description text files.
//!
//! A document is validated and read exactly once, before any model call.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncReadExt;
use tracing::info;

use crate::errors::AppError;

/// Upper bound on input file size (2 MiB).
pub const MAX_DOCUMENT_BYTES: u64 = 2 * 1024 * 1024;

const REQUIRED_EXTENSION: &str = "txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Resume,
    JobDescription,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Resume => f.write_str("Resume file"),
            DocumentKind::JobDescription => f.write_str("Job description file"),
        }
    }
}

/// Checks that `path` ends in `.txt` (case-insensitive).
pub fn check_txt_extension(path: &Path) -> Result<(), String> {
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(REQUIRED_EXTENSION));

    if matches {
        Ok(())
    } else {
        Err(format!(
            "'{}' must have a .{REQUIRED_EXTENSION} extension",
            path.display()
        ))
    }
}

/// A validated, fully read input file. Never mutated after loading.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    kind: DocumentKind,
    text: String,
}

impl SourceDocument {
    /// Validates and reads `path`.
    ///
    /// Fails with `AppError::Input` when the suffix is not `.txt`, the path
    /// does not exist or is not a regular file, the file cannot be read, is
    /// empty (or whitespace only), or exceeds `MAX_DOCUMENT_BYTES`. Invalid
    /// UTF-8 is replaced with U+FFFD rather than rejected.
    pub async fn load(path: &Path, kind: DocumentKind) -> Result<Self, AppError> {
        check_txt_extension(path).map_err(|e| AppError::Input(format!("{kind} {e}")))?;

        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::Input(format!(
                    "{kind} not found: {}",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(AppError::Input(format!(
                    "{kind} is not accessible: {}: {e}",
                    path.display()
                )));
            }
        };

        if !metadata.is_file() {
            return Err(AppError::Input(format!(
                "{kind} is not a file: {}",
                path.display()
            )));
        }
        check_size(kind, path, metadata.len())?;

        let bytes = read_bounded(path).await.map_err(|e| {
            AppError::Input(format!("{kind} is not readable: {}: {e}", path.display()))
        })?;
        // The file may have grown between stat and read.
        check_size(kind, path, bytes.len() as u64)?;

        let text = String::from_utf8_lossy(&bytes).into_owned();
        if text.trim().is_empty() {
            return Err(AppError::Input(format!(
                "{kind} contains no text: {}",
                path.display()
            )));
        }

        info!("{kind} loaded: {} ({} bytes)", path.display(), bytes.len());

        Ok(Self {
            path: path.to_path_buf(),
            kind,
            text,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Reads at most `MAX_DOCUMENT_BYTES + 1` bytes, enough to detect an
/// oversized file without buffering all of it.
async fn read_bounded(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = tokio::fs::File::open(path).await?;
    let mut bytes = Vec::new();
    file.take(MAX_DOCUMENT_BYTES + 1)
        .read_to_end(&mut bytes)
        .await?;
    Ok(bytes)
}

fn check_size(kind: DocumentKind, path: &Path, size: u64) -> Result<(), AppError> {
    if size == 0 {
        return Err(AppError::Input(format!(
            "{kind} is empty: {}",
            path.display()
        )));
    }
    if size > MAX_DOCUMENT_BYTES {
        return Err(AppError::Input(format!(
            "{kind} is too large: {size} bytes (limit {MAX_DOCUMENT_BYTES} bytes)"
        )));
    }
    Ok(())
}
