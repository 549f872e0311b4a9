//! Checks applied to local files before they are uploaded.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif", "svg", "avif",
];

#[derive(Debug, Error)]
pub enum FileValidationError {
    #[error("file path must not be empty")]
    EmptyPath,
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("file is too large: {size} bytes (limit is {limit} bytes)", limit = MAX_FILE_BYTES)]
    TooLarge { size: u64 },
    #[error("unsupported image type `{extension}`; allowed: {}", IMAGE_EXTENSIONS.join(", "))]
    UnsupportedExtension { extension: String },
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A validated file and its contents.
#[derive(Debug)]
pub struct LocalFile {
    pub path: PathBuf,
    pub file_name: String,
    pub contents: Vec<u8>,
}

pub async fn read_image_file(raw_path: &str) -> Result<LocalFile, FileValidationError> {
    read_checked(raw_path, Some(IMAGE_EXTENSIONS)).await
}

pub async fn read_csv_file(raw_path: &str) -> Result<LocalFile, FileValidationError> {
    read_checked(raw_path, None).await
}

async fn read_checked(
    raw_path: &str,
    allowed_extensions: Option<&[&str]>,
) -> Result<LocalFile, FileValidationError> {
    let trimmed = raw_path.trim();
    if trimmed.is_empty() {
        return Err(FileValidationError::EmptyPath);
    }
    let path = fs::canonicalize(trimmed).await.map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => FileValidationError::NotFound(trimmed.to_string()),
        _ => FileValidationError::Io {
            path: PathBuf::from(trimmed),
            source: err,
        },
    })?;

    let metadata = fs::metadata(&path).await.map_err(|source| FileValidationError::Io {
        path: path.clone(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(FileValidationError::NotAFile(path));
    }
    if metadata.len() > MAX_FILE_BYTES {
        return Err(FileValidationError::TooLarge {
            size: metadata.len(),
        });
    }
    if let Some(allowed) = allowed_extensions {
        let extension = extension_of(&path);
        if !allowed.contains(&extension.as_str()) {
            return Err(FileValidationError::UnsupportedExtension { extension });
        }
    }

    let io_error = |source| FileValidationError::Io {
        path: path.clone(),
        source,
    };
    let file = fs::File::open(&path).await.map_err(io_error)?;
    // The file may have grown since the metadata check.
    let contents = read_at_most(file, MAX_FILE_BYTES).await.map_err(io_error)?;
    if contents.len() as u64 > MAX_FILE_BYTES {
        return Err(FileValidationError::TooLarge {
            size: contents.len() as u64,
        });
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(LocalFile {
        path,
        file_name,
        contents,
    })
}

/// Reads up to `limit + 1` bytes so callers can tell an oversized stream apart.
async fn read_at_most<R>(reader: R, limit: u64) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut contents = Vec::new();
    reader.take(limit + 1).read_to_end(&mut contents).await?;
    Ok(contents)
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}
