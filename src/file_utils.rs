use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::UploadError;

// @module: File and directory utilities

/// Extension accepted for uploads
const UPLOAD_EXTENSION: &str = "txt";

/// A decoded text upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextUpload {
    /// File name without its directory
    pub file_name: String,
    /// Decoded UTF-8 content
    pub content: String,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: Upload extension, case-insensitive
    pub fn is_text_upload<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(UPLOAD_EXTENSION))
    }

    /// Read a `.txt` file as an upload.
    ///
    /// The content must be valid UTF-8; a leading byte order mark is dropped.
    pub fn read_text_upload<P: AsRef<Path>>(path: P) -> Result<TextUpload, UploadError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !Self::file_exists(path) {
            return Err(UploadError::NotFound(display));
        }

        if !Self::is_text_upload(path) {
            return Err(UploadError::UnsupportedExtension(display));
        }

        let bytes = fs::read(path).map_err(|source| UploadError::Io {
            path: display.clone(),
            source,
        })?;

        let content = String::from_utf8(bytes).map_err(|_| UploadError::InvalidEncoding(display.clone()))?;
        let content = match content.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => content,
        };

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or(display);

        Ok(TextUpload { file_name, content })
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Timestamped export path inside a directory
    pub fn generate_export_path<P: AsRef<Path>>(dir: P) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        dir.as_ref().join(format!("mtdesk-history-{}.json", stamp))
    }
}
