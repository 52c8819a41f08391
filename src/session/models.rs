/*!
 * History records kept by a translation session.
 *
 * Records are immutable once created; the store only ever appends them or
 * drops all of them at once.
 */

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One completed translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Unique record ID
    id: Uuid,
    /// Text that was translated
    input: String,
    /// Text returned by the translator
    output: String,
    /// Label of the model pair used, e.g. "English to German"
    configuration: String,
    /// When the translation was recorded
    created_at: DateTime<Local>,
}

impl TranslationRecord {
    /// Create a new record stamped with the current time
    pub fn new(
        input: impl Into<String>,
        output: impl Into<String>,
        configuration: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            input: input.into(),
            output: output.into(),
            configuration: configuration.into(),
            created_at: Local::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}

/// One uploaded text file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadRecord {
    /// Unique record ID
    id: Uuid,
    /// File name as delivered by the upload, without directories
    file_name: String,
    /// Decoded text content
    content: String,
    /// When the upload was recorded
    created_at: DateTime<Local>,
}

impl FileUploadRecord {
    /// Create a new record stamped with the current time
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            content: content.into(),
            created_at: Local::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }
}
