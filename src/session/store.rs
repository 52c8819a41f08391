/*!
 * Session state store.
 *
 * Owns the translation history, the file-upload history and the current
 * draft input of one session. The store is created empty when a session
 * starts and dropped when it ends; nothing here is persisted.
 *
 * Every mutation bumps a revision counter and publishes it on a
 * `tokio::sync::watch` channel so consumers can re-render on change.
 */

use log::debug;
use tokio::sync::watch;

use super::models::{FileUploadRecord, TranslationRecord};

/// In-memory state of a single translation session
#[derive(Debug)]
pub struct SessionStore {
    /// Translations in insertion order
    translations: Vec<TranslationRecord>,
    /// Uploads in insertion order
    file_uploads: Vec<FileUploadRecord>,
    /// Text currently staged for translation
    draft_input: String,
    /// Number of mutations applied so far
    revision: u64,
    /// Publishes `revision` after every mutation
    changes: watch::Sender<u64>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            translations: Vec::new(),
            file_uploads: Vec::new(),
            draft_input: String::new(),
            revision: 0,
            changes,
        }
    }

    /// Append a translation record.
    ///
    /// The store appends unconditionally; rejecting empty input is up to
    /// the caller.
    pub fn append_translation(
        &mut self,
        input: impl Into<String>,
        output: impl Into<String>,
        configuration: impl Into<String>,
    ) -> &TranslationRecord {
        let record = TranslationRecord::new(input, output, configuration);
        debug!(
            "Recording translation #{} ({})",
            self.translations.len() + 1,
            record.configuration()
        );
        self.translations.push(record);
        self.notify();
        &self.translations[self.translations.len() - 1]
    }

    /// Append an upload record and replace the draft with its content.
    ///
    /// Any unsaved draft text is discarded.
    pub fn append_file_upload(
        &mut self,
        file_name: impl Into<String>,
        content: impl Into<String>,
    ) -> &FileUploadRecord {
        let record = FileUploadRecord::new(file_name, content);
        debug!(
            "Recording upload #{} ({}, {} chars)",
            self.file_uploads.len() + 1,
            record.file_name(),
            record.content().chars().count()
        );
        self.draft_input = record.content().to_string();
        self.file_uploads.push(record);
        self.notify();
        &self.file_uploads[self.file_uploads.len() - 1]
    }

    /// Overwrite the draft input
    pub fn set_draft_input(&mut self, text: impl Into<String>) {
        self.draft_input = text.into();
        self.notify();
    }

    /// Empty both histories and reset the draft in one step
    pub fn clear_all(&mut self) {
        debug!(
            "Clearing session ({} translations, {} uploads)",
            self.translations.len(),
            self.file_uploads.len()
        );
        self.translations.clear();
        self.file_uploads.clear();
        self.draft_input.clear();
        self.notify();
    }

    /// Translations, most recent first
    pub fn list_translations(
        &self,
    ) -> impl DoubleEndedIterator<Item = &TranslationRecord> + ExactSizeIterator {
        self.translations.iter().rev()
    }

    /// Uploads, most recent first
    pub fn list_file_uploads(
        &self,
    ) -> impl DoubleEndedIterator<Item = &FileUploadRecord> + ExactSizeIterator {
        self.file_uploads.iter().rev()
    }

    pub fn draft_input(&self) -> &str {
        &self.draft_input
    }

    pub fn translation_count(&self) -> usize {
        self.translations.len()
    }

    pub fn file_upload_count(&self) -> usize {
        self.file_uploads.len()
    }

    /// True when both histories and the draft are empty
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty() && self.file_uploads.is_empty() && self.draft_input.is_empty()
    }

    /// Number of mutations applied since the store was created
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receive a notification with the new revision after each mutation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn notify(&mut self) {
        self.revision += 1;
        self.changes.send_replace(self.revision);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
