use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{AppError, TranslationError, UploadError};
use crate::file_utils::FileManager;
use crate::model_registry::{ModelEntry, ModelRegistry};
use crate::session::{FileUploadRecord, SessionStore, TranslationRecord};
use crate::translation::Translator;

// @module: Desk controller handling the user actions of one session

/// Result of a translate action
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateOutcome {
    /// The draft was translated and recorded
    Translated(TranslationRecord),
    /// The draft was empty; nothing was sent or recorded
    EmptyInput,
}

/// Snapshot of a session written by `Desk::export_history`
#[derive(Debug, Serialize)]
pub struct HistoryExport<'a> {
    /// When the export was taken
    pub exported_at: DateTime<Local>,
    /// Label of the model pair selected at export time
    pub selected_model: &'a str,
    /// Translations, most recent first
    pub translations: Vec<&'a TranslationRecord>,
    /// Uploads, most recent first
    pub file_uploads: Vec<&'a FileUploadRecord>,
}

/// Handles the actions a user can issue against one session: select a
/// model, edit the draft, upload a file, translate, and clear.
pub struct Desk {
    // @field: Session state, owned for the lifetime of the session
    store: SessionStore,
    // @field: Available model pairs
    registry: ModelRegistry,
    // @field: Currently selected model pair
    selected: &'static ModelEntry,
    // @field: Backend performing the translations
    translator: Arc<dyn Translator>,
    // @field: Length limit passed to the translator
    max_length: usize,
}

impl Desk {
    /// Start a session with an empty store
    pub fn new(translator: Arc<dyn Translator>, selected: &'static ModelEntry, max_length: usize) -> Self {
        Self::with_store(SessionStore::new(), translator, selected, max_length)
    }

    /// Start a session over an existing store
    pub fn with_store(
        store: SessionStore,
        translator: Arc<dyn Translator>,
        selected: &'static ModelEntry,
        max_length: usize,
    ) -> Self {
        Self {
            store,
            registry: ModelRegistry::builtin(),
            selected,
            translator,
            max_length,
        }
    }

    /// Read-only access to the session state
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn registry(&self) -> ModelRegistry {
        self.registry
    }

    pub fn selected_model(&self) -> &'static ModelEntry {
        self.selected
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Short description of the translation backend
    pub fn translator_description(&self) -> String {
        self.translator.describe()
    }

    /// Select a model pair by label, code pair, model id or list position
    pub fn select_model(&mut self, query: &str) -> Result<&'static ModelEntry, TranslationError> {
        let entry = self.registry.find(query)?;
        if entry != self.selected {
            info!("Selected model: {}", entry);
        }
        self.selected = entry;
        Ok(entry)
    }

    /// Replace the draft with typed text
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.store.set_draft_input(text);
    }

    /// Upload a `.txt` file: record it and load its content into the draft.
    ///
    /// A failed read leaves the session untouched.
    pub fn upload_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&FileUploadRecord, UploadError> {
        let upload = FileManager::read_text_upload(path)?;
        info!("Uploaded {} ({} chars)", upload.file_name, upload.content.chars().count());
        Ok(self.store.append_file_upload(upload.file_name, upload.content))
    }

    /// Translate the current draft with the selected model.
    ///
    /// An empty draft yields `TranslateOutcome::EmptyInput` without calling
    /// the translator. A translator error is returned as is and nothing is
    /// recorded.
    pub async fn translate(&mut self) -> Result<TranslateOutcome, TranslationError> {
        if self.store.draft_input().is_empty() {
            warn!("Please enter text for translation.");
            return Ok(TranslateOutcome::EmptyInput);
        }

        let input = self.store.draft_input().to_string();
        let model = self.selected;
        debug!("Translating {} chars with {}", input.chars().count(), model.label);

        let output = self.translator.translate(model, &input, self.max_length).await?;
        let record = self.store.append_translation(input, output, model.label);
        Ok(TranslateOutcome::Translated(record.clone()))
    }

    /// Clear both histories and the draft
    pub fn clear(&mut self) {
        self.store.clear_all();
        info!("Cleared translation and upload history");
    }

    /// Build a serializable snapshot of the session
    pub fn history_export(&self) -> HistoryExport<'_> {
        HistoryExport {
            exported_at: Local::now(),
            selected_model: self.selected.label,
            translations: self.store.list_translations().collect(),
            file_uploads: self.store.list_file_uploads().collect(),
        }
    }

    /// Write the session history as JSON to `path`
    pub fn export_history<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf, AppError> {
        let path = path.as_ref().to_path_buf();
        let json = serde_json::to_string_pretty(&self.history_export())
            .map_err(|e| AppError::File(format!("Failed to serialize history: {}", e)))?;
        FileManager::write_to_file(&path, &json)?;
        info!("Exported session history to {}", path.display());
        Ok(path)
    }
}
