/*!
 * Registry of the pretrained translation model pairs offered to the user.
 *
 * Each entry maps a human-readable label (stored verbatim in the translation
 * history) to an opaque model identifier understood by the inference backend.
 * The entry order is the order shown to the user; the first entry is the
 * default selection.
 */

use once_cell::sync::Lazy;
use std::fmt;

use crate::errors::TranslationError;
use crate::language_utils;

/// One selectable model pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    /// Human readable label, e.g. "English to German"
    pub label: &'static str,
    /// Backend model identifier, e.g. "Helsinki-NLP/opus-mt-en-de"
    pub model_id: &'static str,
    /// ISO 639-1 code of the source language
    pub source_language: &'static str,
    /// ISO 639-1 code of the target language
    pub target_language: &'static str,
}

impl ModelEntry {
    const fn new(
        label: &'static str,
        model_id: &'static str,
        source_language: &'static str,
        target_language: &'static str,
    ) -> Self {
        Self {
            label,
            model_id,
            source_language,
            target_language,
        }
    }

    /// English name of the source language, falling back to its code
    pub fn source_language_name(&self) -> String {
        language_utils::get_language_name(self.source_language)
            .unwrap_or_else(|_| self.source_language.to_string())
    }

    /// English name of the target language, falling back to its code
    pub fn target_language_name(&self) -> String {
        language_utils::get_language_name(self.target_language)
            .unwrap_or_else(|_| self.target_language.to_string())
    }
}

impl fmt::Display for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.model_id)
    }
}

// "English to Telugu" points at the opus-mt-en-tl model; the label is kept
// as users know it even though `tl` is the Tagalog code.
static BUILTIN_MODELS: Lazy<Vec<ModelEntry>> = Lazy::new(|| {
    vec![
        ModelEntry::new("English to German", "Helsinki-NLP/opus-mt-en-de", "en", "de"),
        ModelEntry::new("German to English", "Helsinki-NLP/opus-mt-de-en", "de", "en"),
        ModelEntry::new("English to French", "Helsinki-NLP/opus-mt-en-fr", "en", "fr"),
        ModelEntry::new("French to English", "Helsinki-NLP/opus-mt-fr-en", "fr", "en"),
        ModelEntry::new("English to Urdu", "Helsinki-NLP/opus-mt-en-ur", "en", "ur"),
        ModelEntry::new("Urdu to English", "Helsinki-NLP/opus-mt-ur-en", "ur", "en"),
        ModelEntry::new("English to Spanish", "Helsinki-NLP/opus-mt-en-es", "en", "es"),
        ModelEntry::new("Spanish to English", "Helsinki-NLP/opus-mt-es-en", "es", "en"),
        ModelEntry::new("English to Chinese", "Helsinki-NLP/opus-mt-en-zh", "en", "zh"),
        ModelEntry::new("Chinese to English", "Helsinki-NLP/opus-mt-zh-en", "zh", "en"),
        ModelEntry::new("English to Telugu", "Helsinki-NLP/opus-mt-en-tl", "en", "tl"),
    ]
});

/// Lookup over the fixed set of model pairs
#[derive(Debug, Clone, Copy)]
pub struct ModelRegistry {
    entries: &'static [ModelEntry],
}

impl ModelRegistry {
    /// The registry shipped with the application
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_MODELS.as_slice(),
        }
    }

    /// All entries in display order
    pub fn entries(&self) -> &'static [ModelEntry] {
        self.entries
    }

    /// Labels in display order
    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|e| e.label)
    }

    /// The default selection
    pub fn default_entry(&self) -> &'static ModelEntry {
        &self.entries[0]
    }

    /// Exact label lookup
    pub fn get(&self, label: &str) -> Option<&'static ModelEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Resolve user input to an entry.
    ///
    /// Accepts an exact label, a case-insensitive label, a model identifier,
    /// a language code pair such as `en-de` or `fre eng`, or a 1-based
    /// position in the list.
    pub fn find(&self, query: &str) -> Result<&'static ModelEntry, TranslationError> {
        let query = query.trim();

        if let Some(entry) = self.get(query) {
            return Ok(entry);
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.label.eq_ignore_ascii_case(query) || e.model_id.eq_ignore_ascii_case(query))
        {
            return Ok(entry);
        }

        let codes: Vec<&str> = query
            .split(|c: char| c.is_whitespace() || c == '-' || c == '>')
            .filter(|part| !part.is_empty())
            .collect();
        if let [source, target] = codes.as_slice() {
            if let Some(entry) = self.find_by_languages(source, target) {
                return Ok(entry);
            }
        }

        if let Ok(position) = query.parse::<usize>() {
            if position >= 1 && position <= self.entries.len() {
                return Ok(&self.entries[position - 1]);
            }
        }

        Err(TranslationError::UnknownModel(query.to_string()))
    }

    /// Find the pair translating `source` into `target`, in any ISO 639 form
    pub fn find_by_languages(&self, source: &str, target: &str) -> Option<&'static ModelEntry> {
        self.entries.iter().find(|e| {
            language_utils::language_codes_match(e.source_language, source)
                && language_utils::language_codes_match(e.target_language, target)
        })
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
