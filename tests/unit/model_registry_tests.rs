/*!
 * Tests for the model pair registry
 */

use mtdesk::errors::TranslationError;
use mtdesk::model_registry::ModelRegistry;

/// Every model id is unique
#[test]
fn test_builtin_modelIds_shouldBeUnique() {
    let registry = ModelRegistry::builtin();
    let mut ids: Vec<_> = registry.entries().iter().map(|e| e.model_id).collect();
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), registry.entries().len());
}

/// Code pairs resolve in 639-1 and 639-2 forms
#[test]
fn test_find_withLanguageCodes_shouldResolve() {
    let registry = ModelRegistry::builtin();

    assert_eq!(registry.find("en-fr").unwrap().label, "English to French");
    assert_eq!(registry.find("zh > en").unwrap().label, "Chinese to English");
    assert_eq!(registry.find("ger eng").unwrap().label, "German to English");
}

/// The Telugu label keeps its opus-mt-en-tl model
#[test]
fn test_get_telugu_shouldUseEnTlModel() {
    let entry = ModelRegistry::builtin().get("English to Telugu").unwrap();

    assert_eq!(entry.model_id, "Helsinki-NLP/opus-mt-en-tl");
}

/// Unknown queries and out-of-range positions are rejected
#[test]
fn test_find_withUnknownQuery_shouldFail() {
    let registry = ModelRegistry::builtin();

    assert!(matches!(registry.find("Klingon to English"), Err(TranslationError::UnknownModel(_))));
    assert!(registry.find("0").is_err());
    assert!(registry.find("12").is_err());
}

/// Language names come from the ISO tables
#[test]
fn test_languageNames_shouldBeEnglishNames() {
    let entry = ModelRegistry::builtin().get("Urdu to English").unwrap();

    assert_eq!(entry.source_language_name(), "Urdu");
    assert_eq!(entry.target_language_name(), "English");
}
