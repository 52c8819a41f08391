/*!
 * Integration tests for desk actions against a session
 */

use anyhow::Result;
use std::fs;

use mtdesk::errors::TranslationError;
use mtdesk::TranslateOutcome;
use crate::common::{self, MockTranslator};

/// Typing then translating records one entry with the selected label
#[tokio::test]
async fn test_translate_withTypedDraft_shouldRecordEntry() -> Result<()> {
    common::init_test_logging();
    let translator = MockTranslator::working();
    let mut desk = common::create_test_desk(translator.clone());

    desk.set_draft("Hello");
    let outcome = desk.translate().await?;

    assert!(matches!(&outcome, TranslateOutcome::Translated(r) if r.output() == "HELLO"));
    let latest = desk.store().list_translations().next().unwrap();
    assert_eq!(latest.input(), "Hello");
    assert_eq!(latest.configuration(), "English to German");

    let calls = translator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].max_length, 500);
    Ok(())
}

/// An uploaded file becomes the text that gets translated
#[tokio::test]
async fn test_uploadThenTranslate_shouldTranslateFileContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "a.txt", "Guten Tag")?;
    let translator = MockTranslator::with_answer(|_, _| "Good day".to_string());
    let mut desk = common::create_test_desk(translator.clone());
    desk.select_model("German to English")?;

    desk.set_draft("something typed earlier");
    desk.upload_file(&path)?;
    assert_eq!(desk.store().draft_input(), "Guten Tag");

    desk.translate().await?;

    assert_eq!(translator.calls()[0].text, "Guten Tag");
    assert_eq!(translator.calls()[0].model_label, "German to English");
    let record = desk.store().list_translations().next().unwrap();
    assert_eq!(record.output(), "Good day");
    assert_eq!(desk.store().file_upload_count(), 1);
    Ok(())
}

/// An empty draft is refused before the translator is called
#[tokio::test]
async fn test_translate_withEmptyDraft_shouldWarnOnly() -> Result<()> {
    let translator = MockTranslator::working();
    let mut desk = common::create_test_desk(translator.clone());

    let outcome = desk.translate().await?;

    assert_eq!(outcome, TranslateOutcome::EmptyInput);
    assert!(translator.calls().is_empty());
    assert!(desk.store().is_empty());
    Ok(())
}

/// A failing translator leaves the history untouched
#[tokio::test]
async fn test_translate_withFailingTranslator_shouldNotRecord() {
    common::init_test_logging();
    let mut desk = common::create_test_desk(MockTranslator::failing());
    desk.set_draft("Hello");

    let result = desk.translate().await;

    assert!(matches!(result, Err(TranslationError::Provider(_))));
    assert_eq!(desk.store().translation_count(), 0);
    assert_eq!(desk.store().draft_input(), "Hello");
}

/// Switching models between translations labels each entry accordingly
#[tokio::test]
async fn test_translate_acrossModels_shouldKeepEachLabel() -> Result<()> {
    let mut desk = common::create_test_desk(MockTranslator::working());

    desk.set_draft("Hello");
    desk.translate().await?;
    desk.select_model("en-ur")?;
    desk.translate().await?;

    let labels: Vec<_> = desk.store().list_translations().map(|r| r.configuration().to_string()).collect();
    assert_eq!(labels, vec!["English to Urdu", "English to German"]);
    Ok(())
}

/// Clear empties both histories and the draft
#[tokio::test]
async fn test_clear_afterActivity_shouldResetSession() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "b.txt", "Hola")?;
    let mut desk = common::create_test_desk(MockTranslator::working());

    desk.upload_file(&path)?;
    desk.translate().await?;
    desk.clear();

    assert!(desk.store().is_empty());
    assert_eq!(desk.store().list_translations().count(), 0);
    assert_eq!(desk.store().list_file_uploads().count(), 0);
    Ok(())
}

/// Export writes both histories as JSON, newest first
#[tokio::test]
async fn test_exportHistory_shouldWriteJson() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut desk = common::create_test_desk(MockTranslator::working());
    desk.set_draft("one");
    desk.translate().await?;
    desk.set_draft("two");
    desk.translate().await?;

    let path = desk.export_history(temp_dir.path().join("out").join("history.json"))?;

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(json["translations"][0]["input"], "two");
    assert_eq!(json["translations"][1]["output"], "ONE");
    assert_eq!(json["file_uploads"].as_array().map(Vec::len), Some(0));
    Ok(())
}

/// Selecting by list position works from synchronous code
#[test]
fn test_selectModel_byPosition_thenTranslate_shouldUseThatPair() -> Result<()> {
    let translator = MockTranslator::working();
    let mut desk = common::create_test_desk(translator.clone());

    desk.select_model("11")?;
    desk.set_draft("Good morning");
    let outcome = tokio_test::block_on(desk.translate());

    tokio_test::assert_ok!(outcome);
    assert_eq!(translator.calls()[0].model_label, "English to Telugu");
    Ok(())
}
