/*!
 * Integration tests driving the console with scripted input
 */

use anyhow::Result;

use mtdesk::console::Console;
use crate::common::{self, MockTranslator};

/// Run a scripted session and return what the console printed
async fn run_script(translator: MockTranslator, script: &str) -> Result<(String, usize)> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let desk = common::create_test_desk(translator);
    let mut console = Console::new(desk, Vec::new(), false, temp_dir.path().to_path_buf());

    console.run(script.as_bytes()).await?;

    let translations = console.desk().store().translation_count();
    let output = String::from_utf8(console.into_output())?;
    Ok((output, translations))
}

/// Text, translate and history produce the translated line and an entry
#[tokio::test]
async fn test_session_typeAndTranslate_shouldShowResult() -> Result<()> {
    let (output, translations) = run_script(MockTranslator::working(), "Hello\n:t\n:history\n:q\n").await?;

    assert!(output.contains("Translated Text: HELLO"));
    assert!(output.contains("Translation 1:"));
    assert!(output.contains("Configuration: English to German"));
    assert_eq!(translations, 1);
    Ok(())
}

/// Translating with an empty draft prints the warning
#[tokio::test]
async fn test_session_translateEmpty_shouldWarn() -> Result<()> {
    let (output, translations) = run_script(MockTranslator::working(), ":translate\n").await?;

    assert!(output.contains("Please enter text for translation."));
    assert_eq!(translations, 0);
    Ok(())
}

/// Lines ending in a backslash join into one multi-line draft
#[tokio::test]
async fn test_session_continuationLines_shouldBuildOneDraft() -> Result<()> {
    let translator = MockTranslator::working();
    let (output, _) = run_script(translator.clone(), "first line\\\nsecond line\n:t\n").await?;

    assert_eq!(translator.calls()[0].text, "first line\nsecond line");
    assert!(output.contains("Translated Text: FIRST LINE\nSECOND LINE"));
    Ok(())
}

/// Nothing after :quit is executed
#[tokio::test]
async fn test_session_quit_shouldStopReading() -> Result<()> {
    let (_, translations) = run_script(MockTranslator::working(), "Hello\n:quit\n:t\n").await?;

    assert_eq!(translations, 0);
    Ok(())
}

/// Unknown models and upload errors are reported without ending the session
#[tokio::test]
async fn test_session_badInput_shouldReportAndContinue() -> Result<()> {
    let script = ":model Elvish\n:upload /no/such/file.txt\nHola\n:model es-en\n:t\n";
    let (output, translations) = run_script(MockTranslator::working(), script).await?;

    assert!(output.contains("Warning: Unknown translation model: Elvish"));
    assert!(output.contains("Error:"));
    assert!(output.contains("Selected: Spanish to English"));
    assert_eq!(translations, 1);
    Ok(())
}

/// A failing translator prints an error and records nothing
#[tokio::test]
async fn test_session_failingTranslator_shouldPrintError() -> Result<()> {
    let (output, translations) = run_script(MockTranslator::failing(), "Hello\n:t\n:history\n").await?;

    assert!(output.contains("Error: Provider error"));
    assert!(output.contains("No translations yet."));
    assert_eq!(translations, 0);
    Ok(())
}

/// A doubled colon stages text beginning with ':' and translates it
#[tokio::test]
async fn test_session_doubledColon_shouldTranslateColonText() -> Result<()> {
    let translator = MockTranslator::working();
    let (output, translations) = run_script(translator.clone(), "::) glad to meet you\n:t\n").await?;

    assert_eq!(translator.calls()[0].text, ":) glad to meet you");
    assert!(output.contains("Translated Text: :) GLAD TO MEET YOU"));
    assert_eq!(translations, 1);
    Ok(())
}
