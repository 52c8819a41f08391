/*!
 * Mock translator for desk and console tests
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use mtdesk::errors::{ProviderError, TranslationError};
use mtdesk::model_registry::ModelEntry;
use mtdesk::translation::Translator;

/// A call received by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatorCall {
    pub model_label: String,
    pub text: String,
    pub max_length: usize,
}

/// Translator returning canned answers and recording every call
#[derive(Debug, Clone)]
pub struct MockTranslator {
    // @field: Answer to give, or None to fail
    answer: Option<fn(&ModelEntry, &str) -> String>,
    // @field: Calls seen so far, shared across clones
    calls: Arc<Mutex<Vec<TranslatorCall>>>,
}

impl MockTranslator {
    /// Answers with the text upper-cased
    pub fn working() -> Self {
        Self::with_answer(|_, text| text.to_uppercase())
    }

    /// Answers using the given function
    pub fn with_answer(answer: fn(&ModelEntry, &str) -> String) -> Self {
        Self {
            answer: Some(answer),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails every call with a connection error
    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<TranslatorCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        model: &ModelEntry,
        text: &str,
        max_length: usize,
    ) -> Result<String, TranslationError> {
        self.calls.lock().push(TranslatorCall {
            model_label: model.label.to_string(),
            text: text.to_string(),
            max_length,
        });

        match self.answer {
            Some(answer) => Ok(answer(model, text)),
            None => Err(TranslationError::Provider(ProviderError::ConnectionError(
                "model service unreachable".to_string(),
            ))),
        }
    }

    fn describe(&self) -> String {
        "Mock translator".to_string()
    }
}
