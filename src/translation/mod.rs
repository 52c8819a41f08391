/*!
 * Translation through the configured inference backend.
 *
 * - `Translator`: the seam the desk calls; one text in, one text out
 * - `core`: `TranslationService`, the provider-backed implementation
 */

use async_trait::async_trait;

use crate::errors::TranslationError;
use crate::model_registry::ModelEntry;

// Re-export main types for easier usage
pub use self::core::TranslationService;

pub mod core;

/// Something that turns text into its translation for a given model pair
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` with the given model pair, producing at most
    /// `max_length` units of output as understood by the backend
    async fn translate(
        &self,
        model: &ModelEntry,
        text: &str,
        max_length: usize,
    ) -> Result<String, TranslationError>;

    /// Short description of the backend for status lines
    fn describe(&self) -> String;
}
