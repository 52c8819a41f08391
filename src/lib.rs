/*!
 * # mtdesk - Machine translation desk
 *
 * A Rust library for an interactive machine translation session over
 * pretrained source-target model pairs.
 *
 * ## Features
 *
 * - Fixed registry of Helsinki-NLP opus-mt model pairs
 * - Translate typed text or uploaded `.txt` files
 * - Per-session translation and file upload history, newest first
 * - Translation backends:
 *   - Hugging Face inference API (runs the registry models)
 *   - Ollama (local LLM)
 *   - Anthropic API
 * - JSON export of a session's history
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `session`: Session history store and its records
 * - `model_registry`: The model pairs a session can select
 * - `translation`: The `Translator` seam and the provider-backed service
 * - `providers`: Client implementations for the inference backends:
 *   - `providers::huggingface`: Hugging Face inference client
 *   - `providers::ollama`: Ollama API client
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::mock`: In-process test double
 * - `app_controller`: The `Desk` handling user actions for one session
 * - `console`: Command parsing, rendering and the interactive loop
 * - `app_config`: Configuration management
 * - `file_utils`: Upload reading and export writing
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod console;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod model_registry;
pub mod providers;
pub mod session;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Desk, TranslateOutcome};
pub use errors::{AppError, ProviderError, TranslationError, UploadError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use model_registry::{ModelEntry, ModelRegistry};
pub use session::{FileUploadRecord, SessionStore, TranslationRecord};
pub use translation::{TranslationService, Translator};
