/*!
 * Session state for one interactive translation session.
 *
 * This module provides:
 * - The translation and file-upload history records
 * - The session store owning both histories and the draft input
 * - Change notifications for consumers that re-render on mutation
 */

pub mod models;
pub mod store;

// Re-export main types
pub use models::{FileUploadRecord, TranslationRecord};
pub use store::SessionStore;
