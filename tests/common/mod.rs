/*!
 * Common test utilities for the mtdesk test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use mtdesk::{Desk, ModelRegistry};

// Re-export the test translator
pub mod mock_translator;

pub use mock_translator::MockTranslator;

/// Routes library logging to the test output; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a desk over a mock translator with the default model selected
pub fn create_test_desk(translator: MockTranslator) -> Desk {
    Desk::new(Arc::new(translator), ModelRegistry::builtin().default_entry(), 500)
}
