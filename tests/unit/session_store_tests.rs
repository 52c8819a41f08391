/*!
 * Tests for the session history store
 */

use mtdesk::session::SessionStore;

/// A new session starts with nothing recorded
#[test]
fn test_new_shouldStartEmpty() {
    let store = SessionStore::new();

    assert!(store.is_empty());
    assert_eq!(store.list_translations().count(), 0);
    assert_eq!(store.list_file_uploads().count(), 0);
    assert_eq!(store.draft_input(), "");
}

/// Listing returns the most recent translation first
#[test]
fn test_listTranslations_afterTwoAppends_shouldBeNewestFirst() {
    let mut store = SessionStore::new();
    store.append_translation("Hello", "Hallo", "English to German");
    store.append_translation("Bonjour", "Hello", "French to English");

    let listed: Vec<_> = store
        .list_translations()
        .map(|r| (r.input().to_string(), r.configuration().to_string()))
        .collect();

    assert_eq!(
        listed,
        vec![
            ("Bonjour".to_string(), "French to English".to_string()),
            ("Hello".to_string(), "English to German".to_string()),
        ]
    );
}

/// Reversing the listing yields insertion order
#[test]
fn test_listTranslations_reversed_shouldBeInsertionOrder() {
    let mut store = SessionStore::new();
    for input in ["one", "two", "three"] {
        store.append_translation(input, input, "English to German");
    }

    let inputs: Vec<_> = store.list_translations().rev().map(|r| r.input()).collect();
    assert_eq!(inputs, vec!["one", "two", "three"]);
}

/// Uploading a file replaces any typed draft
#[test]
fn test_appendFileUpload_shouldReplaceDraft() {
    let mut store = SessionStore::new();
    store.set_draft_input("typed by hand");

    store.append_file_upload("a.txt", "Guten Tag");

    assert_eq!(store.draft_input(), "Guten Tag");
    let upload = store.list_file_uploads().next().unwrap();
    assert_eq!(upload.file_name(), "a.txt");
    assert_eq!(upload.content(), "Guten Tag");
}

/// The store itself does not reject empty input
#[test]
fn test_appendTranslation_withEmptyInput_shouldStillAppend() {
    let mut store = SessionStore::new();

    store.append_translation("", "", "English to German");

    assert_eq!(store.translation_count(), 1);
}

/// Clearing resets histories and draft together
#[test]
fn test_clearAll_shouldResetEverything() {
    let mut store = SessionStore::new();
    store.append_file_upload("a.txt", "Hola");
    store.append_translation("Hola", "Hello", "Spanish to English");

    store.clear_all();

    assert!(store.is_empty());
    assert_eq!(store.list_translations().len(), 0);
    assert_eq!(store.list_file_uploads().len(), 0);
}

/// Subscribers see the latest revision after mutations
#[tokio::test]
async fn test_subscribe_shouldObserveMutations() {
    let mut store = SessionStore::new();
    let mut changes = store.subscribe();

    store.set_draft_input("Hello");
    store.append_translation("Hello", "Hallo", "English to German");

    assert!(changes.has_changed().unwrap());
    assert_eq!(*changes.borrow_and_update(), store.revision());
    assert_eq!(store.revision(), 2);
}

/// Records get distinct identifiers
#[test]
fn test_records_shouldHaveDistinctIds() {
    let mut store = SessionStore::new();
    let first = store.append_translation("a", "b", "English to German").id();
    let second = store.append_translation("a", "b", "English to German").id();

    assert_ne!(first, second);
}
