use std::fs;
use tempfile::TempDir;
use tempshop::storage::{FilesystemStore, KeyValueStore, TokenKeys, TokenStore};
use std::sync::Arc;

#[test]
fn test_set_and_get() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemStore::new(temp_dir.path().join("tempshop"));

    store.set("access_token", "abc").unwrap();

    assert_eq!(store.get("access_token").unwrap().as_deref(), Some("abc"));
}

#[test]
fn test_get_missing_key() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemStore::new(temp_dir.path());

    assert_eq!(store.get("nothing").unwrap(), None);
}

#[test]
fn test_keys_on_missing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemStore::new(temp_dir.path().join("not-created-yet"));

    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_remove_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemStore::new(temp_dir.path());

    store.set("k", "v").unwrap();
    store.remove("k").unwrap();
    store.remove("k").unwrap();

    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn test_keys_are_unescaped() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemStore::new(temp_dir.path());

    store.set("tempshop_product_1", "{}").unwrap();
    store.set("odd key/with.dots", "{}").unwrap();

    assert_eq!(
        store.keys().unwrap(),
        vec!["odd key/with.dots".to_string(), "tempshop_product_1".to_string()]
    );
}

#[test]
fn test_foreign_files_are_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let store = FilesystemStore::new(temp_dir.path());
    fs::write(temp_dir.path().join("README.txt"), "not an entry").unwrap();

    store.set("notifications", "[]").unwrap();

    assert_eq!(store.keys().unwrap(), vec!["notifications".to_string()]);
}

#[test]
fn test_token_pair_persists_across_instances() {
    let temp_dir = TempDir::new().unwrap();

    let first = TokenStore::new(
        Arc::new(FilesystemStore::new(temp_dir.path())),
        TokenKeys::shopkeeper(),
    );
    first.save_pair("a", Some("r")).unwrap();

    let second = TokenStore::new(
        Arc::new(FilesystemStore::new(temp_dir.path())),
        TokenKeys::shopkeeper(),
    );
    assert_eq!(second.access().unwrap().as_deref(), Some("a"));
    assert_eq!(second.refresh().unwrap().as_deref(), Some("r"));

    second.clear().unwrap();
    assert!(!first.has_credentials().unwrap());
}
