use std::path::PathBuf;

use tango_config::Config;
use tango_core::store::{FileStore, KeyValueStore, MemoryStore};

use crate::logging::bootstrap_dispatch;
use crate::{LAST_WORD_LIST_KEY, load_profile, remember_word_list, resolve_word_list};

#[test]
fn test_cli_path_wins() {
    let mut config = Config::default();
    config.word_list = Some("profile.csv".into());

    let path = resolve_word_list(Some("cli.csv".into()), &config, &MemoryStore::new()).unwrap();
    assert_eq!(path, PathBuf::from("cli.csv"));

    let path = resolve_word_list(None, &config, &MemoryStore::new()).unwrap();
    assert_eq!(path, PathBuf::from("profile.csv"));
}

#[test]
fn test_last_word_list_is_remembered() {
    let dir = tempfile::tempdir().unwrap();
    let words = dir.path().join("words.csv");
    let mut store = FileStore::new(dir.path().join("data"));

    remember_word_list(&mut store, &words).unwrap();
    assert!(store.get(LAST_WORD_LIST_KEY).unwrap().is_some());

    let reopened = FileStore::new(dir.path().join("data"));
    let path = resolve_word_list(None, &Config::default(), &reopened).unwrap();
    assert_eq!(path, words);
}

#[test]
fn test_no_word_list_anywhere() {
    let err = resolve_word_list(None, &Config::default(), &MemoryStore::new()).unwrap_err();
    assert!(err.to_string().contains("--words"));
}

#[test]
fn test_bootstrap_subscriber_takes_profile_messages() {
    let dispatch = bootstrap_dispatch();

    let warn_enabled =
        tracing::dispatcher::with_default(&dispatch, || tracing::enabled!(tracing::Level::WARN));
    assert!(warn_enabled);
}

#[test]
fn test_missing_profile_creates_main() {
    let dir = tempfile::tempdir().unwrap();
    let profiles = dir.path().join("profiles");

    let config = load_profile(&profiles, "work").unwrap();
    assert!(profiles.join("main.json").exists());
    assert_eq!(config, load_profile(&profiles, "main").unwrap());
}
