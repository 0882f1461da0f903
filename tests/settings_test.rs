//! Settings persistence tests
//!
//! Each test works on its own settings file in a temporary directory.

use readaloud::{HighlightMode, Settings, SettingsStore};
use serde_json::{json, Value};
use std::fs;

fn store() -> (tempfile::TempDir, SettingsStore) {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = SettingsStore::new(dir.path().join("tts_settings.json"));
    (dir, store)
}

const KEYS: [&str; 8] = [
    "font_family",
    "font_size",
    "word_spacing",
    "letter_spacing",
    "bg_color",
    "fg_color",
    "highlight_color",
    "highlight_mode",
];

#[test]
fn test_missing_file_gives_defaults() {
    let (_dir, store) = store();
    assert_eq!(store.load(), Settings::default());
}

#[test]
fn test_partial_file_merges_with_defaults() {
    let (_dir, store) = store();

    // Drop each key in turn; every other key must come back as default
    for missing in KEYS {
        let mut full = serde_json::to_value(Settings::default()).unwrap();
        let map = full.as_object_mut().unwrap();
        map.remove(missing);
        if missing != "font_size" {
            map.insert("font_size".to_string(), json!(22));
        }
        fs::write(store.path(), full.to_string()).unwrap();

        let loaded = store.load();
        for key in KEYS {
            assert!(loaded.get(key).is_some(), "{} missing after load", key);
        }
        if missing != "font_size" {
            assert_eq!(loaded.font_size, 22);
        }
        assert_eq!(
            loaded.get(missing),
            Settings::default().get(missing),
            "{} should fall back to its default",
            missing
        );
    }
}

#[test]
fn test_empty_object_gives_defaults() {
    let (_dir, store) = store();
    fs::write(store.path(), "{}").unwrap();
    assert_eq!(store.load(), Settings::default());
}

#[test]
fn test_malformed_file_gives_defaults() {
    let (_dir, store) = store();

    fs::write(store.path(), "{ not json").unwrap();
    assert_eq!(store.load(), Settings::default());

    fs::write(store.path(), "[1, 2, 3]").unwrap();
    assert_eq!(store.load(), Settings::default());
}

#[test]
fn test_save_and_load() {
    let (_dir, store) = store();

    let mut settings = Settings::default();
    settings.font_family = "Georgia".to_string();
    settings.highlight_mode = HighlightMode::Line;
    store.save(&settings).unwrap();

    let loaded = store.load();
    assert_eq!(loaded, settings);

    let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["highlight_mode"], json!("line"));
}

#[test]
fn test_unknown_keys_survive_round_trip() {
    let (_dir, store) = store();
    fs::write(store.path(), r#"{"window": {"width": 800}, "font_size": 16}"#).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.font_size, 16);
    store.save(&loaded).unwrap();

    let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw["window"], json!({"width": 800}));
    assert_eq!(raw["font_family"], json!("Arial"));
}

#[test]
fn test_reset_persists_defaults() {
    let (_dir, store) = store();
    store.update("font_size", json!(30)).unwrap();
    store.update("theme", json!("dark")).unwrap();

    let reset = store.reset();
    assert_eq!(reset, Settings::default());
    assert_eq!(store.load(), Settings::default());
    assert_eq!(store.get("theme"), None);
}

#[test]
fn test_update_and_get() {
    let (_dir, store) = store();

    let updated = store.update("bg_color", json!("#000000")).unwrap();
    assert_eq!(updated.bg_color, "#000000");
    assert_eq!(store.get("bg_color"), Some(json!("#000000")));
    assert_eq!(store.get("font_family"), Some(json!("Arial")));

    // Wrong type for a known key is rejected and nothing is written
    assert!(store.update("font_size", json!("large")).is_err());
    assert_eq!(store.get("font_size"), Some(json!(14)));
}

#[test]
fn test_save_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::new(dir.path().join("nested").join("tts_settings.json"));

    store.save(&Settings::default()).unwrap();
    assert!(store.path().exists());
}
