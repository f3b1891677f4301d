//! Preference round-trips through a file-backed store.

use catalog::preferences::{BANNED_WORDS_KEY, LEVENSHTEIN_THRESHOLD_KEY};
use catalog::{
    BannedChannel, FileStore, FilterPreferences, KeyValueStore, PreferenceProvider, StorePreferences,
};
use std::sync::Arc;

fn file_store(dir: &tempfile::TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::open(dir.path().join("nested").join("store.json")))
}

#[test]
fn test_writers_persist_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let prefs = StorePreferences::new(file_store(&dir));
        assert!(prefs.add_banned_word("spoiler").unwrap());
        assert!(prefs.add_banned_word("John Doe").unwrap());
        assert!(!prefs.add_banned_word("  SPOILER ").unwrap());
        assert!(prefs
            .add_banned_channel(BannedChannel {
                id: "UC1".to_string(),
                name: "Loud".to_string(),
            })
            .unwrap());
        prefs.set_levenshtein_threshold(2).unwrap();
        prefs.set_short_form(true, Some(90)).unwrap();
    }

    let loaded = StorePreferences::new(file_store(&dir)).load_preferences().unwrap();
    assert_eq!(
        loaded,
        FilterPreferences {
            banned_words: vec!["spoiler".to_string(), "John Doe".to_string()],
            banned_channels: vec![BannedChannel {
                id: "UC1".to_string(),
                name: "Loud".to_string(),
            }],
            levenshtein_threshold: 2,
            ban_short_form: true,
            short_form_threshold: 90,
        }
    );
}

#[test]
fn test_removals() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = StorePreferences::new(file_store(&dir));
    prefs.add_banned_word("spoiler").unwrap();
    prefs
        .add_banned_channel(BannedChannel {
            id: "UC1".to_string(),
            name: String::new(),
        })
        .unwrap();

    assert!(prefs.remove_banned_word("Spoiler").unwrap());
    assert!(!prefs.remove_banned_word("spoiler").unwrap());
    assert!(prefs.remove_banned_channel("UC1").unwrap());
    assert!(!prefs.remove_banned_channel("UC1").unwrap());

    assert_eq!(prefs.load_preferences().unwrap(), FilterPreferences::default());
}

#[test]
fn test_hand_edited_store_degrades_per_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);
    store.set(BANNED_WORDS_KEY, r#"["spoiler"]"#).unwrap();
    store.set(LEVENSHTEIN_THRESHOLD_KEY, "two").unwrap();

    let loaded = StorePreferences::new(store).load_preferences().unwrap();
    assert_eq!(loaded.banned_words, vec!["spoiler"]);
    assert_eq!(loaded.levenshtein_threshold, 1);
}

#[test]
fn test_concurrent_bans_are_all_kept() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = StorePreferences::new(file_store(&dir));
    let barrier = std::sync::Barrier::new(16);

    let added: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let prefs = &prefs;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    if i % 2 == 0 {
                        prefs.add_banned_word(&format!("word{}", i)).unwrap()
                    } else {
                        prefs
                            .add_banned_channel(BannedChannel {
                                id: format!("UC{}", i),
                                name: String::new(),
                            })
                            .unwrap()
                    }
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(added.iter().all(|&a| a));

    let loaded = prefs.load_preferences().unwrap();
    assert_eq!(loaded.banned_words.len(), 8);
    assert_eq!(loaded.banned_channels.len(), 8);
}

#[test]
fn test_concurrent_duplicate_ban_added_once() {
    let store: Arc<dyn KeyValueStore> = Arc::new(catalog::MemoryStore::new());
    let prefs = StorePreferences::new(store);
    let shared = &prefs;

    let added = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(move || shared.add_banned_word("spoiler").unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&added| added)
            .count()
    });
    assert_eq!(added, 1);
    assert_eq!(prefs.load_preferences().unwrap().banned_words, vec!["spoiler"]);
}
