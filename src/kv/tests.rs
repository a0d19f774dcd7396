//! Tests for the KV store module.

use super::*;
use proptest::prelude::*;
use std::collections::BTreeMap;
use tempfile::TempDir;

fn open_temp() -> (TempDir, KvStore) {
    let tmp = TempDir::new().unwrap();
    let store = KvStore::open(tmp.path().join("kv.db")).unwrap();
    (tmp, store)
}

#[test]
fn test_set_and_get() {
    let (_tmp, store) = open_temp();

    store.set("key1", "value1").unwrap();
    assert_eq!(store.get("key1").unwrap().as_deref(), Some("value1"));
}

#[test]
fn test_get_nonexistent_key() {
    let (_tmp, store) = open_temp();
    assert!(store.get("nonexistent").unwrap().is_none());
}

#[test]
fn test_overwrite_value() {
    let (_tmp, store) = open_temp();

    store.set("key1", "value1").unwrap();
    store.set("key1", "value2").unwrap();

    assert_eq!(store.get("key1").unwrap().as_deref(), Some("value2"));
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_delete() {
    let (_tmp, store) = open_temp();

    store.set("key1", "value1").unwrap();
    assert!(store.delete("key1").unwrap());
    assert!(store.get("key1").unwrap().is_none());
}

#[test]
fn test_delete_nonexistent_is_noop() {
    let (_tmp, store) = open_temp();
    store.set("other", "x").unwrap();

    assert!(!store.delete("nonexistent").unwrap());
    assert!(!store.delete("nonexistent").unwrap());
    assert_eq!(store.keys().unwrap(), vec!["other".to_string()]);
}

#[test]
fn test_exists() {
    let (_tmp, store) = open_temp();

    assert!(!store.exists("key1").unwrap());
    store.set("key1", "value1").unwrap();
    assert!(store.exists("key1").unwrap());
    store.delete("key1").unwrap();
    assert!(!store.exists("key1").unwrap());
}

#[test]
fn test_keys_and_all() {
    let (_tmp, store) = open_temp();

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();

    let mut keys = store.keys().unwrap();
    keys.sort();
    assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

    let mut all = store.all().unwrap();
    all.sort_by(|x, y| x.key.cmp(&y.key));
    assert_eq!(
        all,
        vec![
            KvEntry {
                key: "a".into(),
                value: "1".into()
            },
            KvEntry {
                key: "b".into(),
                value: "2".into()
            },
        ]
    );
}

#[test]
fn test_empty_value() {
    let (_tmp, store) = open_temp();
    store.set("empty", "").unwrap();
    assert_eq!(store.get("empty").unwrap().as_deref(), Some(""));
}

#[test]
fn test_rename() {
    let (_tmp, store) = open_temp();

    store.set("old", "value").unwrap();
    assert!(store.rename("old", "new").unwrap());

    assert!(store.get("old").unwrap().is_none());
    assert_eq!(store.get("new").unwrap().as_deref(), Some("value"));
}

#[test]
fn test_rename_missing_source() {
    let (_tmp, store) = open_temp();
    assert!(!store.rename("ghost", "new").unwrap());
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn test_rename_onto_existing_key_fails() {
    let (_tmp, store) = open_temp();

    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();

    let err = store.rename("a", "b").unwrap_err();
    assert!(err.is_constraint(), "{err}");
    assert!(err.to_string().contains("UNIQUE constraint failed"), "{err}");

    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    assert_eq!(store.len().unwrap(), 2);
}

#[test]
fn test_rename_inside_transaction() {
    let (_tmp, store) = open_temp();
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();

    let err = store
        .adapter()
        .transaction(|_| store.rename("a", "b"))
        .unwrap_err();
    assert!(err.is_constraint(), "{err}");
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));

    store
        .adapter()
        .transaction(|_| {
            store.set("c", "3")?;
            store.rename("a", "z")
        })
        .unwrap();
    assert!(store.get("a").unwrap().is_none());
    assert_eq!(store.get("z").unwrap().as_deref(), Some("1"));
    assert_eq!(store.get("c").unwrap().as_deref(), Some("3"));
}

#[test]
fn test_reopen_keeps_data() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("kv.db");

    let store = KvStore::open(&path).unwrap();
    store.set("persist", "yes").unwrap();
    store.close().unwrap();

    let store = KvStore::open(&path).unwrap();
    assert_eq!(store.get("persist").unwrap().as_deref(), Some("yes"));
}

#[test]
fn test_open_creates_parent_directories() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("deeper").join("kv.db");

    let store = KvStore::open(&path).unwrap();
    store.set("k", "v").unwrap();
    assert!(path.exists());
}

#[test]
fn test_open_over_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let err = KvStore::open(tmp.path()).err().unwrap();
    assert!(matches!(err, KvError::Sql(crate::sql::SqlError::Open { .. })), "{err}");
}

#[test]
fn test_export_import_roundtrip() {
    let (tmp, store) = open_temp();
    store.set("alpha", "first\nline").unwrap();
    store.set("beta", "").unwrap();
    store.set("gamma", "3").unwrap();

    let out = tmp.path().join("export");
    assert_eq!(export_dir(&store, &out).unwrap(), 3);
    assert_eq!(std::fs::read_to_string(out.join("alpha")).unwrap(), "first\nline");

    let fresh = KvStore::memory().unwrap();
    assert_eq!(import_dir(&fresh, &out).unwrap(), 3);

    let snapshot = |s: &KvStore| -> BTreeMap<String, String> {
        s.all().unwrap().into_iter().map(|e| (e.key, e.value)).collect()
    };
    assert_eq!(snapshot(&store), snapshot(&fresh));
}

#[test]
fn test_import_skips_directories() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    std::fs::create_dir_all(src.join("nested")).unwrap();
    std::fs::write(src.join("key"), "value").unwrap();

    let store = KvStore::memory().unwrap();
    assert_eq!(import_dir(&store, &src).unwrap(), 1);
    assert_eq!(store.keys().unwrap(), vec!["key".to_string()]);
}

#[test]
fn test_import_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let store = KvStore::memory().unwrap();
    let err = import_dir(&store, &tmp.path().join("missing")).unwrap_err();
    assert!(matches!(err, KvError::Io { .. }));
}

#[test]
fn test_export_rejects_path_keys() {
    let (tmp, store) = open_temp();
    store.set("../escape", "x").unwrap();

    let out = tmp.path().join("export");
    let err = export_dir(&store, &out).unwrap_err();
    assert!(matches!(err, KvError::UnsafeKey(ref k) if k == "../escape"));
    assert!(!tmp.path().join("escape").exists());
}

proptest! {
    #[test]
    fn prop_upsert_keeps_last_value(key in "[a-z]{1,8}", v1 in ".*", v2 in ".*") {
        let store = KvStore::memory().unwrap();
        store.set(&key, &v1).unwrap();
        store.set(&key, &v2).unwrap();

        prop_assert_eq!(store.get(&key).unwrap(), Some(v2));
        prop_assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn prop_keys_match_gets(entries in prop::collection::btree_map("[a-z0-9]{1,6}", ".*", 0..16)) {
        let store = KvStore::memory().unwrap();
        for (k, v) in &entries {
            store.set(k, v).unwrap();
        }

        let mut keys = store.keys().unwrap();
        keys.sort();
        let expected: Vec<String> = entries.keys().cloned().collect();
        prop_assert_eq!(&keys, &expected);

        for key in &keys {
            let got = store.get(key).unwrap();
            prop_assert_eq!(got.as_ref(), entries.get(key));
        }
    }

    #[test]
    fn prop_delete_then_get_is_absent(key in "[a-z]{1,8}", value in ".*") {
        let store = KvStore::memory().unwrap();
        store.set(&key, &value).unwrap();
        prop_assert_eq!(store.get(&key).unwrap(), Some(value));

        store.delete(&key).unwrap();
        prop_assert!(store.get(&key).unwrap().is_none());
    }
}
