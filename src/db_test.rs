use std::sync::Arc;
use std::thread;

use tempfile::TempDir;

use crate::batch::BatchBuilder;
use crate::db::{self, Database};
use crate::errors::Errors;
use crate::option::Options;

fn test_db() -> (TempDir, Database) {
  let _ = env_logger::builder().is_test(true).try_init();
  let dir = tempfile::tempdir().expect("Failed to create temp dir");
  let db = Database::open(dir.path(), Options::default()).expect("Failed to open database");
  (dir, db)
}

#[test]
fn base_scenario() {
  let (_dir, db) = test_db();

  db.put("key1", "value1").unwrap();
  db.put("key2", "value2").unwrap();

  assert_eq!(db.get("key1").unwrap().as_deref(), Some("value1"));
  assert_eq!(db.get("key2").unwrap().as_deref(), Some("value2"));

  db.delete("key1").unwrap();
  assert_eq!(db.get("key1").unwrap(), None);

  let entries: Vec<_> = db.scan().map(|e| e.unwrap().resolve().unwrap()).collect();
  assert_eq!(entries.len(), 1);
  assert_eq!(entries[0].key, "key2");
  assert_eq!(entries[0].value, "value2");
}

#[test]
fn delete_then_miss() {
  let (_dir, db) = test_db();

  db.put("k", "v").unwrap();
  db.delete("k").unwrap();
  assert_eq!(db.get("k").unwrap(), None);

  // Deleting an absent key is a no-op, not an error.
  db.delete("k").unwrap();
}

#[test]
fn empty_value_is_present() {
  let (_dir, db) = test_db();

  db.put("k", "").unwrap();
  assert_eq!(db.get("k").unwrap().as_deref(), Some(""));
  assert_eq!(db.get("missing").unwrap(), None);
}

#[test]
fn unicode_round_trips() {
  let (_dir, db) = test_db();

  let samples = [
    "👋🌍",          // emoji, astral plane
    "áéíóú",         // accented
    "äëïöü",         // dieresis
    "你好",          // chinese
    "こんにちは",    // japanese
    "Здравствуйте",  // cyrillic
    "Γειά σας",      // greek
    "e\u{301}",      // combining acute accent
  ];
  for s in samples {
    db.put(s, s).unwrap();
    assert_eq!(db.get(s).unwrap().as_deref(), Some(s), "round-trip failed for {s:?}");
  }
}

#[test]
fn sync_write_round_trips() {
  let (_dir, db) = test_db();

  let opts = crate::option::WriteOptions { sync: true };
  db.put_opt("k", "v", &opts).unwrap();
  assert_eq!(db.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn batch_put_then_delete() {
  let (_dir, db) = test_db();

  let mut builder = BatchBuilder::new();
  builder.put("key1", "value1").put("key2", "value2");
  db.write(builder.build()).unwrap();

  assert_eq!(db.get("key1").unwrap().as_deref(), Some("value1"));
  assert_eq!(db.get("key2").unwrap().as_deref(), Some("value2"));

  let mut builder = BatchBuilder::new();
  builder.delete("key1").delete("key2");
  db.write(builder.build()).unwrap();

  assert_eq!(db.get("key1").unwrap(), None);
  assert_eq!(db.get("key2").unwrap(), None);
}

#[test]
fn batch_later_operation_wins() {
  let (_dir, db) = test_db();

  let mut builder = BatchBuilder::new();
  builder.put("a", "1").delete("a");
  db.write(builder.build()).unwrap();
  assert_eq!(db.get("a").unwrap(), None);

  let mut builder = BatchBuilder::new();
  builder.put("b", "old").put("b", "new");
  db.write(builder.build()).unwrap();
  assert_eq!(db.get("b").unwrap().as_deref(), Some("new"));
}

#[test]
fn empty_batch_commits() {
  let (_dir, db) = test_db();
  db.write(BatchBuilder::new().build()).unwrap();
}

#[test]
fn scan_yields_ascending_key_order() {
  let (_dir, db) = test_db();

  for key in ["pear", "apple", "zebra", "mango", "fig"] {
    db.put(key, "x").unwrap();
  }

  let keys: Vec<_> = db
    .scan()
    .map(|e| e.unwrap().key().unwrap().to_owned())
    .collect();
  assert_eq!(keys, ["apple", "fig", "mango", "pear", "zebra"]);
}

#[test]
fn scan_matches_inserted_entries() {
  let (_dir, db) = test_db();

  for i in 0..100 {
    db.put(&format!("key{i}"), &format!("value{i}")).unwrap();
  }

  let entries: Vec<_> = db.scan().map(|e| e.unwrap().resolve().unwrap()).collect();
  assert_eq!(entries.len(), 100);

  for entry in entries {
    let key_number = entry.key.strip_prefix("key").unwrap();
    let value_number = entry.value.strip_prefix("value").unwrap();
    assert_eq!(key_number, value_number);
  }
}

#[test]
fn scan_from_prefix_partitions_keyspace() {
  let (_dir, db) = test_db();

  let a_size = 70;
  let b_size = 80;
  let c_size = 90;
  for i in 0..a_size {
    db.put(&format!("a:key{i}"), &format!("value{i}")).unwrap();
  }
  for i in 0..b_size {
    db.put(&format!("b:key{i}"), &format!("value{i}")).unwrap();
  }
  for i in 0..c_size {
    db.put(&format!("c:key{i}"), &format!("value{i}")).unwrap();
  }

  for (prefix, size) in [("a:", a_size), ("b:", b_size), ("c:", c_size)] {
    let entries: Vec<_> = db
      .scan_from(prefix)
      .map(|e| e.unwrap().resolve().unwrap())
      .take_while(|entry| entry.key.starts_with(prefix))
      .collect();
    assert_eq!(entries.len(), size, "wrong entry count for prefix {prefix}");
    for entry in entries {
      let key_number = entry.key.strip_prefix(prefix).unwrap().strip_prefix("key").unwrap();
      let value_number = entry.value.strip_prefix("value").unwrap();
      assert_eq!(key_number, value_number);
    }
  }

  // The full scan holds all entries, contiguously partitioned by prefix.
  let all: Vec<_> = db.scan().map(|e| e.unwrap().resolve().unwrap()).collect();
  assert_eq!(all.len(), a_size + b_size + c_size);
  for (index, entry) in all.iter().enumerate() {
    let expected = if index < a_size {
      "a:"
    } else if index < a_size + b_size {
      "b:"
    } else {
      "c:"
    };
    assert!(entry.key.starts_with(expected), "key {} out of place at {index}", entry.key);
  }
}

#[test]
fn scan_from_positions_at_first_key_not_less_than_from() {
  let (_dir, db) = test_db();

  db.put("b", "2").unwrap();
  db.put("d", "4").unwrap();

  let mut scan = db.scan_from("c");
  let entry = scan.next().unwrap().unwrap();
  assert_eq!(entry.key().unwrap(), "d");
  assert!(scan.next().is_none());
}

#[test]
fn scan_of_empty_database_is_exhausted_immediately() {
  let (_dir, db) = test_db();
  assert!(db.scan().next().is_none());
}

#[test]
fn lazy_entry_fails_after_scan_advances() {
  let (_dir, db) = test_db();

  db.put("a", "1").unwrap();
  db.put("b", "2").unwrap();

  let mut scan = db.scan();
  let first = scan.next().unwrap().unwrap();
  let second = scan.next().unwrap().unwrap();

  // `first` was never forced while current; its backing memory moved on.
  assert_eq!(first.key(), Err(Errors::EntryInvalidated));
  assert_eq!(second.key().unwrap(), "b");
}

#[test]
fn lazy_entry_fails_after_close() {
  let (_dir, db) = test_db();

  db.put("a", "1").unwrap();

  let mut scan = db.scan();
  let entry = scan.next().unwrap().unwrap();
  scan.close();

  assert_eq!(entry.key(), Err(Errors::EntryInvalidated));
  assert_eq!(entry.value(), Err(Errors::EntryInvalidated));
}

#[test]
fn forced_lazy_entry_survives_close() {
  let (_dir, db) = test_db();

  db.put("a", "1").unwrap();

  let mut scan = db.scan();
  let entry = scan.next().unwrap().unwrap();
  assert_eq!(entry.key().unwrap(), "a");
  scan.close();

  // Already-forced laziness is safe; the unforced field is not.
  assert_eq!(entry.key().unwrap(), "a");
  assert_eq!(entry.value(), Err(Errors::EntryInvalidated));
}

#[test]
fn dropping_scan_mid_iteration_releases_cleanly() {
  let (_dir, db) = test_db();

  for i in 0..50 {
    db.put(&format!("key{i:02}"), "v").unwrap();
  }

  let mut scan = db.scan();
  for _ in 0..10 {
    scan.next().unwrap().unwrap().resolve().unwrap();
  }
  drop(scan);

  // The database is still fully usable afterwards.
  assert_eq!(db.get("key00").unwrap().as_deref(), Some("v"));
}

#[test]
fn snapshot_reads_are_isolated_from_later_writes() {
  let (_dir, db) = test_db();

  db.put("key1", "value1").unwrap();

  let snapshot = db.create_snapshot();
  db.put("key1", "value2").unwrap();
  db.put("key2", "value2").unwrap();

  assert_eq!(snapshot.get("key1").unwrap().as_deref(), Some("value1"));
  assert_eq!(snapshot.get("key2").unwrap(), None);
  drop(snapshot);

  assert_eq!(db.get("key1").unwrap().as_deref(), Some("value2"));
}

#[test]
fn snapshot_scan_sees_point_in_time_state() {
  let (_dir, db) = test_db();

  db.put("a", "1").unwrap();
  db.put("b", "2").unwrap();

  db.with_snapshot(|snapshot| {
    db.put("c", "3").unwrap();
    db.delete("a").unwrap();

    let keys: Vec<_> = snapshot
      .scan()
      .map(|e| e.unwrap().key().unwrap().to_owned())
      .collect();
    assert_eq!(keys, ["a", "b"]);
    assert_eq!(snapshot.get("a").unwrap().as_deref(), Some("1"));
  });

  assert_eq!(db.get("a").unwrap(), None);
  assert_eq!(db.get("c").unwrap().as_deref(), Some("3"));
}

#[test]
fn with_snapshot_returns_action_result() {
  let (_dir, db) = test_db();

  db.put("k", "v").unwrap();
  let value = db.with_snapshot(|snapshot| snapshot.get("k").unwrap());
  assert_eq!(value.as_deref(), Some("v"));
}

#[test]
fn snapshot_has_creation_timestamp() {
  let (_dir, db) = test_db();

  let before = time::OffsetDateTime::now_utc();
  let snapshot = db.create_snapshot();
  let after = time::OffsetDateTime::now_utc();

  assert!(snapshot.created_at() >= before);
  assert!(snapshot.created_at() <= after);
}

#[test]
fn concurrent_writers_share_one_handle() {
  let (_dir, db) = test_db();
  let db = Arc::new(db);

  let handles: Vec<_> = (0..4)
    .map(|worker| {
      let db = Arc::clone(&db);
      thread::spawn(move || {
        for i in 0..50 {
          db.put(&format!("w{worker}:key{i:02}"), &format!("value{i}")).unwrap();
        }
      })
    })
    .collect();
  for handle in handles {
    handle.join().unwrap();
  }

  let count = db.scan().count();
  assert_eq!(count, 200);
}

#[test]
fn open_missing_database_without_create_fails() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("absent");

  let opts = Options {
    create_if_missing: false,
    ..Options::default()
  };
  match Database::open(&path, opts) {
    Err(Errors::OpenFailed(_)) => {}
    other => panic!("expected OpenFailed, got {other:?}"),
  }
}

#[test]
fn open_existing_database_with_error_if_exists_fails() {
  let (dir, db) = test_db();
  db.close();

  let opts = Options {
    error_if_exists: true,
    ..Options::default()
  };
  match Database::open(dir.path(), opts) {
    Err(Errors::OpenFailed(_)) => {}
    other => panic!("expected OpenFailed, got {other:?}"),
  }
}

#[test]
fn second_open_of_locked_database_fails() {
  let (dir, _db) = test_db();

  match Database::open(dir.path(), Options::default()) {
    Err(Errors::OpenFailed(message)) => {
      assert!(!message.is_empty());
    }
    other => panic!("expected OpenFailed, got {other:?}"),
  }
}

#[test]
fn destroy_then_reopen_is_empty() {
  let (dir, db) = test_db();
  db.put("k", "v").unwrap();
  db.close();

  db::destroy(dir.path(), &Options::default()).unwrap();

  let db = Database::open(dir.path(), Options::default()).unwrap();
  assert_eq!(db.get("k").unwrap(), None);
}

#[test]
fn repair_preserves_data() {
  let (dir, db) = test_db();
  db.put("k", "v").unwrap();
  db.close();

  db::repair(dir.path(), &Options::default()).unwrap();

  let db = Database::open(dir.path(), Options::default()).unwrap();
  assert_eq!(db.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn compact_range_keeps_data_readable() {
  let (_dir, db) = test_db();

  for i in 0..200 {
    db.put(&format!("key{i:03}"), &format!("value{i}")).unwrap();
  }
  db.compact_range("", "");
  db.compact_range("key050", "key150");

  assert_eq!(db.get("key000").unwrap().as_deref(), Some("value0"));
  assert_eq!(db.get("key199").unwrap().as_deref(), Some("value199"));
  assert_eq!(db.scan().count(), 200);
}

#[test]
fn reopen_preserves_data() {
  let (dir, db) = test_db();
  db.put("k", "v").unwrap();
  db.close();

  let db = Database::open(dir.path(), Options::default()).unwrap();
  assert_eq!(db.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn path_with_interior_nul_is_rejected() {
  match Database::open("bad\0path", Options::default()) {
    Err(Errors::InvalidPath(_)) => {}
    other => panic!("expected InvalidPath, got {other:?}"),
  }
}

#[test]
fn engine_reports_version() {
  let (major, minor) = db::version();
  assert!(major >= 1);
  assert!(minor >= 0);
}
