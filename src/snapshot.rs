//! Point-in-time, read-only views of a database.

use time::OffsetDateTime;

use crate::db::Database;
use crate::errors::Result;
use crate::ffi;
use crate::iterator::Scan;
use crate::option::ReadOptions;

/// A consistent view of the database at the moment it was taken. Reads
/// through a snapshot are unaffected by later mutation.
///
/// Borrows its [`Database`], so the compiler enforces the release order the
/// engine requires: snapshot before database. Dropping releases the native
/// snapshot handle exactly once.
pub struct Snapshot<'db> {
  db: &'db Database,
  handle: *const ffi::leveldb_snapshot_t,
  created_at: OffsetDateTime,
}

impl<'db> Snapshot<'db> {
  pub(crate) fn new(db: &'db Database) -> Snapshot<'db> {
    Snapshot {
      db,
      handle: unsafe { ffi::leveldb_create_snapshot(db.raw()) },
      created_at: OffsetDateTime::now_utc(),
    }
  }

  /// When this snapshot was taken. Diagnostic only; the consistency point is
  /// defined by the engine, not by this wall-clock reading.
  pub fn created_at(&self) -> OffsetDateTime {
    self.created_at
  }

  /// Looks up a key as of the snapshot's consistency point.
  pub fn get(&self, key: &str) -> Result<Option<String>> {
    self.get_opt(key, &ReadOptions::default())
  }

  pub fn get_opt(&self, key: &str, opts: &ReadOptions) -> Result<Option<String>> {
    self.db.get_raw(key, opts, Some(self.handle))
  }

  /// Scans all entries as of the snapshot's consistency point.
  pub fn scan(&self) -> Scan<'_> {
    self.scan_opt(None, &ReadOptions::default())
  }

  pub fn scan_from(&self, from: &str) -> Scan<'_> {
    self.scan_opt(Some(from), &ReadOptions::default())
  }

  pub fn scan_opt(&self, from: Option<&str>, opts: &ReadOptions) -> Scan<'_> {
    Scan::new(self.db.raw(), opts, from, Some(self.handle))
  }
}

impl Drop for Snapshot<'_> {
  fn drop(&mut self) {
    unsafe { ffi::leveldb_release_snapshot(self.db.raw(), self.handle) };
  }
}
