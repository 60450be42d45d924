//! The database handle: root owner of the native DB and options handles.

use std::path::{Path, PathBuf};

use libc::size_t;
use log::{debug, error};

use crate::batch::{Batch, BatchOperation};
use crate::codec;
use crate::errors::{Errors, Result};
use crate::ffi;
use crate::handles::{ErrorSlot, OptionsHandle, ReadOptionsHandle, WriteBatchHandle, WriteOptionsHandle};
use crate::iterator::Scan;
use crate::option::{Options, ReadOptions, WriteOptions};
use crate::snapshot::Snapshot;

/// An open LevelDB database.
///
/// Owns the native DB handle and the native options handle it was opened
/// with; dropping (or [`close`](Database::close)-ing) releases the DB first
/// and the options after it, the order the engine requires. All operations
/// take `&self` and block the calling thread until the native call returns;
/// the engine itself synchronizes concurrent access to one open handle, and
/// this layer adds no locking of its own.
#[derive(Debug)]
pub struct Database {
  db: *mut ffi::leveldb_t,
  // Field order is load-bearing: `options` must drop after `leveldb_close`
  // has run in `Drop::drop`.
  options: OptionsHandle,
  path: PathBuf,
}

// The engine documents concurrent calls into a single open DB handle from
// multiple threads as safe. Transient per-call handles are stack-local, so
// nothing mutable is shared between callers.
unsafe impl Send for Database {}
unsafe impl Sync for Database {}

impl Database {
  /// Opens (creating, if [`Options::create_if_missing`]) the database at
  /// `path`, which must be a directory.
  pub fn open(path: impl AsRef<Path>, options: Options) -> Result<Database> {
    let path = path.as_ref().to_path_buf();
    let c_path = codec::path_to_cstring(&path)
      .ok_or_else(|| Errors::InvalidPath(path.display().to_string()))?;
    let options = OptionsHandle::new(&options);
    let mut err = ErrorSlot::new();
    let db = unsafe { ffi::leveldb_open(options.as_ptr(), c_path.as_ptr(), err.as_out()) };
    if let Some(message) = err.take_message() {
      error!("failed to open database at {}: {message}", path.display());
      return Err(Errors::OpenFailed(message));
    }
    if db.is_null() {
      return Err(Errors::OpenFailed("engine returned no handle".to_string()));
    }
    debug!("opened database at {}", path.display());
    Ok(Database { db, options, path })
  }

  /// Inserts or updates a single key/value pair.
  pub fn put(&self, key: &str, value: &str) -> Result<()> {
    self.put_opt(key, value, &WriteOptions::default())
  }

  pub fn put_opt(&self, key: &str, value: &str, opts: &WriteOptions) -> Result<()> {
    let write_opts = WriteOptionsHandle::new(opts.sync);
    let mut err = ErrorSlot::new();
    let (key_ptr, key_len) = codec::as_native(key);
    let (val_ptr, val_len) = codec::as_native(value);
    unsafe {
      ffi::leveldb_put(self.db, write_opts.as_ptr(), key_ptr, key_len, val_ptr, val_len, err.as_out());
    }
    match err.take_message() {
      Some(message) => {
        error!("put failed: {message}");
        Err(Errors::WriteFailed(message))
      }
      None => Ok(()),
    }
  }

  /// Deletes a key. Deleting an absent key is not an error.
  pub fn delete(&self, key: &str) -> Result<()> {
    self.delete_opt(key, &WriteOptions::default())
  }

  pub fn delete_opt(&self, key: &str, opts: &WriteOptions) -> Result<()> {
    let write_opts = WriteOptionsHandle::new(opts.sync);
    let mut err = ErrorSlot::new();
    let (key_ptr, key_len) = codec::as_native(key);
    unsafe {
      ffi::leveldb_delete(self.db, write_opts.as_ptr(), key_ptr, key_len, err.as_out());
    }
    match err.take_message() {
      Some(message) => {
        error!("delete failed: {message}");
        Err(Errors::WriteFailed(message))
      }
      None => Ok(()),
    }
  }

  /// Commits a batch atomically: either every operation becomes visible or
  /// none does, and no reader can observe a partially applied batch.
  pub fn write(&self, batch: Batch) -> Result<()> {
    self.write_opt(batch, &WriteOptions::default())
  }

  pub fn write_opt(&self, batch: Batch, opts: &WriteOptions) -> Result<()> {
    let mut native = WriteBatchHandle::new();
    for operation in batch.operations() {
      match operation {
        BatchOperation::Put { key, value } => native.put(key, value),
        BatchOperation::Delete { key } => native.delete(key),
      }
    }
    let write_opts = WriteOptionsHandle::new(opts.sync);
    let mut err = ErrorSlot::new();
    unsafe {
      ffi::leveldb_write(self.db, write_opts.as_ptr(), native.as_ptr(), err.as_out());
    }
    match err.take_message() {
      Some(message) => {
        error!("batch commit of {} operations failed: {message}", batch.len());
        Err(Errors::WriteFailed(message))
      }
      None => Ok(()),
    }
  }

  /// Looks up a key. `Ok(None)` means the key is absent; a present but empty
  /// value comes back as `Ok(Some(""))`. `Err` is reserved for genuine engine
  /// errors.
  pub fn get(&self, key: &str) -> Result<Option<String>> {
    self.get_opt(key, &ReadOptions::default())
  }

  pub fn get_opt(&self, key: &str, opts: &ReadOptions) -> Result<Option<String>> {
    self.get_raw(key, opts, None)
  }

  pub(crate) fn get_raw(
    &self,
    key: &str,
    opts: &ReadOptions,
    snapshot: Option<*const ffi::leveldb_snapshot_t>,
  ) -> Result<Option<String>> {
    let read_opts = ReadOptionsHandle::new(opts.verify_checksums, opts.fill_cache, snapshot);
    let mut err = ErrorSlot::new();
    let mut val_len: size_t = 0;
    let (key_ptr, key_len) = codec::as_native(key);
    let value = unsafe {
      ffi::leveldb_get(self.db, read_opts.as_ptr(), key_ptr, key_len, &mut val_len, err.as_out())
    };
    if let Some(message) = err.take_message() {
      return Err(Errors::ReadFailed(message));
    }
    if value.is_null() {
      // Absence, not an error: the engine signals a missing key through
      // buffer nullness, never through the error channel.
      return Ok(None);
    }
    Ok(Some(unsafe { codec::decode_owned(value, val_len) }))
  }

  /// Opens a forward scan over all entries in ascending key order.
  pub fn scan(&self) -> Scan<'_> {
    self.scan_opt(None, &ReadOptions::default())
  }

  /// Opens a forward scan positioned at the first key `>= from`.
  pub fn scan_from(&self, from: &str) -> Scan<'_> {
    self.scan_opt(Some(from), &ReadOptions::default())
  }

  pub fn scan_opt(&self, from: Option<&str>, opts: &ReadOptions) -> Scan<'_> {
    Scan::new(self.db, opts, from, None)
  }

  /// Takes a point-in-time snapshot of the database.
  ///
  /// The snapshot borrows the database, so it cannot outlive it, and its
  /// release always happens before the database closes.
  ///
  /// Stability note: `leveldb_create_snapshot` has crashed through other
  /// bindings on some platforms. The behavior is re-verified against the
  /// bundled engine by this crate's test suite; treat the call as
  /// experimental on platforms the suite does not cover.
  pub fn create_snapshot(&self) -> Snapshot<'_> {
    Snapshot::new(self)
  }

  /// Runs `action` against a fresh snapshot, releasing it on every exit path
  /// including unwinding. See [`create_snapshot`](Database::create_snapshot)
  /// for the stability note.
  pub fn with_snapshot<T>(&self, action: impl FnOnce(&Snapshot<'_>) -> T) -> T {
    let snapshot = self.create_snapshot();
    action(&snapshot)
  }

  /// Asks the engine to compact the key range `[start, end)`. An empty
  /// string leaves that side of the range unbounded. Best-effort and
  /// engine-paced; blocks until the engine returns.
  pub fn compact_range(&self, start: &str, end: &str) {
    let (start_ptr, start_len) = match start {
      "" => (std::ptr::null(), 0),
      s => codec::as_native(s),
    };
    let (end_ptr, end_len) = match end {
      "" => (std::ptr::null(), 0),
      s => codec::as_native(s),
    };
    unsafe {
      ffi::leveldb_compact_range(self.db, start_ptr, start_len, end_ptr, end_len);
    }
  }

  /// Closes the database, releasing the native DB handle and then the
  /// options handle. Consuming `self` makes use-after-close and double-close
  /// compile errors instead of undefined behavior; dropping is equivalent.
  pub fn close(self) {}

  pub(crate) fn raw(&self) -> *mut ffi::leveldb_t {
    self.db
  }
}

impl Drop for Database {
  fn drop(&mut self) {
    unsafe { ffi::leveldb_close(self.db) };
    debug!("closed database at {}", self.path.display());
    // `options` drops right after this body, once the DB handle is gone.
  }
}

/// Destroys the database at `path`, removing its contents. A missing
/// database is not an error.
pub fn destroy(path: impl AsRef<Path>, options: &Options) -> Result<()> {
  management_call(path.as_ref(), options, ffi::leveldb_destroy_db)
}

/// Attempts to repair the database at `path`, recovering as much data as the
/// engine can salvage.
pub fn repair(path: impl AsRef<Path>, options: &Options) -> Result<()> {
  management_call(path.as_ref(), options, ffi::leveldb_repair_db)
}

fn management_call(
  path: &Path,
  options: &Options,
  call: unsafe extern "C" fn(*const ffi::leveldb_options_t, *const libc::c_char, *mut *mut libc::c_char),
) -> Result<()> {
  let c_path =
    codec::path_to_cstring(path).ok_or_else(|| Errors::InvalidPath(path.display().to_string()))?;
  let options = OptionsHandle::new(options);
  let mut err = ErrorSlot::new();
  unsafe { call(options.as_ptr(), c_path.as_ptr(), err.as_out()) };
  match err.take_message() {
    Some(message) => {
      error!("management operation on {} failed: {message}", path.display());
      Err(Errors::ManagementFailed(message))
    }
    None => Ok(()),
  }
}

/// Version of the linked engine, `(major, minor)`.
pub fn version() -> (i32, i32) {
  unsafe { (ffi::leveldb_major_version(), ffi::leveldb_minor_version()) }
}
