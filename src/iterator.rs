//! Streaming, closeable traversal of key-ordered entries.
//!
//! A [`Scan`] wraps one native iterator and the read options it was created
//! with. It is forward-only and single-pass: pulling entries walks the
//! engine's iterator in place, so memory stays O(1) no matter how many
//! entries the store holds. Entries come out lazy: key and value are decoded
//! from native memory only when first touched, which makes the lifetime
//! rules explicit. An unresolved field can only be forced while the scan is
//! still open and still positioned on that entry; anything else is a typed
//! error, never stale bytes.

use std::cell::{Cell, OnceCell};
use std::marker::PhantomData;
use std::rc::Rc;

use libc::size_t;

use crate::codec;
use crate::errors::{Errors, Result};
use crate::ffi;
use crate::handles::{ErrorSlot, ReadOptionsHandle};
use crate::option::ReadOptions;

/// A fully decoded key/value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
  pub key: String,
  pub value: String,
}

/// State shared between a [`Scan`] and the [`LazyEntry`] values it has
/// produced. Owns the native iterator and read-options handles; `release`
/// is the single teardown path and runs at most once.
struct ScanCore {
  iter: *mut ffi::leveldb_iterator_t,
  read_opts: *mut ffi::leveldb_readoptions_t,
  closed: Cell<bool>,
  /// Bumped every time the iterator advances. Entries remember the position
  /// they were produced at, so forcing one after the scan moved on fails
  /// instead of decoding whatever the iterator points at now.
  position: Cell<u64>,
}

impl ScanCore {
  fn release(&self) {
    if self.closed.replace(true) {
      return;
    }
    // Iterator first, then the read options it was created with.
    unsafe {
      ffi::leveldb_iter_destroy(self.iter);
      ffi::leveldb_readoptions_destroy(self.read_opts);
    }
  }
}

impl Drop for ScanCore {
  fn drop(&mut self) {
    self.release();
  }
}

/// A forward-only scan over the database (or a snapshot of it).
///
/// Implements `Iterator` yielding `Result<LazyEntry>`: exhaustion is the
/// normal `None` terminal state, while a native iterator error surfaces as a
/// single `Err` item. Once consumed or closed it cannot be restarted; start a
/// new scan instead.
///
/// The native iterator and read options are released when the scan is closed
/// or dropped, whichever comes first, and exactly once. The borrow of the
/// owning [`Database`](crate::db::Database) (or
/// [`Snapshot`](crate::snapshot::Snapshot)) keeps the scan from outliving it.
pub struct Scan<'a> {
  core: Rc<ScanCore>,
  started: bool,
  _owner: PhantomData<&'a ()>,
}

impl<'a> Scan<'a> {
  pub(crate) fn new(
    db: *mut ffi::leveldb_t,
    opts: &ReadOptions,
    from: Option<&str>,
    snapshot: Option<*const ffi::leveldb_snapshot_t>,
  ) -> Scan<'a> {
    let read_opts = ReadOptionsHandle::new(opts.verify_checksums, opts.fill_cache, snapshot);
    let iter = unsafe { ffi::leveldb_create_iterator(db, read_opts.as_ptr()) };
    match from {
      Some(from) => {
        let (ptr, len) = codec::as_native(from);
        unsafe { ffi::leveldb_iter_seek(iter, ptr, len) };
      }
      None => unsafe { ffi::leveldb_iter_seek_to_first(iter) },
    }
    Scan {
      core: Rc::new(ScanCore {
        iter,
        read_opts: read_opts.into_raw(),
        closed: Cell::new(false),
        position: Cell::new(0),
      }),
      started: false,
      _owner: PhantomData,
    }
  }

  /// Releases the native iterator and read options now. Dropping the scan is
  /// equivalent; this form only exists to make the close point explicit.
  pub fn close(self) {
    self.core.release();
  }
}

impl Drop for Scan<'_> {
  fn drop(&mut self) {
    self.core.release();
  }
}

impl<'a> Iterator for Scan<'a> {
  type Item = Result<LazyEntry<'a>>;

  fn next(&mut self) -> Option<Self::Item> {
    let core = &self.core;
    unsafe {
      if self.started {
        if ffi::leveldb_iter_valid(core.iter) == 0 {
          return None;
        }
        // Advance lazily, one pull after the entry was yielded, so the
        // previous entry's native memory stayed valid while the caller
        // held it.
        ffi::leveldb_iter_next(core.iter);
        core.position.set(core.position.get() + 1);
      }
      self.started = true;

      if ffi::leveldb_iter_valid(core.iter) == 0 {
        // Exhaustion is normal; a pending engine error is not.
        let mut err = ErrorSlot::new();
        ffi::leveldb_iter_get_error(core.iter, err.as_out());
        if let Some(message) = err.take_message() {
          return Some(Err(Errors::ReadFailed(message)));
        }
        return None;
      }
    }
    Some(Ok(LazyEntry {
      core: Rc::clone(core),
      position: core.position.get(),
      key: OnceCell::new(),
      value: OnceCell::new(),
      _owner: PhantomData,
    }))
  }
}

/// A key/value pair whose fields decode from the scan's native memory on
/// first access. Fields forced while the entry was current stay readable for
/// the entry's lifetime; unresolved fields fail with
/// [`Errors::EntryInvalidated`] once the scan has advanced or closed.
pub struct LazyEntry<'a> {
  core: Rc<ScanCore>,
  position: u64,
  key: OnceCell<String>,
  value: OnceCell<String>,
  _owner: PhantomData<&'a ()>,
}

impl LazyEntry<'_> {
  pub fn key(&self) -> Result<&str> {
    if let Some(key) = self.key.get() {
      return Ok(key.as_str());
    }
    self.check_live()?;
    let mut len: size_t = 0;
    let decoded = unsafe {
      let ptr = ffi::leveldb_iter_key(self.core.iter, &mut len);
      codec::decode(ptr, len)
    };
    Ok(self.key.get_or_init(|| decoded).as_str())
  }

  pub fn value(&self) -> Result<&str> {
    if let Some(value) = self.value.get() {
      return Ok(value.as_str());
    }
    self.check_live()?;
    let mut len: size_t = 0;
    let decoded = unsafe {
      let ptr = ffi::leveldb_iter_value(self.core.iter, &mut len);
      codec::decode(ptr, len)
    };
    Ok(self.value.get_or_init(|| decoded).as_str())
  }

  /// Forces both fields and returns an owned [`Entry`].
  pub fn resolve(&self) -> Result<Entry> {
    Ok(Entry {
      key: self.key()?.to_owned(),
      value: self.value()?.to_owned(),
    })
  }

  fn check_live(&self) -> Result<()> {
    if self.core.closed.get() || self.core.position.get() != self.position {
      return Err(Errors::EntryInvalidated);
    }
    Ok(())
  }
}
