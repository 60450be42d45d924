//! RAII ownership of engine handles.
//!
//! Each handle type has exactly one creation path and one release path, and
//! the release runs from `Drop` so it cannot be skipped by early returns or
//! panics. These wrappers never outlive the call sequence they were built
//! for; nothing here is shared between threads.

use std::ptr;

use libc::{c_char, c_uchar, c_void, size_t};

use crate::codec;
use crate::ffi;
use crate::option::Options;

/// Out-parameter slot for the engine's error-message convention. Every
/// fallible native call takes `slot.as_out()`; afterwards `take_message`
/// decodes and frees a non-null message exactly once. A message left behind
/// by a panicking caller is still freed on drop.
pub(crate) struct ErrorSlot {
  ptr: *mut c_char,
}

impl ErrorSlot {
  pub fn new() -> Self {
    Self { ptr: ptr::null_mut() }
  }

  pub fn as_out(&mut self) -> *mut *mut c_char {
    &mut self.ptr
  }

  /// Consumes the native message, if any, returning its text.
  pub fn take_message(&mut self) -> Option<String> {
    if self.ptr.is_null() {
      return None;
    }
    let message = unsafe {
      let len = libc::strlen(self.ptr);
      codec::decode(self.ptr, len as size_t)
    };
    unsafe { ffi::leveldb_free(self.ptr as *mut c_void) };
    self.ptr = ptr::null_mut();
    Some(message)
  }
}

impl Drop for ErrorSlot {
  fn drop(&mut self) {
    if !self.ptr.is_null() {
      unsafe { ffi::leveldb_free(self.ptr as *mut c_void) };
    }
  }
}

/// Native top-level options, marshalled once from an [`Options`] value.
/// The engine requires this handle to outlive the database opened with it,
/// so [`crate::db::Database`] stores it and drops it after the DB handle.
#[derive(Debug)]
pub(crate) struct OptionsHandle {
  ptr: *mut ffi::leveldb_options_t,
}

impl OptionsHandle {
  pub fn new(opts: &Options) -> Self {
    debug_assert!(opts.block_size > 0);
    debug_assert!(opts.max_file_size > 0);
    debug_assert!(opts.write_buffer_size > 0);
    unsafe {
      let ptr = ffi::leveldb_options_create();
      ffi::leveldb_options_set_block_restart_interval(ptr, opts.block_restart_interval);
      ffi::leveldb_options_set_block_size(ptr, opts.block_size as size_t);
      ffi::leveldb_options_set_compression(ptr, opts.compression.to_native());
      ffi::leveldb_options_set_create_if_missing(ptr, opts.create_if_missing as c_uchar);
      ffi::leveldb_options_set_error_if_exists(ptr, opts.error_if_exists as c_uchar);
      ffi::leveldb_options_set_max_file_size(ptr, opts.max_file_size as size_t);
      ffi::leveldb_options_set_max_open_files(ptr, opts.max_open_files);
      ffi::leveldb_options_set_paranoid_checks(ptr, opts.paranoid_checks as c_uchar);
      ffi::leveldb_options_set_write_buffer_size(ptr, opts.write_buffer_size as size_t);
      Self { ptr }
    }
  }

  pub fn as_ptr(&self) -> *const ffi::leveldb_options_t {
    self.ptr
  }
}

impl Drop for OptionsHandle {
  fn drop(&mut self) {
    unsafe { ffi::leveldb_options_destroy(self.ptr) };
  }
}

/// Transient per-call read options, optionally pinned to a snapshot.
pub(crate) struct ReadOptionsHandle {
  ptr: *mut ffi::leveldb_readoptions_t,
}

impl ReadOptionsHandle {
  pub fn new(
    verify_checksums: bool,
    fill_cache: bool,
    snapshot: Option<*const ffi::leveldb_snapshot_t>,
  ) -> Self {
    unsafe {
      let ptr = ffi::leveldb_readoptions_create();
      ffi::leveldb_readoptions_set_verify_checksums(ptr, verify_checksums as c_uchar);
      ffi::leveldb_readoptions_set_fill_cache(ptr, fill_cache as c_uchar);
      if let Some(snapshot) = snapshot {
        ffi::leveldb_readoptions_set_snapshot(ptr, snapshot);
      }
      Self { ptr }
    }
  }

  pub fn as_ptr(&self) -> *const ffi::leveldb_readoptions_t {
    self.ptr
  }

  /// Hands the raw handle to a caller that takes over the release obligation.
  /// The scan engine does this so it can destroy the iterator and the read
  /// options in the required order from a single place.
  pub fn into_raw(self) -> *mut ffi::leveldb_readoptions_t {
    let ptr = self.ptr;
    std::mem::forget(self);
    ptr
  }
}

impl Drop for ReadOptionsHandle {
  fn drop(&mut self) {
    unsafe { ffi::leveldb_readoptions_destroy(self.ptr) };
  }
}

/// Transient per-call write options.
pub(crate) struct WriteOptionsHandle {
  ptr: *mut ffi::leveldb_writeoptions_t,
}

impl WriteOptionsHandle {
  pub fn new(sync: bool) -> Self {
    unsafe {
      let ptr = ffi::leveldb_writeoptions_create();
      ffi::leveldb_writeoptions_set_sync(ptr, sync as c_uchar);
      Self { ptr }
    }
  }

  pub fn as_ptr(&self) -> *const ffi::leveldb_writeoptions_t {
    self.ptr
  }
}

impl Drop for WriteOptionsHandle {
  fn drop(&mut self) {
    unsafe { ffi::leveldb_writeoptions_destroy(self.ptr) };
  }
}

/// Native write batch being assembled for one atomic commit.
pub(crate) struct WriteBatchHandle {
  ptr: *mut ffi::leveldb_writebatch_t,
}

impl WriteBatchHandle {
  pub fn new() -> Self {
    Self {
      ptr: unsafe { ffi::leveldb_writebatch_create() },
    }
  }

  pub fn put(&mut self, key: &str, value: &str) {
    let (key_ptr, key_len) = codec::as_native(key);
    let (val_ptr, val_len) = codec::as_native(value);
    unsafe { ffi::leveldb_writebatch_put(self.ptr, key_ptr, key_len, val_ptr, val_len) };
  }

  pub fn delete(&mut self, key: &str) {
    let (key_ptr, key_len) = codec::as_native(key);
    unsafe { ffi::leveldb_writebatch_delete(self.ptr, key_ptr, key_len) };
  }

  pub fn as_ptr(&self) -> *mut ffi::leveldb_writebatch_t {
    self.ptr
  }
}

impl Drop for WriteBatchHandle {
  fn drop(&mut self) {
    unsafe { ffi::leveldb_writebatch_destroy(self.ptr) };
  }
}
