//! Declarative binding of the LevelDB C surface.
//!
//! Pure signature/ABI description, no logic. Every handle type is an opaque
//! engine-owned pointer; the safe wrappers in [`crate::handles`] own creation
//! and release. The `leveldb-sys` crate is pulled in only so its build script
//! compiles and links the bundled LevelDB static library; the declarations
//! below resolve against that library at link time.

#![allow(non_camel_case_types)]

use libc::{c_char, c_int, c_uchar, c_void, size_t};

use leveldb_sys as _;

pub enum leveldb_t {}
pub enum leveldb_options_t {}
pub enum leveldb_readoptions_t {}
pub enum leveldb_writeoptions_t {}
pub enum leveldb_writebatch_t {}
pub enum leveldb_iterator_t {}
pub enum leveldb_snapshot_t {}

extern "C" {
  // Database lifecycle and management.
  pub fn leveldb_open(
    options: *const leveldb_options_t,
    name: *const c_char,
    errptr: *mut *mut c_char,
  ) -> *mut leveldb_t;
  pub fn leveldb_close(db: *mut leveldb_t);
  pub fn leveldb_destroy_db(
    options: *const leveldb_options_t,
    name: *const c_char,
    errptr: *mut *mut c_char,
  );
  pub fn leveldb_repair_db(
    options: *const leveldb_options_t,
    name: *const c_char,
    errptr: *mut *mut c_char,
  );

  // Point operations.
  pub fn leveldb_put(
    db: *mut leveldb_t,
    options: *const leveldb_writeoptions_t,
    key: *const c_char,
    keylen: size_t,
    val: *const c_char,
    vallen: size_t,
    errptr: *mut *mut c_char,
  );
  pub fn leveldb_delete(
    db: *mut leveldb_t,
    options: *const leveldb_writeoptions_t,
    key: *const c_char,
    keylen: size_t,
    errptr: *mut *mut c_char,
  );
  pub fn leveldb_get(
    db: *mut leveldb_t,
    options: *const leveldb_readoptions_t,
    key: *const c_char,
    keylen: size_t,
    vallen: *mut size_t,
    errptr: *mut *mut c_char,
  ) -> *mut c_char;

  // Atomic batch commit.
  pub fn leveldb_write(
    db: *mut leveldb_t,
    options: *const leveldb_writeoptions_t,
    batch: *mut leveldb_writebatch_t,
    errptr: *mut *mut c_char,
  );
  pub fn leveldb_writebatch_create() -> *mut leveldb_writebatch_t;
  pub fn leveldb_writebatch_destroy(batch: *mut leveldb_writebatch_t);
  pub fn leveldb_writebatch_put(
    batch: *mut leveldb_writebatch_t,
    key: *const c_char,
    klen: size_t,
    val: *const c_char,
    vlen: size_t,
  );
  pub fn leveldb_writebatch_delete(batch: *mut leveldb_writebatch_t, key: *const c_char, klen: size_t);

  // Iteration.
  pub fn leveldb_create_iterator(
    db: *mut leveldb_t,
    options: *const leveldb_readoptions_t,
  ) -> *mut leveldb_iterator_t;
  pub fn leveldb_iter_destroy(iter: *mut leveldb_iterator_t);
  pub fn leveldb_iter_valid(iter: *const leveldb_iterator_t) -> c_uchar;
  pub fn leveldb_iter_seek_to_first(iter: *mut leveldb_iterator_t);
  pub fn leveldb_iter_seek(iter: *mut leveldb_iterator_t, k: *const c_char, klen: size_t);
  pub fn leveldb_iter_next(iter: *mut leveldb_iterator_t);
  pub fn leveldb_iter_key(iter: *const leveldb_iterator_t, klen: *mut size_t) -> *const c_char;
  pub fn leveldb_iter_value(iter: *const leveldb_iterator_t, vlen: *mut size_t) -> *const c_char;
  pub fn leveldb_iter_get_error(iter: *const leveldb_iterator_t, errptr: *mut *mut c_char);

  // Snapshots.
  pub fn leveldb_create_snapshot(db: *mut leveldb_t) -> *const leveldb_snapshot_t;
  pub fn leveldb_release_snapshot(db: *mut leveldb_t, snapshot: *const leveldb_snapshot_t);

  // Compaction.
  pub fn leveldb_compact_range(
    db: *mut leveldb_t,
    start_key: *const c_char,
    start_key_len: size_t,
    limit_key: *const c_char,
    limit_key_len: size_t,
  );

  // Top-level options.
  pub fn leveldb_options_create() -> *mut leveldb_options_t;
  pub fn leveldb_options_destroy(options: *mut leveldb_options_t);
  pub fn leveldb_options_set_block_restart_interval(options: *mut leveldb_options_t, interval: c_int);
  pub fn leveldb_options_set_block_size(options: *mut leveldb_options_t, size: size_t);
  pub fn leveldb_options_set_compression(options: *mut leveldb_options_t, level: c_int);
  pub fn leveldb_options_set_create_if_missing(options: *mut leveldb_options_t, v: c_uchar);
  pub fn leveldb_options_set_error_if_exists(options: *mut leveldb_options_t, v: c_uchar);
  pub fn leveldb_options_set_max_file_size(options: *mut leveldb_options_t, size: size_t);
  pub fn leveldb_options_set_max_open_files(options: *mut leveldb_options_t, n: c_int);
  pub fn leveldb_options_set_paranoid_checks(options: *mut leveldb_options_t, v: c_uchar);
  pub fn leveldb_options_set_write_buffer_size(options: *mut leveldb_options_t, size: size_t);

  // Per-call read options.
  pub fn leveldb_readoptions_create() -> *mut leveldb_readoptions_t;
  pub fn leveldb_readoptions_destroy(options: *mut leveldb_readoptions_t);
  pub fn leveldb_readoptions_set_verify_checksums(options: *mut leveldb_readoptions_t, v: c_uchar);
  pub fn leveldb_readoptions_set_fill_cache(options: *mut leveldb_readoptions_t, v: c_uchar);
  pub fn leveldb_readoptions_set_snapshot(
    options: *mut leveldb_readoptions_t,
    snapshot: *const leveldb_snapshot_t,
  );

  // Per-call write options.
  pub fn leveldb_writeoptions_create() -> *mut leveldb_writeoptions_t;
  pub fn leveldb_writeoptions_destroy(options: *mut leveldb_writeoptions_t);
  pub fn leveldb_writeoptions_set_sync(options: *mut leveldb_writeoptions_t, v: c_uchar);

  // Engine-allocated buffers (values, error messages) go back through here.
  pub fn leveldb_free(ptr: *mut c_void);

  pub fn leveldb_major_version() -> c_int;
  pub fn leveldb_minor_version() -> c_int;
}
