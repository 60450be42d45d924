//! LevelKV: a safe, ergonomic client layer over the LevelDB storage engine.
//!
//! The engine itself (compaction, SSTables, write-ahead log, memtable) is
//! the battle-tested native LevelDB library, linked in as a black box. This
//! crate turns its handle-based C surface into a typed, composable API in
//! which every native handle (database, iterator, snapshot, write batch,
//! options, error buffer) is released exactly once, on every exit path.
//!
//! # Features
//!
//! * Typed, immutable open options with documented defaults
//! * Atomic write batches built entirely in process and committed in one call
//! * Snapshot-isolated reads with compiler-enforced release ordering
//! * Streaming, lazily decoded scans at O(1) additional memory
//! * Typed errors carrying the engine's own message text
//!
//! # Basic Usage
//!
//! ```no_run
//! use levelkv::{db::Database, option::Options};
//!
//! let db = Database::open("/tmp/levelkv-demo", Options::default()).expect("Failed to open");
//!
//! db.put("hello", "world").expect("Failed to put");
//! assert_eq!(db.get("hello").expect("Failed to get").as_deref(), Some("world"));
//!
//! db.delete("hello").expect("Failed to delete");
//! assert_eq!(db.get("hello").expect("Failed to get"), None);
//! ```

mod codec;
mod ffi;
mod handles;

pub mod batch;
pub mod db;
#[cfg(test)]
mod db_test;
pub mod errors;
pub mod iterator;
pub mod option;
pub mod snapshot;
