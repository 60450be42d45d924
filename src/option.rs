use libc::c_int;

/// Configuration applied when opening, repairing, or destroying a database.
///
/// Immutable after construction: the values are marshalled into a native
/// options handle once at open time and never mutated afterwards. Every field
/// maps 1:1 onto an engine `set_*` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
  /// Number of keys between restart points for delta encoding of keys.
  pub block_restart_interval: i32,

  /// Approximate size of user data packed per block, in bytes.
  pub block_size: usize,

  /// Compression applied to blocks on disk.
  pub compression: CompressionType,

  /// Create the database directory if it does not exist.
  pub create_if_missing: bool,

  /// Fail `open` if the database already exists.
  pub error_if_exists: bool,

  /// Maximum size of a single table file, in bytes.
  pub max_file_size: u64,

  /// Maximum number of files the engine may hold open at once.
  pub max_open_files: i32,

  /// Aggressive checking of stored data on every read.
  pub paranoid_checks: bool,

  /// Amount of data to buffer in memory before flushing to a sorted on-disk
  /// file, in bytes.
  pub write_buffer_size: u64,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      block_restart_interval: 16,
      block_size: 4 * 1024,
      compression: CompressionType::Snappy,
      create_if_missing: true,
      error_if_exists: false,
      max_file_size: 2 * 1024 * 1024,
      max_open_files: 1000,
      paranoid_checks: false,
      write_buffer_size: 4 * 1024 * 1024,
    }
  }
}

/// Block compression codecs understood by the engine. A closed enumeration:
/// the engine's integer codes never cross the API as raw integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
  None,
  Snappy,
}

impl CompressionType {
  pub(crate) fn to_native(self) -> c_int {
    match self {
      CompressionType::None => 0,
      CompressionType::Snappy => 1,
    }
  }
}

/// Per-call read configuration, constructed fresh for each `get` or scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
  /// Verify checksums of all data read from disk for this call.
  pub verify_checksums: bool,

  /// Populate the engine's block cache with data read by this call.
  pub fill_cache: bool,
}

impl Default for ReadOptions {
  fn default() -> Self {
    Self {
      verify_checksums: false,
      fill_cache: true,
    }
  }
}

/// Per-call write configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
  /// Force the engine to fsync before the call returns.
  pub sync: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn documented_defaults() {
    let opts = Options::default();
    assert_eq!(opts.block_restart_interval, 16);
    assert_eq!(opts.block_size, 4096);
    assert_eq!(opts.compression, CompressionType::Snappy);
    assert!(opts.create_if_missing);
    assert!(!opts.error_if_exists);
    assert_eq!(opts.max_file_size, 2 * 1024 * 1024);
    assert_eq!(opts.max_open_files, 1000);
    assert!(!opts.paranoid_checks);
    assert_eq!(opts.write_buffer_size, 4 * 1024 * 1024);
  }

  #[test]
  fn read_write_defaults() {
    let read = ReadOptions::default();
    assert!(!read.verify_checksums);
    assert!(read.fill_cache);
    assert!(!WriteOptions::default().sync);
  }

  #[test]
  fn compression_codes_are_stable() {
    assert_eq!(CompressionType::None.to_native(), 0);
    assert_eq!(CompressionType::Snappy.to_native(), 1);
  }
}
