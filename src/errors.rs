use thiserror::Error;

/// Failures surfaced by the client layer. The engine reports errors as
/// free-form message strings; each fallible call maps its message into the
/// variant matching the operation that produced it. There is no retry logic:
/// transient-vs-permanent cannot be told apart from the message text, so every
/// native error propagates immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Errors {
  #[error("failed to open database: {0}")]
  OpenFailed(String),

  #[error("write rejected by engine: {0}")]
  WriteFailed(String),

  #[error("read failed: {0}")]
  ReadFailed(String),

  #[error("database management operation failed: {0}")]
  ManagementFailed(String),

  /// Forcing a lazy entry whose backing native memory is gone, either because
  /// the scan was closed or because it advanced past the entry.
  #[error("entry is no longer backed by the scan's native iterator")]
  EntryInvalidated,

  #[error("path cannot cross the native boundary: {0}")]
  InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, Errors>;
