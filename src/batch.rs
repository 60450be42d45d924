//! Describe-then-execute batching.
//!
//! A [`BatchBuilder`] accumulates operations entirely in process; nothing
//! touches native code until [`crate::db::Database::write`] materializes the
//! built [`Batch`] into one native write batch and commits it atomically.
//! This keeps batch construction testable without a live database.

/// A single mutation inside a batch. Order matters: later operations on the
/// same key win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
  Put { key: String, value: String },
  Delete { key: String },
}

impl BatchOperation {
  pub fn key(&self) -> &str {
    match self {
      BatchOperation::Put { key, .. } => key,
      BatchOperation::Delete { key } => key,
    }
  }
}

/// An immutable, ordered sequence of operations, committed atomically and
/// consumed exactly once by [`crate::db::Database::write`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
  operations: Vec<BatchOperation>,
}

impl Batch {
  pub fn operations(&self) -> &[BatchOperation] {
    &self.operations
  }

  pub fn len(&self) -> usize {
    self.operations.len()
  }

  pub fn is_empty(&self) -> bool {
    self.operations.is_empty()
  }
}

/// Append-only builder for [`Batch`]. Reusable: `build` snapshots the current
/// operation list, and appends made afterwards do not affect earlier builds.
#[derive(Debug, Default)]
pub struct BatchBuilder {
  operations: Vec<BatchOperation>,
}

impl BatchBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
    self.operations.push(BatchOperation::Put {
      key: key.into(),
      value: value.into(),
    });
    self
  }

  pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
    self.operations.push(BatchOperation::Delete { key: key.into() });
    self
  }

  pub fn build(&self) -> Batch {
    Batch {
      operations: self.operations.clone(),
    }
  }
}
