//! Conversions between host text and the byte-oriented native boundary.
//!
//! Keys and values cross into the engine as (pointer, explicit byte length)
//! pairs taken straight from the UTF-8 representation; nothing relies on NUL
//! termination, so multi-byte and astral-plane characters survive unchanged.
//! Data coming back is decoded lossily, since the engine stores opaque bytes.

use std::ffi::CString;
use std::path::Path;
use std::slice;

use libc::{c_char, c_void, size_t};

use crate::ffi;

/// Borrows a string's bytes as a native (pointer, length) pair for the
/// duration of one call.
pub(crate) fn as_native(s: &str) -> (*const c_char, size_t) {
  (s.as_ptr() as *const c_char, s.len() as size_t)
}

/// Decodes `len` bytes at `ptr` into an owned `String`. The pointer stays
/// owned by the engine.
///
/// # Safety
///
/// `ptr` must be non-null and point to at least `len` readable bytes.
pub(crate) unsafe fn decode(ptr: *const c_char, len: size_t) -> String {
  let bytes = slice::from_raw_parts(ptr as *const u8, len as usize);
  String::from_utf8_lossy(bytes).into_owned()
}

/// Decodes an engine-allocated buffer and releases it through `leveldb_free`.
/// Used for `leveldb_get` results, which the engine hands over to the caller.
///
/// # Safety
///
/// `ptr` must be non-null, point to at least `len` readable bytes, and have
/// been allocated by the engine. It must not be used afterwards.
pub(crate) unsafe fn decode_owned(ptr: *mut c_char, len: size_t) -> String {
  let decoded = decode(ptr, len);
  ffi::leveldb_free(ptr as *mut c_void);
  decoded
}

/// Converts a filesystem path into the NUL-terminated form `leveldb_open`
/// and friends expect. Interior NUL bytes cannot be represented.
pub(crate) fn path_to_cstring(path: &Path) -> Option<CString> {
  CString::new(path.to_string_lossy().as_bytes()).ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn native_view_uses_byte_length() {
    let (_, len) = as_native("héllo");
    assert_eq!(len as usize, 6);
    let (_, len) = as_native("👋🌍");
    assert_eq!(len as usize, 8);
  }

  #[test]
  fn round_trips_multibyte_text() {
    let s = "キー👋🌍";
    let (ptr, len) = as_native(s);
    let back = unsafe { decode(ptr, len) };
    assert_eq!(back, s);
  }

  #[test]
  fn rejects_interior_nul_in_paths() {
    assert!(path_to_cstring(Path::new("ok/path")).is_some());
    assert!(path_to_cstring(Path::new("bad\0path")).is_none());
  }
}
