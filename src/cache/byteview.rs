//! Byte View Module
//!
//! Immutable snapshot of a cached value.

use std::fmt;

use bytes::Bytes;

use crate::cache::ByteSize;

// == Byte View ==
/// Read-only view over the bytes of one cached value.
///
/// Cloning is cheap: clones share the same underlying buffer, which is never
/// mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Copies `data` into a new, owned view.
    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(data),
        }
    }

    /// Number of bytes held by the view.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Returns a copy of the data that the caller may freely mutate.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Borrowed access to the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.b
    }

    /// Shared handle to the underlying buffer, used for response bodies.
    pub fn to_bytes(&self) -> Bytes {
        self.b.clone()
    }
}

impl From<Bytes> for ByteView {
    fn from(b: Bytes) -> Self {
        Self { b }
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(v: Vec<u8>) -> Self {
        Self { b: Bytes::from(v) }
    }
}

impl ByteSize for ByteView {
    fn byte_len(&self) -> usize {
        self.b.len()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.b))
    }
}
