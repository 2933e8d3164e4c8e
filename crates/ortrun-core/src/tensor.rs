use bytes::{Bytes, BytesMut};
use smallvec::SmallVec;

use crate::{ElementType, IOName};

/// Concrete tensor shape with every axis resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape(pub SmallVec<[i64; 6]>);

impl Shape {
    pub fn from_slice(d: &[i64]) -> Self {
        Self(d.iter().copied().collect())
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn dims(&self) -> &[i64] {
        &self.0
    }

    /// Element count, or `None` if an axis is non-positive or the product
    /// does not fit in `usize`.
    pub fn numel(&self) -> Option<usize> {
        self.0.iter().try_fold(1usize, |acc, &d| {
            if d <= 0 {
                return None;
            }
            acc.checked_mul(usize::try_from(d).ok()?)
        })
    }
}

/// Owns the storage for one model input. Contents are zero-filled; nothing
/// meaningful is ever written into it.
#[derive(Clone, Debug)]
pub struct InputBuffer {
    bytes: Bytes,
}

impl InputBuffer {
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: BytesMut::zeroed(len).freeze(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &Bytes {
        &self.bytes
    }
}

/// A provisioned input: name, element type and shape bound to its buffer.
#[derive(Clone, Debug)]
pub struct InputTensor {
    pub name: IOName,
    pub dtype: ElementType,
    pub shape: Shape,
    pub buffer: InputBuffer,
}

impl InputTensor {
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Type and shape of a tensor produced by a run, as reported by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTensor {
    pub name: IOName,
    pub dtype: ElementType,
    pub shape: Vec<i64>,
}
