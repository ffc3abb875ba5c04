// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Tensor element types and shape descriptors

use core::fmt;

use crate::error::ModelError;

/// Largest tensor rank a descriptor may declare
pub const MAX_RANK: usize = 6;

/// Element types a tensor descriptor can declare
///
/// Wire codes start at 1 so a zeroed buffer never decodes as a valid type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElementType {
    /// 32-bit IEEE float
    F32 = 1,
    /// 32-bit signed integer
    I32 = 2,
    /// 8-bit unsigned integer
    U8 = 3,
    /// 8-bit signed integer
    I8 = 4,
}

impl ElementType {
    /// Decode a wire code into an element type
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(ElementType::F32),
            2 => Some(ElementType::I32),
            3 => Some(ElementType::U8),
            4 => Some(ElementType::I8),
            _ => None,
        }
    }

    /// Wire code of this element type
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Storage size of one element in bytes
    pub const fn size_bytes(self) -> usize {
        match self {
            ElementType::F32 | ElementType::I32 => 4,
            ElementType::U8 | ElementType::I8 => 1,
        }
    }

    /// Short lowercase name, matching Rust primitive spelling
    pub const fn name(self) -> &'static str {
        match self {
            ElementType::F32 => "f32",
            ElementType::I32 => "i32",
            ElementType::U8 => "u8",
            ElementType::I8 => "i8",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape and element type of one model tensor
///
/// Descriptors are decoded out of the model container and carry no storage of
/// their own. The interpreter pairs each descriptor with a slot carved from
/// the tensor arena.
///
/// # Examples
///
/// ```
/// use sigil_runtime::{ElementType, TensorDesc};
///
/// let desc = TensorDesc::new(ElementType::F32, &[1, 128, 3, 1]).unwrap();
/// assert_eq!(desc.rank(), 4);
/// assert_eq!(desc.element_count().unwrap(), 384);
/// assert_eq!(desc.byte_len().unwrap(), 1536);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorDesc {
    element_type: ElementType,
    dims: heapless::Vec<u32, MAX_RANK>,
}

impl TensorDesc {
    /// Build a descriptor from an element type and dimension list
    ///
    /// Fails with [`ModelError::RankOutOfRange`] when more than [`MAX_RANK`]
    /// dimensions are given.
    pub fn new(element_type: ElementType, dims: &[u32]) -> Result<Self, ModelError> {
        let mut stored = heapless::Vec::new();
        if stored.extend_from_slice(dims).is_err() {
            return Err(ModelError::RankOutOfRange { rank: dims.len() as u8, max: MAX_RANK });
        }
        Ok(Self { element_type, dims: stored })
    }

    /// Element type of this tensor
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Number of dimensions
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Dimension list
    pub fn dims(&self) -> &[u32] {
        &self.dims
    }

    /// One dimension, `None` past the rank
    pub fn dim(&self, index: usize) -> Option<u32> {
        self.dims.get(index).copied()
    }

    /// Total element count, the product of all dimensions
    ///
    /// A rank-zero descriptor counts as a single scalar element.
    pub fn element_count(&self) -> Result<usize, ModelError> {
        let mut count: usize = 1;
        for &dim in self.dims.iter() {
            count = count.checked_mul(dim as usize).ok_or(ModelError::SizeOverflow)?;
        }
        Ok(count)
    }

    /// Storage size of this tensor in bytes
    pub fn byte_len(&self) -> Result<usize, ModelError> {
        self.element_count()?
            .checked_mul(self.element_type.size_bytes())
            .ok_or(ModelError::SizeOverflow)
    }
}
