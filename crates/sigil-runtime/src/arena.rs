// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Compile-time sized tensor arena
//!
//! All tensor storage lives in one byte region whose size is a const generic
//! parameter, so a board pays for exactly the arena it declares and the cost
//! is visible at compile time. Slots are carved front to back and never
//! freed individually, the planner either fits or reports exhaustion with
//! the sizes involved.

use crate::error::RuntimeError;

/// Alignment of every carved slot in bytes
///
/// Sixteen keeps any element type the runtime knows aligned, including
/// vectorized f32 access on boards that do 128-bit loads.
pub const ARENA_ALIGN: usize = 16;

/// One carved region of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TensorSlot {
    offset: usize,
    len: usize,
}

impl TensorSlot {
    /// Byte offset of the slot from the arena start
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte length of the slot
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the slot holds zero bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset one past the end of the slot
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

// Keeps the base address aligned so carved slots stay aligned too
#[repr(C, align(16))]
#[derive(Debug)]
struct AlignedBytes<const N: usize>([u8; N]);

/// Fixed-size bump allocator backing all tensor storage
///
/// # Examples
///
/// ```
/// use sigil_runtime::TensorArena;
///
/// let mut arena = TensorArena::<1024>::new();
/// let slot = arena.allocate(100).unwrap();
/// assert_eq!(slot.offset(), 0);
/// let next = arena.allocate(4).unwrap();
/// assert_eq!(next.offset() % 16, 0);
/// ```
#[derive(Debug)]
pub struct TensorArena<const N: usize> {
    storage: AlignedBytes<N>,
    used: usize,
}

impl<const N: usize> TensorArena<N> {
    /// Zeroed arena with nothing carved
    pub const fn new() -> Self {
        Self { storage: AlignedBytes([0; N]), used: 0 }
    }

    /// Carve an aligned slot of `len` bytes
    ///
    /// Fails with [`RuntimeError::ArenaExhausted`] carrying the total bytes
    /// the plan would need and the arena capacity.
    pub fn allocate(&mut self, len: usize) -> Result<TensorSlot, RuntimeError> {
        let offset = align_up(self.used);
        let end = match offset.checked_add(len) {
            Some(end) => end,
            None => return Err(RuntimeError::ArenaExhausted { requested: usize::MAX, capacity: N }),
        };
        if end > N {
            return Err(RuntimeError::ArenaExhausted { requested: end, capacity: N });
        }
        self.used = end;
        Ok(TensorSlot { offset, len })
    }

    /// Bytes consumed so far, including alignment padding
    pub fn used_bytes(&self) -> usize {
        self.used
    }

    /// Total bytes the arena holds
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Forget every carved slot and zero the storage
    ///
    /// Any [`TensorSlot`] handed out before the reset is stale afterwards.
    pub fn reset(&mut self) {
        self.storage.0 = [0; N];
        self.used = 0;
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.storage.0
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.storage.0
    }
}

impl<const N: usize> Default for TensorArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

const fn align_up(value: usize) -> usize {
    (value + ARENA_ALIGN - 1) & !(ARENA_ALIGN - 1)
}
