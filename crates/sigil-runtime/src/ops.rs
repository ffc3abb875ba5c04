// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Operator kinds and the fixed-capacity operator resolver

use core::fmt;

use crate::error::RuntimeError;

/// Operators a model graph may name
///
/// Wire codes start at 1 so a zeroed operator table never decodes as valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum OpKind {
    /// Depthwise 2D convolution
    DepthwiseConv2d = 1,
    /// 2D max pooling
    MaxPool2d = 2,
    /// 2D convolution
    Conv2d = 3,
    /// Fully connected layer
    FullyConnected = 4,
    /// Softmax activation
    Softmax = 5,
}

impl OpKind {
    /// Every operator kind in wire code order
    pub const ALL: [OpKind; 5] = [
        OpKind::DepthwiseConv2d,
        OpKind::MaxPool2d,
        OpKind::Conv2d,
        OpKind::FullyConnected,
        OpKind::Softmax,
    ];

    /// Wire code of this operator
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Operator name as it appears in graph tooling
    pub const fn name(self) -> &'static str {
        match self {
            OpKind::DepthwiseConv2d => "DepthwiseConv2D",
            OpKind::MaxPool2d => "MaxPool2D",
            OpKind::Conv2d => "Conv2D",
            OpKind::FullyConnected => "FullyConnected",
            OpKind::Softmax => "Softmax",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for OpKind {
    type Error = ();

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OpKind::DepthwiseConv2d),
            2 => Ok(OpKind::MaxPool2d),
            3 => Ok(OpKind::Conv2d),
            4 => Ok(OpKind::FullyConnected),
            5 => Ok(OpKind::Softmax),
            _ => Err(()),
        }
    }
}

/// Fixed-capacity registry of the operators a board links kernels for
///
/// The capacity is part of the type so a board states up front how many
/// operator slots it pays for, mirroring how the rest of the runtime sizes
/// its storage at compile time. Registration is idempotent, registering an
/// operator twice consumes one slot.
///
/// # Examples
///
/// ```
/// use sigil_runtime::{OpKind, OpResolver};
///
/// let mut resolver = OpResolver::<5>::new();
/// resolver.register(OpKind::Softmax).unwrap();
/// resolver.register(OpKind::Softmax).unwrap();
/// assert_eq!(resolver.len(), 1);
/// assert!(resolver.contains(OpKind::Softmax));
/// ```
#[derive(Debug, Clone)]
pub struct OpResolver<const CAP: usize> {
    ops: heapless::Vec<OpKind, CAP>,
}

impl<const CAP: usize> OpResolver<CAP> {
    /// Empty resolver
    pub const fn new() -> Self {
        Self { ops: heapless::Vec::new() }
    }

    /// Register an operator the board has kernels for
    pub fn register(&mut self, op: OpKind) -> Result<(), RuntimeError> {
        if self.ops.contains(&op) {
            return Ok(());
        }
        self.ops.push(op).map_err(|_| RuntimeError::ResolverFull { capacity: CAP })
    }

    /// Whether an operator has been registered
    pub fn contains(&self, op: OpKind) -> bool {
        self.ops.contains(&op)
    }

    /// Registered operators in registration order
    pub fn registered(&self) -> &[OpKind] {
        &self.ops
    }

    /// Number of registered operators
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl<const CAP: usize> Default for OpResolver<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for op in OpKind::ALL {
            assert_eq!(OpKind::try_from(op.code()), Ok(op));
        }
        assert_eq!(OpKind::try_from(0), Err(()));
        assert_eq!(OpKind::try_from(6), Err(()));
    }

    #[test]
    fn registration_is_idempotent() {
        let mut resolver = OpResolver::<2>::new();
        resolver.register(OpKind::Conv2d).unwrap();
        resolver.register(OpKind::Conv2d).unwrap();
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.registered(), &[OpKind::Conv2d]);
    }

    #[test]
    fn full_resolver_rejects_new_operators() {
        let mut resolver = OpResolver::<1>::new();
        resolver.register(OpKind::Softmax).unwrap();
        let err = resolver.register(OpKind::Conv2d).unwrap_err();
        assert_eq!(err, RuntimeError::ResolverFull { capacity: 1 });
        // An already registered operator still reports success
        resolver.register(OpKind::Softmax).unwrap();
    }

    #[test]
    fn contains_reflects_registrations() {
        let mut resolver = OpResolver::<5>::new();
        assert!(resolver.is_empty());
        for op in OpKind::ALL {
            resolver.register(op).unwrap();
        }
        assert_eq!(resolver.len(), 5);
        assert!(resolver.contains(OpKind::DepthwiseConv2d));
        assert!(resolver.contains(OpKind::MaxPool2d));
    }
}
