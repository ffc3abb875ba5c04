// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for model decoding and runtime operations

use core::fmt;

use crate::ops::OpKind;
use crate::tensor::ElementType;

/// Errors raised while validating or decoding a model container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelError {
    /// Container is shorter than its declared layout requires
    Truncated {
        /// Minimum byte length the layout walked so far requires
        expected: usize,
        /// Byte length actually supplied
        actual: usize,
    },
    /// Container does not begin with the model magic bytes
    BadMagic {
        /// The four bytes found at the container start
        found: [u8; 4],
    },
    /// Container is longer than its declared layout accounts for
    TrailingBytes {
        /// Byte length the layout accounts for
        expected: usize,
        /// Byte length actually supplied
        actual: usize,
    },
    /// Operator table exceeds the supported count
    TooManyOperators {
        /// Operators the container declares
        count: usize,
        /// Largest operator table the runtime accepts
        max: usize,
    },
    /// Tensor table exceeds the supported count for one direction
    TooManyTensors {
        /// Tensors the container declares in that direction
        count: usize,
        /// Largest tensor table the runtime accepts per direction
        max: usize,
    },
    /// Tensor descriptor declares a rank past the supported maximum
    RankOutOfRange {
        /// Rank found in the descriptor
        rank: u8,
        /// Largest rank the runtime accepts
        max: usize,
    },
    /// Tensor descriptor names an element type code the runtime does not know
    UnknownElementType {
        /// The offending code
        code: u8,
    },
    /// Tensor index past the declared table
    NoSuchTensor {
        /// Index requested
        index: usize,
        /// Tensors declared in that direction
        count: usize,
    },
    /// Tensor byte size does not fit the address space
    SizeOverflow,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Truncated { expected, actual } => write!(
                f,
                "Model container truncated: layout requires at least {} bytes, found {}",
                expected, actual
            ),
            ModelError::BadMagic { found } => write!(
                f,
                "Model container does not start with the expected magic bytes (found {:?})",
                found
            ),
            ModelError::TrailingBytes { expected, actual } => write!(
                f,
                "Model container carries {} undeclared trailing bytes ({} declared, {} supplied)",
                actual - expected,
                expected,
                actual
            ),
            ModelError::TooManyOperators { count, max } => write!(
                f,
                "Model declares {} operators but at most {} are supported",
                count, max
            ),
            ModelError::TooManyTensors { count, max } => write!(
                f,
                "Model declares {} tensors in one direction but at most {} are supported",
                count, max
            ),
            ModelError::RankOutOfRange { rank, max } => write!(
                f,
                "Tensor descriptor declares rank {} but at most {} is supported",
                rank, max
            ),
            ModelError::UnknownElementType { code } => {
                write!(f, "Tensor descriptor names unknown element type code {}", code)
            }
            ModelError::NoSuchTensor { index, count } => write!(
                f,
                "Tensor index {} is out of range, the model declares {}",
                index, count
            ),
            ModelError::SizeOverflow => {
                write!(f, "Tensor byte size overflows the address space")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ModelError {}

/// Errors raised by the interpreter and its supporting pieces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    /// A model container error surfaced while planning tensors
    Model(ModelError),
    /// Operator registry is out of capacity
    ResolverFull {
        /// Registrations the resolver can hold
        capacity: usize,
    },
    /// Model names an operator code the runtime does not know
    UnknownOperator {
        /// The offending code
        code: u32,
    },
    /// Model names an operator that was never registered
    OperatorNotRegistered {
        /// The missing operator
        op: OpKind,
    },
    /// Arena cannot hold the planned tensors
    ArenaExhausted {
        /// Bytes the plan needs in total
        requested: usize,
        /// Bytes the arena holds
        capacity: usize,
    },
    /// Tensors were already planned for this interpreter
    AlreadyAllocated,
    /// Tensor access before planning
    NotAllocated,
    /// Tensor index past the planned table
    NoSuchTensor {
        /// Index requested
        index: usize,
        /// Tensors planned in that direction
        count: usize,
    },
    /// Typed access does not match the tensor's element type
    ElementTypeMismatch {
        /// Element type the access requested
        expected: ElementType,
        /// Element type the tensor holds
        found: ElementType,
    },
    /// Tensor bytes could not be reinterpreted at the requested element type
    CastFailed,
    /// Execution backend reported a failure
    InvokeFailed {
        /// Backend status code
        status: i32,
    },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Model(e) => write!(f, "Invalid model: {}", e),
            RuntimeError::ResolverFull { capacity } => {
                write!(f, "Operator resolver is full, capacity is {}", capacity)
            }
            RuntimeError::UnknownOperator { code } => {
                write!(f, "Model names operator code {} which this runtime does not know", code)
            }
            RuntimeError::OperatorNotRegistered { op } => {
                write!(f, "Operator {} is not registered with the resolver", op)
            }
            RuntimeError::ArenaExhausted { requested, capacity } => write!(
                f,
                "Tensor arena exhausted: plan needs {} bytes, capacity is {}",
                requested, capacity
            ),
            RuntimeError::AlreadyAllocated => {
                write!(f, "Tensors are already allocated for this interpreter")
            }
            RuntimeError::NotAllocated => {
                write!(f, "Tensors are not allocated, call allocate_tensors() first")
            }
            RuntimeError::NoSuchTensor { index, count } => write!(
                f,
                "Tensor index {} is out of range, the interpreter planned {}",
                index, count
            ),
            RuntimeError::ElementTypeMismatch { expected, found } => write!(
                f,
                "Tensor holds {} elements but the access requested {}",
                found, expected
            ),
            RuntimeError::CastFailed => {
                write!(f, "Tensor bytes cannot be viewed at the requested element type")
            }
            RuntimeError::InvokeFailed { status } => {
                write!(f, "Execution backend reported failure status {}", status)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RuntimeError {}

impl From<ModelError> for RuntimeError {
    fn from(e: ModelError) -> Self {
        RuntimeError::Model(e)
    }
}

/// Result type for runtime operations
pub type Result<T> = core::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_display() {
        let e = ModelError::BadMagic { found: [0, 1, 2, 3] };
        let msg = std::format!("{}", e);
        assert!(msg.contains("magic"));

        let e = ModelError::Truncated { expected: 16, actual: 4 };
        let msg = std::format!("{}", e);
        assert!(msg.contains("16"));
        assert!(msg.contains('4'));
    }

    #[test]
    fn runtime_error_wraps_model_error() {
        let e = RuntimeError::from(ModelError::SizeOverflow);
        assert_eq!(e, RuntimeError::Model(ModelError::SizeOverflow));
    }

    #[test]
    fn runtime_error_display() {
        let e = RuntimeError::ArenaExhausted { requested: 2048, capacity: 1024 };
        let msg = std::format!("{}", e);
        assert!(msg.contains("2048"));
        assert!(msg.contains("1024"));
    }
}
