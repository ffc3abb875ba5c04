// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

#![no_std]
#![warn(missing_docs)]

//! # Sigil Runtime
//!
//! Model container, tensor arena and interpreter for the Sigil gesture wand.
//!
//! This crate provides:
//! - **Model container** (`model` module) - A versioned, little-endian byte
//!   format carrying operator codes, tensor descriptors and an opaque engine
//!   payload, read zero-copy through [`Model`]
//! - **Operator registry** (`ops` module) - The operator kinds a graph may
//!   name and the fixed-capacity [`OpResolver`] a board registers them with
//! - **Tensor arena** (`arena` module) - A compile-time sized bump allocator
//!   that backs every input and output tensor
//! - **Interpreter** (`interpreter` module) - Tensor planning over the arena
//!   plus the [`ExecutionBackend`] seam to an external compute engine
//!
//! The crate is `no_std` by default so the same runtime runs on a board and
//! inside host tests. Enabling `std` adds [`ModelBuilder`] for packing model
//! blobs on a workstation.
//!
//! ## Feature Flags
//!
//! - `std` - Model builder and `std::error::Error` impls for error types

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod arena;
pub mod error;
pub mod interpreter;
pub mod model;
pub mod ops;
pub mod tensor;

#[cfg(feature = "std")]
pub mod builder;

pub use arena::{TensorArena, TensorSlot, ARENA_ALIGN};
pub use error::{ModelError, Result, RuntimeError};
pub use interpreter::{ExecutionBackend, Interpreter, InvokeContext};
pub use model::{Model, MAX_IO_TENSORS, MAX_MODEL_OPS, MODEL_MAGIC, SUPPORTED_SCHEMA_VERSION};
pub use ops::{OpKind, OpResolver};
pub use tensor::{ElementType, TensorDesc, MAX_RANK};

#[cfg(feature = "std")]
pub use builder::{BuilderError, ModelBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
