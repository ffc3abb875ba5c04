// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Sigil - Gesture-Wand Firmware
//!
//! Sigil is the firmware stack for an accelerometer gesture wand: a packed
//! model container, a fixed-arena tensor runtime, a thin hardware
//! abstraction, and the board bring-up plus superloop that tie them together.
//! The operator kernels themselves live in an external engine the board
//! links; this crate owns everything up to that seam.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! sigil = "0.0.1-beta.2"  # Default: std (host simulator and tooling)
//! ```
//!
//! ```rust
//! use sigil::prelude::*;
//!
//! let mut platform = MockPlatform::new();
//! let config = FirmwareConfig::default();
//!
//! // Validate the embedded model, plan tensors, check the input window
//! let mut device = bring_up(&mut platform, &GESTURE_MODEL, &config).unwrap();
//! assert_eq!(device.input_length(), 384);
//!
//! // One superloop iteration: status lines over serial, counter advance
//! device.step(&mut platform);
//! assert_eq!(platform.serial_text(), "test\n\rinf_c: 1\n\r");
//! ```
//!
//! ## Feature Flags
//!
//! - **`std`** (default): host platforms, TOML config loading, the model
//!   builder and the simulator binary
//! - **`embedded`**: `embedded-hal` pin adapters for device builds
//!   (combine with `--no-default-features`)
//!
//! ## Components
//!
//! - [`runtime`] - model container, operator resolver, tensor arena and
//!   interpreter (`no_std`)
//! - [`hal`] - platform traits plus host and mock implementations
//! - [`firmware`] - device context, bring-up, superloop and config

#![warn(missing_docs)]

/// Model container, tensor arena and interpreter
pub use sigil_runtime as runtime;

/// Platform traits and implementations
pub use sigil_hal as hal;

/// Bring-up, superloop and configuration
pub use sigil_firmware as firmware;

/// Commonly used imports for working with the wand
pub mod prelude {
    pub use crate::firmware::{
        bring_up, run, safe_state, Device, FirmwareConfig, SetupError, GESTURE_MODEL,
    };
    pub use crate::hal::prelude::*;
    pub use crate::runtime::{
        ExecutionBackend, Interpreter, Model, OpKind, OpResolver, TensorArena,
    };
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
