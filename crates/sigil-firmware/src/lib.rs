// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

#![no_std]
#![warn(missing_docs)]

//! # Sigil Firmware
//!
//! Bring-up and superloop for the Sigil gesture wand.
//!
//! This crate provides:
//! - **Device context** (`device` module) - [`Device`] owns the interpreter,
//!   its tensor arena and the loop counters, replacing the file-scope globals
//!   a sketch-style firmware would use
//! - **Bring-up** - [`bring_up`] validates the embedded model, registers the
//!   operator set, plans tensors and checks the input window, returning a
//!   typed [`SetupError`] on any failure so the loop never runs half
//!   initialized
//! - **Superloop** - [`Device::step`] emits the status lines over serial and
//!   advances the inference counter; [`run`] drives it forever or for a
//!   bounded number of cycles
//! - **Config** (`config` module) - [`FirmwareConfig`] with a TOML loader on
//!   `std`
//! - **Model blob** (`model_data` module) - the packed gesture model the
//!   device build embeds
//!
//! The per-cycle inference itself (sensor window capture, invoke, acting on
//! the prediction) is deliberately not wired into the loop. The seams for it
//! exist - [`Device::input_window_mut`], [`Device::invoke`] and
//! [`Device::indicate`] - and tests exercise them, but the loop only emits
//! its counter until a capture source is specified.
//!
//! ## Feature Flags
//!
//! - `std` - TOML config loading, `std::error::Error` impls, and the host
//!   simulator binary

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod config;
pub mod device;
pub mod model_data;

pub use config::FirmwareConfig;
pub use device::{
    bring_up, gesture_resolver, run, safe_state, Device, SetupError, CHANNEL_COUNT, INPUT_RANK,
    LED_PIN, SEQUENCE_LENGTH, TENSOR_ARENA_SIZE,
};
pub use model_data::GESTURE_MODEL;

#[cfg(feature = "std")]
pub use config::{load_config, ConfigError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
