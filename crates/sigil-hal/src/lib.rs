// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

#![no_std]
#![warn(missing_docs)]

//! # Sigil HAL
//!
//! Platform abstraction and implementations for the Sigil gesture wand.
//!
//! This crate provides:
//! - **HAL traits** (`hal` module) - Platform-agnostic time, serial, GPIO
//!   and logging abstractions the firmware is written against
//! - **Platform implementations** (`platforms` module) - A stdout-backed
//!   host simulator, a recording mock for tests, and adapters over
//!   `embedded-hal` pin types for real boards
//!
//! The firmware never names a concrete board. It takes any type satisfying
//! the trait bounds, so the same bring-up and loop code runs on hardware,
//! under the host simulator and inside the test suite.
//!
//! ## Feature Flags
//!
//! - `std` - `HostPlatform` and `MockPlatform`
//! - `embedded` - `OutputPinGpio` adapter over `embedded-hal`

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod hal;
pub mod platforms;

pub use hal::{GpioProvider, LogLevel, Logger, Platform, SerialIO, TimeProvider};

#[cfg(feature = "std")]
pub use platforms::{HostPlatform, MockIoError, MockPlatform};

#[cfg(feature = "embedded")]
pub use platforms::OutputPinGpio;

/// Commonly used imports for firmware code
pub mod prelude {
    pub use crate::hal::{GpioProvider, LogLevel, Logger, Platform, SerialIO, TimeProvider};

    #[cfg(feature = "std")]
    pub use crate::platforms::{HostPlatform, MockPlatform};

    #[cfg(feature = "embedded")]
    pub use crate::platforms::OutputPinGpio;
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
