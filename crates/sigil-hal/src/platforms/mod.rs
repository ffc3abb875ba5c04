//! Platform implementations
//!
//! Each platform module implements the HAL traits defined in `crate::hal`.
//!
//! Available platforms:
//! - Host simulator (std) - serial to stdout, simulated pin bank
//! - Recording mock (std) - captures serial, logs and pin writes for tests
//! - embedded-hal adapter (embedded) - wraps a board output pin

#[cfg(feature = "std")]
pub mod host;

#[cfg(feature = "std")]
pub mod mock;

#[cfg(feature = "embedded")]
pub mod output_pin;

// Future platforms
// #[cfg(feature = "esp32")]
// pub mod esp32;

// Re-export platform types
#[cfg(feature = "std")]
pub use host::HostPlatform;

#[cfg(feature = "std")]
pub use mock::{MockIoError, MockPlatform};

#[cfg(feature = "embedded")]
pub use output_pin::OutputPinGpio;
