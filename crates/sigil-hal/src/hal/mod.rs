//! Hardware Abstraction Layer (HAL) trait definitions
//!
//! This module defines platform-agnostic traits that must be implemented
//! by each platform to provide:
//! - Time management (TimeProvider)
//! - Serial I/O (SerialIO)
//! - GPIO control (GpioProvider)
//! - Logging (Logger)

pub mod gpio;
pub mod logger;
pub mod serial;
pub mod time;

// Re-export trait types
pub use gpio::GpioProvider;
pub use logger::{LogLevel, Logger};
pub use serial::SerialIO;
pub use time::TimeProvider;

/// Convenience trait combining common platform capabilities
///
/// A full wand board additionally implements [`SerialIO`] for the status
/// line and [`GpioProvider`] for the indicator LED.
pub trait Platform: TimeProvider + Logger {
    /// Get platform name (e.g., "host-sim", "mock")
    fn name(&self) -> &'static str;

    /// Get CPU frequency in Hz
    fn cpu_frequency_hz(&self) -> u32;

    /// Get available memory in bytes
    fn available_memory_bytes(&self) -> usize;

    /// Get platform uptime in milliseconds
    fn uptime_ms(&self) -> u64 {
        self.get_time_us() / 1000
    }
}
