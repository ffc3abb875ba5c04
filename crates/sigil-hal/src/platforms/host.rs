// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host simulator platform
//!
//! Runs the firmware on a workstation. The serial port writes to stdout,
//! GPIO lines live in a simulated pin bank, and log calls forward to the
//! `tracing` subscriber the binary installed.

use std::collections::HashMap;
use std::io::Write as _;
use std::time::{Duration, Instant};

use crate::hal::{GpioProvider, LogLevel, Logger, Platform, SerialIO, TimeProvider};

/// Workstation stand-in for a wand board
pub struct HostPlatform {
    start: Instant,
    pins: HashMap<u8, bool>,
}

impl HostPlatform {
    /// Initialize the host platform
    pub fn init() -> anyhow::Result<Self> {
        let platform = Self { start: Instant::now(), pins: HashMap::new() };
        tracing::debug!("host platform initialized");
        Ok(platform)
    }

    /// State of a simulated pin, `None` if it was never driven
    pub fn pin(&self, pin: u8) -> Option<bool> {
        self.pins.get(&pin).copied()
    }
}

impl TimeProvider for HostPlatform {
    fn get_time_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    fn delay_us(&self, us: u32) {
        std::thread::sleep(Duration::from_micros(us as u64));
    }
}

impl SerialIO for HostPlatform {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(data)?;
        Ok(data.len())
    }

    fn read(&mut self, _buffer: &mut [u8]) -> Result<usize, Self::Error> {
        // No UART wired on the host
        Ok(0)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::stdout().lock().flush()
    }
}

impl GpioProvider for HostPlatform {
    type Pin = u8;
    type Error = core::convert::Infallible;

    fn set_high(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        self.pins.insert(pin, true);
        Ok(())
    }

    fn set_low(&mut self, pin: Self::Pin) -> Result<(), Self::Error> {
        self.pins.insert(pin, false);
        Ok(())
    }

    fn is_high(&self, pin: Self::Pin) -> Result<bool, Self::Error> {
        Ok(self.pins.get(&pin).copied().unwrap_or(false))
    }
}

impl Logger for HostPlatform {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => tracing::error!("{}", message),
            LogLevel::Warn => tracing::warn!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Trace => tracing::trace!("{}", message),
        }
    }
}

impl Platform for HostPlatform {
    fn name(&self) -> &'static str {
        "host-sim"
    }

    fn cpu_frequency_hz(&self) -> u32 {
        // Nominal figure, the host does not emulate a clock
        1_000_000_000
    }

    fn available_memory_bytes(&self) -> usize {
        // Unmetered on the host
        usize::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pins_latch_their_last_write() {
        let mut platform = HostPlatform::init().unwrap();
        assert_eq!(platform.pin(7), None);
        platform.set_high(7).unwrap();
        assert!(platform.is_high(7).unwrap());
        platform.set_low(7).unwrap();
        assert!(platform.is_low(7).unwrap());
        assert_eq!(platform.pin(7), Some(false));
    }

    #[test]
    fn undriven_pin_reads_low() {
        let platform = HostPlatform::init().unwrap();
        assert!(!platform.is_high(3).unwrap());
    }

    #[test]
    fn time_is_monotonic() {
        let platform = HostPlatform::init().unwrap();
        let a = platform.get_time_us();
        platform.delay_us(100);
        let b = platform.get_time_us();
        assert!(b >= a);
    }
}
