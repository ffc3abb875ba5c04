// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Recording mock platform for tests
//!
//! Captures everything the firmware does: serial bytes, log calls, pin
//! writes. Time is a counter that only moves when `delay_us` is called, so
//! tests are deterministic. Serial writes can be made to fail on demand to
//! exercise the firmware's degraded paths.

use core::cell::{Cell, RefCell};
use core::fmt;
use std::collections::{HashMap, VecDeque};
use std::string::String;
use std::vec::Vec;

use crate::hal::{GpioProvider, LogLevel, Logger, Platform, SerialIO, TimeProvider};

/// Error injected into serial calls by [`MockPlatform::fail_serial_writes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockIoError;

impl fmt::Display for MockIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("injected mock serial failure")
    }
}

impl std::error::Error for MockIoError {}

/// Recording stand-in for a wand board
#[derive(Default)]
pub struct MockPlatform {
    now_us: Cell<u64>,
    serial_tx: Vec<u8>,
    serial_rx: VecDeque<u8>,
    fail_serial: bool,
    logs: RefCell<Vec<(LogLevel, String)>>,
    pins: HashMap<u8, bool>,
}

impl MockPlatform {
    /// Fresh mock with nothing recorded and the clock at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following serial write and flush fail
    pub fn fail_serial_writes(&mut self, fail: bool) {
        self.fail_serial = fail;
    }

    /// Queue bytes for the firmware to read from serial
    pub fn queue_rx(&mut self, data: &[u8]) {
        self.serial_rx.extend(data.iter().copied());
    }

    /// Everything written to serial so far
    pub fn serial_bytes(&self) -> &[u8] {
        &self.serial_tx
    }

    /// Everything written to serial so far, lossily decoded as UTF-8
    pub fn serial_text(&self) -> String {
        String::from_utf8_lossy(&self.serial_tx).into_owned()
    }

    /// Every log call recorded so far
    pub fn logs(&self) -> Vec<(LogLevel, String)> {
        self.logs.borrow().clone()
    }

    /// Messages recorded at one level
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.logs
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// State of a pin, `None` if it was never driven
    pub fn pin(&self, pin: u8) -> Option<bool> {
        self.pins.get(&pin).copied()
    }
}

impl TimeProvider for MockPlatform {
    fn get_time_us(&self) -> u64 {
        self.now_us.get()
    }

    fn delay_us(&self, us: u32) {
        self.now_us.set(self.now_us.get() + us as u64);
    }
}

impl SerialIO for MockPlatform {
    type Error = MockIoError;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_serial {
            return Err(MockIoError);
        }
        self.serial_tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let mut count = 0;
        while count < buffer.len() {
            match self.serial_rx.pop_front() {
                Some(byte) => {
                    buffer[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.fail_serial {
            return Err(MockIoError);
        }
        Ok(())
    }

    fn available(&self) -> Result<bool, Self::Error> {
        Ok(!self.serial_rx.is_empty())
    }
}

impl GpioProvider for MockPlatform {
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

impl Logger for MockPlatform {
    fn log(&self, level: LogLevel, message: &str) {
        self.logs.borrow_mut().push((level, String::from(message)));
    }
}

impl Platform for MockPlatform {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn cpu_frequency_hz(&self) -> u32 {
        160_000_000
    }

    fn available_memory_bytes(&self) -> usize {
        520 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_serial_writes() {
        let mut mock = MockPlatform::new();
        mock.write(b"test\n\r").unwrap();
        mock.write(b"more").unwrap();
        assert_eq!(mock.serial_bytes(), b"test\n\rmore");
        assert_eq!(mock.serial_text(), "test\n\rmore");
    }

    #[test]
    fn injected_serial_failure_surfaces() {
        let mut mock = MockPlatform::new();
        mock.fail_serial_writes(true);
        assert_eq!(mock.write(b"x").unwrap_err(), MockIoError);
        assert!(mock.serial_bytes().is_empty());
    }

    #[test]
    fn reads_drain_queued_bytes() {
        let mut mock = MockPlatform::new();
        mock.queue_rx(b"abc");
        assert!(mock.available().unwrap());
        let mut buffer = [0u8; 2];
        assert_eq!(mock.read(&mut buffer).unwrap(), 2);
        assert_eq!(&buffer, b"ab");
        assert_eq!(mock.read(&mut buffer).unwrap(), 1);
        assert!(!mock.available().unwrap());
    }

    #[test]
    fn records_logs_by_level() {
        let mock = MockPlatform::new();
        mock.error("boom");
        mock.info("fine");
        assert_eq!(mock.messages_at(LogLevel::Error), ["boom"]);
        assert_eq!(mock.messages_at(LogLevel::Info), ["fine"]);
        assert_eq!(mock.logs().len(), 2);
    }

    #[test]
    fn clock_moves_only_through_delay() {
        let mock = MockPlatform::new();
        assert_eq!(mock.get_time_us(), 0);
        mock.delay_ms(2);
        assert_eq!(mock.get_time_us(), 2000);
        assert_eq!(mock.uptime_ms(), 2);
    }

    #[test]
    fn pins_latch_their_last_write() {
        let mut mock = MockPlatform::new();
        assert_eq!(mock.pin(0x6C), None);
        mock.set_high(0x6C).unwrap();
        assert_eq!(mock.pin(0x6C), Some(true));
        mock.toggle(0x6C).unwrap();
        assert_eq!(mock.pin(0x6C), Some(false));
    }
}
