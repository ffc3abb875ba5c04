// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Adapter exposing an `embedded-hal` output pin through [`GpioProvider`]
//!
//! Boards hand the firmware whatever pin type their HAL crate produces and
//! this wrapper makes it look like a one-pin bank. `embedded-hal` 1.0 reads
//! a pin's latched level through `&mut self`, so the adapter shadows the
//! last driven level itself and answers reads from that.

use embedded_hal::digital::OutputPin;

use crate::hal::GpioProvider;

/// One-pin GPIO bank over any `embedded-hal` output pin
///
/// The pin is driven low on construction so the indicator LED starts in a
/// known state.
pub struct OutputPinGpio<P: OutputPin> {
    pin: P,
    level: bool,
}

impl<P: OutputPin> OutputPinGpio<P> {
    /// Wrap a pin, driving it low first
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, level: false })
    }

    /// Give the wrapped pin back
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> GpioProvider for OutputPinGpio<P> {
    // A single pin, so the identifier carries no information
    type Pin = ();
    type Error = P::Error;

    fn set_high(&mut self, _pin: Self::Pin) -> Result<(), Self::Error> {
        self.pin.set_high()?;
        self.level = true;
        Ok(())
    }

    fn set_low(&mut self, _pin: Self::Pin) -> Result<(), Self::Error> {
        self.pin.set_low()?;
        self.level = false;
        Ok(())
    }

    fn is_high(&self, _pin: Self::Pin) -> Result<bool, Self::Error> {
        Ok(self.level)
    }
}
