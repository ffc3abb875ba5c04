// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Device bring-up and the superloop
//!
//! [`bring_up`] runs once at power-on: validate the embedded model, register
//! the five-operator gesture set, plan tensors over the fixed arena and check
//! the input window the graph declares. Every failure is reported through the
//! platform logger *and* returned as a [`SetupError`], so a caller can only
//! reach the loop with a fully initialized [`Device`]. On failure the caller
//! drops to [`safe_state`] instead of running an uninitialized board.
//!
//! [`Device::step`] is one superloop iteration: emit the status marker,
//! advance the inference counter, emit it, wrap at the configured
//! inferences-per-cycle. What a cycle should *infer* - capturing an
//! accelerometer window, invoking the graph, acting on the prediction - is
//! not specified for this board yet. The seams are [`Device::input_window_mut`],
//! [`Device::invoke`] and [`Device::indicate`]; the loop does not call them.

use core::fmt;

use sigil_hal::{GpioProvider, Logger, SerialIO};
use sigil_runtime::{
    ElementType, Interpreter, Model, ModelError, OpKind, OpResolver, RuntimeError, TensorArena,
    SUPPORTED_SCHEMA_VERSION,
};

use crate::config::FirmwareConfig;

//region Constants

/// Tensor arena budget, the minimum the gesture graph plans into
pub const TENSOR_ARENA_SIZE: usize = 30 * 1024;

/// Rank the input window must have
pub const INPUT_RANK: usize = 4;

/// Accelerometer samples per input window
pub const SEQUENCE_LENGTH: u32 = 128;

/// Accelerometer axes per sample
pub const CHANNEL_COUNT: u32 = 3;

/// Pin driving the gesture indicator LED
pub const LED_PIN: u8 = 0x6C;

//endregion

/// Errors raised during device bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    /// Embedded model container failed structural verification
    Model(ModelError),
    /// Model was packed for a schema version this runtime does not support
    SchemaVersionMismatch {
        /// Version the container reports
        found: u32,
        /// Version the runtime supports
        supported: u32,
    },
    /// Tensor planning over the arena failed
    Allocate(RuntimeError),
    /// Input tensor does not match the window the gesture graph needs
    BadInputTensor,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Model(e) => write!(f, "Model container rejected: {}", e),
            SetupError::SchemaVersionMismatch { found, supported } => write!(
                f,
                "Model provided is schema version {} not equal to supported version {}.",
                found, supported
            ),
            SetupError::Allocate(e) => write!(f, "allocate_tensors() failed: {}", e),
            SetupError::BadInputTensor => write!(f, "Bad input tensor parameters in model"),
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for SetupError {}

impl From<ModelError> for SetupError {
    fn from(e: ModelError) -> Self {
        SetupError::Model(e)
    }
}

/// The initialized wand, everything a sketch would keep in globals
///
/// Owns the interpreter (and through it the tensor arena) plus the loop
/// counters. Only [`bring_up`] produces one, so holding a `Device` is proof
/// that setup succeeded.
#[derive(Debug)]
pub struct Device<'m> {
    interpreter: Interpreter<'m, TENSOR_ARENA_SIZE>,
    input_length: usize,
    inference_count: u32,
    inferences_per_cycle: u32,
}

/// The operator set the gesture graph requires, fully registered
pub fn gesture_resolver() -> OpResolver<5> {
    let mut resolver = OpResolver::new();
    for op in OpKind::ALL {
        // Capacity equals the operator count, the pushes cannot fail
        let _ = resolver.register(op);
    }
    resolver
}

/// Bring the device up over an embedded model blob
///
/// Failures are logged through the platform and returned. The indicator LED
/// is driven to a known-low state once setup succeeds.
pub fn bring_up<'m, P>(
    platform: &mut P,
    model_bytes: &'m [u8],
    config: &FirmwareConfig,
) -> Result<Device<'m>, SetupError>
where
    P: Logger + GpioProvider<Pin = u8>,
{
    let model = match Model::from_bytes(model_bytes) {
        Ok(model) => model,
        Err(e) => {
            report(platform, format_args!("{}", SetupError::Model(e)));
            return Err(SetupError::Model(e));
        }
    };

    // Version gate comes first so an incompatible blob is reported before
    // any operator or tensor checks touch it
    if model.schema_version() != SUPPORTED_SCHEMA_VERSION {
        let err = SetupError::SchemaVersionMismatch {
            found: model.schema_version(),
            supported: SUPPORTED_SCHEMA_VERSION,
        };
        report(platform, format_args!("{}", err));
        return Err(err);
    }

    let resolver = gesture_resolver();
    let mut interpreter = Interpreter::new(model, &resolver, TensorArena::new());

    if let Err(e) = interpreter.allocate_tensors() {
        report(platform, format_args!("{}", SetupError::Allocate(e)));
        return Err(SetupError::Allocate(e));
    }

    let input = match interpreter.input(0) {
        Ok(desc) => desc,
        Err(e) => {
            report(platform, format_args!("{}", SetupError::Allocate(e)));
            return Err(SetupError::Allocate(e));
        }
    };

    // The checks the original board firmware made: rank, batch, window
    // length, axis count, element type. The trailing dimension is free.
    if input.rank() != INPUT_RANK
        || input.dim(0) != Some(1)
        || input.dim(1) != Some(SEQUENCE_LENGTH)
        || input.dim(2) != Some(CHANNEL_COUNT)
        || input.element_type() != ElementType::F32
    {
        report(platform, format_args!("{}", SetupError::BadInputTensor));
        return Err(SetupError::BadInputTensor);
    }

    let input_length = match input.byte_len() {
        Ok(bytes) => bytes / core::mem::size_of::<f32>(),
        Err(e) => {
            report(platform, format_args!("{}", SetupError::Model(e)));
            return Err(SetupError::Model(e));
        }
    };

    if platform.set_low(LED_PIN).is_err() {
        platform.warn("indicator LED did not take the initial low state");
    }

    Ok(Device {
        interpreter,
        input_length,
        inference_count: 0,
        inferences_per_cycle: config.superloop.inferences_per_cycle,
    })
}

impl<'m> Device<'m> {
    /// Elements in the input window, its byte length over `f32`
    pub fn input_length(&self) -> usize {
        self.input_length
    }

    /// Inference counter as last emitted, zero after a wrap
    pub fn inference_count(&self) -> u32 {
        self.inference_count
    }

    /// Arena bytes the tensor plan consumed
    pub fn arena_used_bytes(&self) -> usize {
        self.interpreter.arena_used_bytes()
    }

    /// The input window as planned f32 storage
    pub fn input_window(&self) -> Result<&[f32], RuntimeError> {
        self.interpreter.input_f32(0)
    }

    /// Writable input window, where a capture source places its samples
    pub fn input_window_mut(&mut self) -> Result<&mut [f32], RuntimeError> {
        self.interpreter.input_f32_mut(0)
    }

    /// First output tensor, present only on graphs with a classifier head
    ///
    /// The packaged gesture model declares none, so this errors on it.
    pub fn output_window(&self) -> Result<&[f32], RuntimeError> {
        self.interpreter.output_f32(0)
    }

    /// Run the graph once through an execution backend
    ///
    /// The superloop does not call this yet, the capture source that would
    /// feed it is unspecified for this board.
    pub fn invoke(
        &mut self,
        backend: &mut dyn sigil_runtime::ExecutionBackend,
    ) -> Result<(), RuntimeError> {
        self.interpreter.invoke(backend)
    }

    /// Drive the indicator LED from a classification result
    pub fn indicate<P: GpioProvider<Pin = u8>>(
        &self,
        gpio: &mut P,
        detected: bool,
    ) -> Result<(), P::Error> {
        if detected {
            gpio.set_high(LED_PIN)
        } else {
            gpio.set_low(LED_PIN)
        }
    }

    /// One superloop iteration
    ///
    /// Emits the status marker and the incremented inference counter over
    /// serial, then wraps the counter once it reaches the configured
    /// inferences-per-cycle. A failed serial write drops the line and the
    /// loop carries on.
    pub fn step<P: SerialIO + Logger>(&mut self, platform: &mut P) {
        emit(platform, format_args!("test\n\r"));
        self.inference_count += 1;
        emit(platform, format_args!("inf_c: {}\n\r", self.inference_count));
        if self.inference_count >= self.inferences_per_cycle {
            self.inference_count = 0;
        }
    }
}

/// Drive the superloop, forever or for a bounded number of iterations
///
/// Boards pass `None`. The host simulator and tests bound the loop.
pub fn run<P: SerialIO + Logger>(device: &mut Device<'_>, platform: &mut P, cycles: Option<u64>) {
    match cycles {
        Some(count) => {
            for _ in 0..count {
                device.step(platform);
            }
        }
        None => loop {
            device.step(platform);
        },
    }
}

/// Park a board whose bring-up failed
///
/// Logs the failure and holds the indicator LED low. The caller decides what
/// happens next (a board typically halts, the host simulator exits nonzero).
pub fn safe_state<P>(platform: &mut P, error: &SetupError)
where
    P: Logger + GpioProvider<Pin = u8>,
{
    report(platform, format_args!("bring-up failed, entering safe state: {}", error));
    if platform.set_low(LED_PIN).is_err() {
        platform.warn("indicator LED did not take the safe low state");
    }
}

// Format through a fixed buffer, the device has no allocator. Overlong
// messages truncate rather than fail.
fn report<P: Logger + ?Sized>(platform: &P, args: fmt::Arguments<'_>) {
    let mut line = heapless::String::<160>::new();
    let _ = fmt::write(&mut line, args);
    platform.error(&line);
}

fn emit<P: SerialIO + Logger>(platform: &mut P, args: fmt::Arguments<'_>) {
    let mut line = heapless::String::<32>::new();
    if fmt::write(&mut line, args).is_err() {
        platform.warn("status line overflowed its buffer, dropped");
        return;
    }
    let mut rest = line.as_bytes();
    while !rest.is_empty() {
        match platform.write(rest) {
            Ok(0) => {
                platform.warn("serial sink accepted no bytes, status line dropped");
                return;
            }
            Ok(written) => rest = &rest[written..],
            Err(_) => {
                platform.warn("serial write failed, status line dropped");
                return;
            }
        }
    }
}
