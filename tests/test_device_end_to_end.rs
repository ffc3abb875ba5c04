// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end device scenarios through the umbrella crate: bring-up over the
//! packaged model, the superloop serial transcript, the invoke seam with a
//! scripted backend, and the safe-state path on a rejected model.

use ndarray::Array3;

use sigil::firmware::LED_PIN;
use sigil::prelude::*;
use sigil::runtime::{ElementType, ModelBuilder, RuntimeError, TensorDesc};

fn full_graph_builder() -> ModelBuilder {
    let mut builder = ModelBuilder::new();
    for op in OpKind::ALL {
        builder = builder.operator(op);
    }
    builder
}

#[test]
fn packaged_model_boots_and_loops() {
    let mut platform = MockPlatform::new();
    let mut device = bring_up(&mut platform, &GESTURE_MODEL, &FirmwareConfig::default()).unwrap();

    // The window the graph declares: 1 x 128 x 3 x 1 f32, 1536 bytes
    assert_eq!(device.input_length(), 384);
    assert_eq!(device.arena_used_bytes(), 1536);
    assert_eq!(platform.pin(LED_PIN), Some(false));

    device.step(&mut platform);
    device.step(&mut platform);
    device.step(&mut platform);
    assert_eq!(
        platform.serial_text(),
        "test\n\rinf_c: 1\n\rtest\n\rinf_c: 2\n\rtest\n\rinf_c: 3\n\r"
    );
    assert_eq!(device.inference_count(), 3);
}

#[test]
fn counter_wraps_after_a_full_cycle() {
    let mut platform = MockPlatform::new();
    let mut device = bring_up(&mut platform, &GESTURE_MODEL, &FirmwareConfig::default()).unwrap();

    run(&mut device, &mut platform, Some(100));

    assert_eq!(device.inference_count(), 0);
    let transcript = platform.serial_text();
    assert!(transcript.contains("inf_c: 100\n\r"));
    assert!(!transcript.contains("inf_c: 101"));
    assert_eq!(transcript.matches("test\n\r").count(), 100);
}

/// Scripted stand-in for the external engine: averages the window into the
/// first output element.
struct MeanBackend;

impl ExecutionBackend for MeanBackend {
    fn execute(
        &mut self,
        ctx: &mut sigil::runtime::InvokeContext<'_, '_>,
    ) -> Result<(), RuntimeError> {
        let sum: f32 = ctx.input_f32(0)?.iter().sum();
        let len = ctx.input_f32(0)?.len() as f32;
        ctx.output_f32_mut(0)?[0] = sum / len;
        Ok(())
    }
}

#[test]
fn capture_invoke_indicate_through_the_seams() {
    // The packaged model has no output head, so this scenario packs a graph
    // with one, the shape a trained classifier would declare
    let blob = full_graph_builder()
        .input(TensorDesc::new(ElementType::F32, &[1, 128, 3, 1]).unwrap())
        .output(TensorDesc::new(ElementType::F32, &[1, 4]).unwrap())
        .build()
        .unwrap();

    let mut platform = MockPlatform::new();
    let mut device = bring_up(&mut platform, &blob, &FirmwareConfig::default()).unwrap();

    // Synthesize one accelerometer window: 128 samples x 3 axes x 1
    let window = Array3::from_shape_fn((128, 3, 1), |(sample, axis, _)| {
        (sample as f32 / 128.0) + axis as f32
    });
    let flat: Vec<f32> = window.iter().copied().collect();
    device.input_window_mut().unwrap().copy_from_slice(&flat);

    device.invoke(&mut MeanBackend).unwrap();

    let expected: f32 = flat.iter().sum::<f32>() / flat.len() as f32;
    let score = device.output_window().unwrap()[0];
    assert!((score - expected).abs() < 1e-5);

    device.indicate(&mut platform, score > 0.5).unwrap();
    assert_eq!(platform.pin(LED_PIN), Some(true));
    device.indicate(&mut platform, false).unwrap();
    assert_eq!(platform.pin(LED_PIN), Some(false));
}

#[test]
fn rejected_model_never_reaches_the_loop() {
    let blob = full_graph_builder()
        .schema_version(11)
        .input(TensorDesc::new(ElementType::F32, &[1, 128, 3, 1]).unwrap())
        .build()
        .unwrap();

    let mut platform = MockPlatform::new();
    let err = bring_up(&mut platform, &blob, &FirmwareConfig::default()).unwrap_err();
    assert_eq!(err, SetupError::SchemaVersionMismatch { found: 11, supported: 3 });

    safe_state(&mut platform, &err);

    // Nothing ran: no serial output, LED parked low, failure logged
    assert!(platform.serial_bytes().is_empty());
    assert_eq!(platform.pin(LED_PIN), Some(false));
    assert!(platform
        .messages_at(LogLevel::Error)
        .iter()
        .any(|m| m.contains("schema version 11")));
}

#[test]
fn bad_window_shape_is_refused_at_bring_up() {
    let blob = full_graph_builder()
        .input(TensorDesc::new(ElementType::F32, &[1, 64, 3, 1]).unwrap())
        .build()
        .unwrap();

    let mut platform = MockPlatform::new();
    let err = bring_up(&mut platform, &blob, &FirmwareConfig::default()).unwrap_err();
    assert_eq!(err, SetupError::BadInputTensor);
    assert!(platform
        .messages_at(LogLevel::Error)
        .contains(&String::from("Bad input tensor parameters in model")));
}
