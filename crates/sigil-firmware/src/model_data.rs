// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Packed gesture model embedded into the firmware image
//!
//! Regenerate with `cargo run --bin pack_model` after changing the graph
//! surface. The container describes what the runtime needs to plan tensors:
//! schema version 3, the five-operator graph, and one f32 input window of
//! shape `[1, 128, 3, 1]` (128 accelerometer samples, three axes). The
//! weight payload ships inside the engine library a board links, so the
//! container carries none.

/// Gesture model container, schema version 3
pub const GESTURE_MODEL: [u8; 54] = [
    // magic "SIGM", schema version 3
    b'S', b'I', b'G', b'M', 3, 0, 0, 0,
    // 5 operators, 1 input, 0 outputs, reserved
    5, 1, 0, 0,
    // payload length 0
    0, 0, 0, 0,
    // DepthwiseConv2D, MaxPool2D, Conv2D, FullyConnected, Softmax
    1, 0, 0, 0,
    2, 0, 0, 0,
    3, 0, 0, 0,
    4, 0, 0, 0,
    5, 0, 0, 0,
    // input: f32, rank 4, dims [1, 128, 3, 1]
    1, 4, 1, 0, 0, 0, 128, 0, 0, 0, 3, 0, 0, 0, 1, 0, 0, 0,
];
