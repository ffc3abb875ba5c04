// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Model Packing Tool

Packs the gesture model container the firmware embeds and checks the
embedded copy against it.

Usage:
  cargo run --bin pack_model -- <output.bin>        # raw container bytes
  cargo run --bin pack_model -- <output.rs> --rust  # Rust array source

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

use std::env;
use std::fmt::Write as _;
use std::fs;

use sigil::firmware::GESTURE_MODEL;
use sigil::runtime::{ElementType, Model, ModelBuilder, OpKind, TensorDesc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <output> [--rust]", args[0]);
        eprintln!("\nExample:");
        eprintln!("  {} gesture_model.bin", args[0]);
        eprintln!("  {} model_data.rs --rust", args[0]);
        std::process::exit(1);
    }

    let output_path = &args[1];
    let as_rust = args.get(2).map(|s| s == "--rust").unwrap_or(false);

    println!("Packing gesture model container...");
    let blob = ModelBuilder::new()
        .operator(OpKind::DepthwiseConv2d)
        .operator(OpKind::MaxPool2d)
        .operator(OpKind::Conv2d)
        .operator(OpKind::FullyConnected)
        .operator(OpKind::Softmax)
        .input(TensorDesc::new(ElementType::F32, &[1, 128, 3, 1])?)
        .build()?;

    // Read the container back so a packing bug never reaches a device
    let model = Model::from_bytes(&blob)?;
    println!(
        "  schema version {}, {} operators, input {:?}, {} bytes",
        model.schema_version(),
        model.operator_count(),
        model.input_desc(0)?.dims(),
        blob.len()
    );

    if blob.as_slice() == GESTURE_MODEL {
        println!("  embedded copy in sigil-firmware is current");
    } else {
        println!("  WARNING: embedded copy in sigil-firmware differs, update model_data.rs");
    }

    if as_rust {
        let mut source = String::new();
        writeln!(source, "/// Gesture model container, schema version {}", model.schema_version())?;
        writeln!(source, "pub const GESTURE_MODEL: [u8; {}] = [", blob.len())?;
        for chunk in blob.chunks(12) {
            let line: Vec<String> = chunk.iter().map(|b| b.to_string()).collect();
            writeln!(source, "    {},", line.join(", "))?;
        }
        writeln!(source, "];")?;
        fs::write(output_path, source)?;
    } else {
        fs::write(output_path, &blob)?;
    }

    println!("Wrote {}", output_path);
    Ok(())
}
