// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host simulator for the Sigil gesture wand
//!
//! Runs the exact bring-up and superloop a board runs, on a workstation:
//! serial goes to stdout, the indicator LED lives in a simulated pin bank,
//! logs go to the installed `tracing` subscriber.
//!
//! Usage:
//!   sigil-firmware [--model <blob>] [--config <toml>] [--cycles <n>]
//!
//! With no arguments the embedded gesture model and the default config run
//! forever, just as on hardware. `--cycles` bounds the loop so the simulator
//! terminates.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tracing_subscriber::EnvFilter;

use sigil_firmware::{bring_up, run, safe_state, FirmwareConfig, GESTURE_MODEL};
use sigil_hal::{HostPlatform, Platform};

struct Args {
    model: Option<PathBuf>,
    config: Option<PathBuf>,
    cycles: Option<u64>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { model: None, config: None, cycles: None };
    let mut iter = env::args().skip(1);
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--model" => {
                let value = iter.next().context("--model needs a path")?;
                args.model = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(value));
            }
            "--cycles" => {
                let value = iter.next().context("--cycles needs a count")?;
                args.cycles = Some(value.parse().context("--cycles needs an integer")?);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: sigil-firmware [--model <blob>] [--config <toml>] [--cycles <n>]"
                );
                std::process::exit(0);
            }
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(args)
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => sigil_firmware::load_config(path)?,
        None => FirmwareConfig::default(),
    };

    let model_bytes = match &args.model {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read model blob {}", path.display()))?,
        None => GESTURE_MODEL.to_vec(),
    };

    let mut platform = HostPlatform::init()?;
    tracing::info!(
        platform = platform.name(),
        model_bytes = model_bytes.len(),
        "starting bring-up"
    );

    let mut device = match bring_up(&mut platform, &model_bytes, &config) {
        Ok(device) => device,
        Err(e) => {
            safe_state(&mut platform, &e);
            return Ok(ExitCode::FAILURE);
        }
    };

    tracing::info!(
        input_length = device.input_length(),
        arena_used = device.arena_used_bytes(),
        "bring-up complete, entering superloop"
    );

    run(&mut device, &mut platform, args.cycles);
    Ok(ExitCode::SUCCESS)
}
