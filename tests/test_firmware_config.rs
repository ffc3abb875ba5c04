// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration flow through the umbrella crate: a TOML file loaded on the
//! host changes the superloop wrap point the device runs with.

use std::io::Write as _;

use sigil::firmware::load_config;
use sigil::prelude::*;

#[test]
fn loaded_config_drives_the_wrap_point() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[loop]\ninferences_per_cycle = 4").unwrap();
    let config = load_config(file.path()).unwrap();

    let mut platform = MockPlatform::new();
    let mut device = bring_up(&mut platform, &GESTURE_MODEL, &config).unwrap();

    run(&mut device, &mut platform, Some(4));
    assert_eq!(device.inference_count(), 0);
    assert!(platform.serial_text().contains("inf_c: 4\n\r"));

    run(&mut device, &mut platform, Some(1));
    assert_eq!(device.inference_count(), 1);
}

#[test]
fn default_config_matches_the_device_build() {
    let config = FirmwareConfig::default();
    config.validate().unwrap();
    assert_eq!(config.superloop.inferences_per_cycle, 100);
}
