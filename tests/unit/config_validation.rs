//! Unit tests for configuration validation.

use stepper_scan::config::{parse_config, validate_config, ScanConfig};
use stepper_scan::error::{ConfigError, Error};

fn tile(x_unit: u8, y_unit: u8, x_max_cm: f64, steps_y: u16) -> String {
    format!(
        r#"
port = "/dev/ttyUSB0"

[axes.x]
unit_id = {x_unit}
range_microsteps = 8062992
microsteps_per_cm = 80629.92
ms_per_full_traverse = 100000.0

[axes.y]
unit_id = {y_unit}
range_microsteps = 4031496
microsteps_per_cm = 80629.92
ms_per_full_traverse = 50000.0

[grid]
x_origin_cm = 10.0
x_max_cm = {x_max_cm:.1}
steps_x = 4
y_origin_cm = 5.0
y_max_cm = 25.0
steps_y = {steps_y}
"#
    )
}

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let config: ScanConfig = toml::from_str(&tile(1, 2, 40.0, 3)).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test parse_config runs validation.
#[test]
fn test_parse_config_validates() {
    assert_eq!(
        parse_config(&tile(1, 1, 40.0, 3)).unwrap_err(),
        Error::Config(ConfigError::InvalidUnitId(1))
    );
}

/// Test validation fails for the broadcast unit id.
#[test]
fn test_broadcast_unit_rejected() {
    let config: ScanConfig = toml::from_str(&tile(0, 2, 40.0, 3)).expect("Failed to parse TOML");
    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidUnitId(0)))
    );
}

/// Test validation fails for a grid beyond the X travel.
#[test]
fn test_grid_beyond_travel_rejected() {
    let config: ScanConfig = toml::from_str(&tile(1, 2, 120.0, 3)).expect("Failed to parse TOML");
    assert!(matches!(
        validate_config(&config),
        Err(Error::Config(ConfigError::OutOfTravel { axis: "x", .. }))
    ));
}

/// Test validation fails for a single row.
#[test]
fn test_single_row_rejected() {
    let config: ScanConfig = toml::from_str(&tile(1, 2, 40.0, 1)).expect("Failed to parse TOML");
    assert_eq!(
        validate_config(&config),
        Err(Error::Config(ConfigError::InvalidStepCount { axis: "y", steps: 1 }))
    );
}
