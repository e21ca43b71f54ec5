//! Unit tests for TOML configuration parsing.

use stepper_scan::config::{load_config, Centimeters, Microsteps, ScanConfig, TimingConfig};
use stepper_scan::error::{ConfigError, Error};

const AXES: &str = r#"
[axes.x]
unit_id = 1
range_microsteps = 8062992
microsteps_per_cm = 80629.92
ms_per_full_traverse = 100000.0

[axes.y]
unit_id = 2
range_microsteps = 4031496
microsteps_per_cm = 80629.92
ms_per_full_traverse = 50000.0
"#;

const GRID: &str = r#"
[grid]
x_origin_cm = 10.0
x_max_cm = 40.0
steps_x = 4
y_origin_cm = 5.0
y_max_cm = 25.0
steps_y = 3
"#;

fn tile(extra: &str) -> String {
    format!("port = \"/dev/ttyUSB0\"\n{}{}{}", AXES, GRID, extra)
}

/// Test parsing axes and grid from TOML.
#[test]
fn test_parse_axes_and_grid() {
    let config: ScanConfig = toml::from_str(&tile("")).expect("Failed to parse TOML");

    assert_eq!(config.port.as_str(), "/dev/ttyUSB0");
    assert_eq!(config.axes.x.unit_id, 1);
    assert_eq!(config.axes.y.range, Microsteps(4_031_496));
    assert_eq!(config.axes.y.ms_per_full_traverse, 50_000.0);
    assert_eq!(config.grid.x_origin, Centimeters(10.0));
    assert_eq!(config.grid.steps_y, 3);
}

/// Test the timing table falls back to defaults.
#[test]
fn test_timing_defaults() {
    let config: ScanConfig = toml::from_str(&tile("")).expect("Failed to parse TOML");
    assert_eq!(config.timing, TimingConfig::default());
    assert_eq!(config.timing.settle_ms, 1500);
    assert_eq!(config.timing.resync_gap_ms, 500);

    let policy = config.reply_policy();
    assert_eq!(policy.timeout_ms, 2000);
    assert_eq!(policy.retries, 3);
}

/// Test partial timing overrides keep the other defaults.
#[test]
fn test_timing_partial_override() {
    let config: ScanConfig = toml::from_str(&tile(
        r#"
[timing]
reply_timeout_ms = 750
tolerance_microsteps = 25
"#,
    ))
    .expect("Failed to parse TOML");

    assert_eq!(config.timing.reply_timeout_ms, 750);
    assert_eq!(config.timing.dwell_ms, 500);

    let options = config.scan_options();
    assert_eq!(options.tolerance, 25);
    assert_eq!(options.dwell_ms, 500);
}

/// Test a missing table is a parse error.
#[test]
fn test_missing_grid_rejected() {
    let toml_str = format!("port = \"/dev/ttyUSB0\"\n{}", AXES);
    let result: Result<ScanConfig, _> = toml::from_str(&toml_str);
    assert!(result.is_err());
}

/// Test loading from a file that does not exist.
#[test]
fn test_load_missing_file() {
    let result = load_config("/nonexistent/tile.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}

/// Test loading the demo configuration shipped with the crate.
#[test]
fn test_load_demo_config() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/tile.toml");
    let config = load_config(path).expect("demo config should load");
    assert_eq!(config.grid_points().len(), 16);
    assert_eq!(config.timing.dwell_ms, 500);
}
