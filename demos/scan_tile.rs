//! Tile scan example.
//!
//! Loads a scan configuration, opens the serial chain and visits every grid
//! point with a placeholder acquisition, logging each record.
//!
//! Usage: `cargo run --example scan_tile -- demos/tile.toml`
//! Set `RUST_LOG=debug` to see per-point wait estimates.

use std::process::ExitCode;

use stepper_scan::protocol::{PacketChannel, StdClock, StdDelay};
use stepper_scan::{load_config, GridPoint, MotionController, PointRecord, ScanEngine};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/tile.toml".to_string());

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> stepper_scan::Result<()> {
    let config = load_config(path)?;
    let grid = config.grid_points();
    log::info!(
        "{} points, {:.2} x {:.2} cm steps",
        grid.len(),
        config.grid.x_step_cm(),
        config.grid.y_step_cm()
    );

    let mut channel =
        PacketChannel::new(StdClock::new()).with_resync_gap(config.timing.resync_gap_ms);
    channel.open_port(config.port.as_str())?;

    let controller = MotionController::new(channel, StdDelay)
        .with_reply_policy(config.reply_policy())
        .with_settle_ms(config.timing.settle_ms);
    let mut engine = ScanEngine::new(controller, config.axes(), config.scan_options());

    // Stand-in for the instrument: report the target in cm.
    let axes = config.axes();
    let mut acquire = |_index: usize, point: GridPoint| -> Result<(f64, f64), ()> {
        Ok((
            point.x.to_cm(axes.x.microsteps_per_cm).value(),
            point.y.to_cm(axes.y.microsteps_per_cm).value(),
        ))
    };

    let mut sink = |record: PointRecord<'_, (f64, f64)>| -> Result<(), ()> {
        match record.measurement {
            Some((x, y)) => log::info!(
                "point {:>3}: ({:.2}, {:.2}) cm in {} ms",
                record.index,
                x,
                y,
                record.acquisition_ms
            ),
            None => log::warn!("point {:>3}: no measurement", record.index),
        }
        Ok(())
    };

    let result = engine.run(&grid, &mut acquire, &mut sink)?;
    log::info!(
        "done: {} completed, failed points {:?}",
        result.points_completed,
        result.points_failed
    );
    Ok(())
}
