//! Raster scan execution.
//!
//! Visits each grid point in order: query both axes, command X then Y, sleep
//! for the longer of the two estimated move times, verify arrival, acquire,
//! persist. No hardware signal marks the end of a move, so the estimate plus
//! verification is the only synchronization.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use crate::config::{AxisPair, GridPoint};
use crate::error::{debug_message, Error, MotionError, Result, ScanError};
use crate::motion::StepWait;
use crate::motor::MotionController;
use crate::protocol::{Clock, Transport};

use super::collaborators::{Acquire, PointRecord, PointSink};
use super::state::{ScanOptions, ScanPhase, ScanResult, ScanState};

/// Check a grid against the travel of both axes.
///
/// # Errors
///
/// Returns `ScanError::EmptyGrid`, or `ScanError::BoundsViolation` for the
/// first coordinate outside the open interval (0, range) of its axis.
pub fn validate_grid(grid: &[GridPoint], axes: &AxisPair) -> Result<()> {
    if grid.is_empty() {
        return Err(ScanError::EmptyGrid.into());
    }

    for (index, point) in grid.iter().enumerate() {
        for (axis, unit, value) in [("x", &axes.x, point.x), ("y", &axes.y, point.y)] {
            if !unit.contains(value) {
                return Err(ScanError::BoundsViolation {
                    index,
                    axis,
                    value: value.0,
                    range: unit.range.0,
                }
                .into());
            }
        }
    }
    Ok(())
}

/// Scan engine owning the motion controller for one chain.
pub struct ScanEngine<T, C, D>
where
    T: Transport,
    C: Clock,
    D: DelayNs,
{
    controller: MotionController<T, C, D>,
    axes: AxisPair,
    options: ScanOptions,
    state: ScanState,
    phase: ScanPhase,
}

impl<T, C, D> ScanEngine<T, C, D>
where
    T: Transport,
    C: Clock,
    D: DelayNs,
{
    /// Create an engine. The controller's channel must already be open.
    pub fn new(controller: MotionController<T, C, D>, axes: AxisPair, options: ScanOptions) -> Self {
        Self {
            controller,
            axes,
            options,
            state: ScanState::default(),
            phase: ScanPhase::Init,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Progress of the current or last scan.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// The owned controller.
    pub fn controller(&self) -> &MotionController<T, C, D> {
        &self.controller
    }

    /// Give back the controller.
    pub fn into_controller(self) -> MotionController<T, C, D> {
        self.controller
    }

    /// Run a full raster over `grid`.
    ///
    /// The channel is closed when this returns, on success or failure.
    ///
    /// # Errors
    ///
    /// Returns `ScanError::EmptyGrid` or `ScanError::BoundsViolation` before
    /// any traffic, `MotionError::ReplyTimeout` when a unit stops answering,
    /// `ScanError::Sink` when a record cannot be stored, or a channel error.
    pub fn run<A, S>(&mut self, grid: &[GridPoint], acquire: &mut A, sink: &mut S) -> Result<ScanResult>
    where
        A: Acquire,
        S: PointSink<A::Measurement>,
    {
        let never = AtomicBool::new(false);
        self.run_until(grid, acquire, sink, &never)
    }

    /// Like [`run`](Self::run), stopping after the current point once
    /// `cancel` is set. A cancelled scan does not return to the first point.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_until<A, S>(
        &mut self,
        grid: &[GridPoint],
        acquire: &mut A,
        sink: &mut S,
        cancel: &AtomicBool,
    ) -> Result<ScanResult>
    where
        A: Acquire,
        S: PointSink<A::Measurement>,
    {
        let outcome = self.execute(grid, acquire, sink, cancel);

        self.controller.close();
        self.phase = ScanPhase::Closed;

        match &outcome {
            Ok(result) => log::info!(
                "scan finished: {} completed, {} failed{}",
                result.points_completed,
                result.points_failed.len(),
                if result.cancelled { " (cancelled)" } else { "" }
            ),
            Err(e) => log::error!("scan aborted: {}", e),
        }
        outcome
    }

    fn execute<A, S>(
        &mut self,
        grid: &[GridPoint],
        acquire: &mut A,
        sink: &mut S,
        cancel: &AtomicBool,
    ) -> Result<ScanResult>
    where
        A: Acquire,
        S: PointSink<A::Measurement>,
    {
        self.phase = ScanPhase::Init;
        self.state = ScanState::default();
        validate_grid(grid, &self.axes)?;

        self.phase = ScanPhase::Homing;
        self.controller.renumber_chain()?;
        let home = self.read_position()?;
        self.state = ScanState::at(home);
        log::info!(
            "scanning {} points from ({}, {})",
            grid.len(),
            home.x,
            home.y
        );

        for (index, &point) in grid.iter().enumerate() {
            self.visit(index, point, acquire, sink)?;

            if cancel.load(Ordering::Acquire) {
                log::info!("scan cancelled after point {}", index);
                return Ok(self.state.result(true));
            }
        }

        self.phase = ScanPhase::Returning;
        let first = grid[0];
        self.controller.move_absolute(self.axes.x.id, first.x)?;
        self.controller.move_absolute(self.axes.y.id, first.y)?;
        self.state.target = None;

        Ok(self.state.result(false))
    }

    fn visit<A, S>(
        &mut self,
        index: usize,
        point: GridPoint,
        acquire: &mut A,
        sink: &mut S,
    ) -> Result<()>
    where
        A: Acquire,
        S: PointSink<A::Measurement>,
    {
        self.phase = ScanPhase::Iterating;
        self.state.target = Some(point);

        let current = self.read_position()?;
        self.state.position = current;

        let wait = StepWait::between(&self.axes, current, point);
        let wait_ms = wait.wait_ms();
        log::debug!(
            "point {}: ({}, {}) estimates x={:.1} ms y={:.1} ms, waiting {} ms",
            index,
            point.x,
            point.y,
            wait.x_ms,
            wait.y_ms,
            wait_ms
        );

        self.controller.move_absolute(self.axes.x.id, point.x)?;
        self.controller.move_absolute(self.axes.y.id, point.y)?;
        self.controller.pause_ms(wait_ms);

        let arrived = match self.verify_arrival(point) {
            Ok(()) => true,
            Err(Error::Motion(e @ MotionError::MotionMismatch { .. })) => {
                log::warn!("point {} skipped: {}", index, e);
                false
            }
            Err(e) => return Err(e),
        };

        let mut acquisition_ms = 0;
        let measurement = if arrived {
            self.phase = ScanPhase::Acquiring;
            let started = self.controller.now_ms();
            let measurement = match acquire.acquire(index, point) {
                Ok(m) => Some(m),
                Err(e) => {
                    log::warn!("acquisition failed at point {}: {:?}", index, e);
                    None
                }
            };
            acquisition_ms = self.controller.now_ms().saturating_sub(started);

            if self.options.dwell_ms > 0 {
                self.controller.pause_ms(self.options.dwell_ms);
            }
            measurement
        } else {
            None
        };

        self.phase = ScanPhase::Advancing;
        sink.persist(PointRecord {
            index,
            point,
            measurement: measurement.as_ref(),
            acquisition_ms,
        })
        .map_err(|e| ScanError::Sink(debug_message(&e)))?;

        if measurement.is_some() {
            self.state.completed += 1;
        } else {
            self.state.failed.insert(index);
        }
        Ok(())
    }

    fn read_position(&mut self) -> Result<GridPoint> {
        let x = self.controller.get_position(self.axes.x.id)?;
        let y = self.controller.get_position(self.axes.y.id)?;
        Ok(GridPoint { x, y })
    }

    /// Query both axes, record what they report, then compare against the
    /// target. X is reported first when both miss.
    fn verify_arrival(&mut self, point: GridPoint) -> Result<()> {
        let reported = self.read_position()?;
        self.state.position = reported;

        let tolerance = self.options.tolerance;
        for (unit, target, actual) in [
            (self.axes.x.id, point.x, reported.x),
            (self.axes.y.id, point.y, reported.y),
        ] {
            if actual.distance(target) > tolerance {
                return Err(MotionError::MotionMismatch {
                    unit,
                    target: target.0,
                    actual: actual.0,
                    tolerance,
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Run one scan with default options, consuming the controller.
///
/// # Errors
///
/// See [`ScanEngine::run`].
pub fn run_scan<T, C, D, A, S>(
    controller: MotionController<T, C, D>,
    grid: &[GridPoint],
    axes: AxisPair,
    mut acquire: A,
    mut sink: S,
) -> Result<ScanResult>
where
    T: Transport,
    C: Clock,
    D: DelayNs,
    A: Acquire,
    S: PointSink<A::Measurement>,
{
    ScanEngine::new(controller, axes, ScanOptions::default()).run(grid, &mut acquire, &mut sink)
}
