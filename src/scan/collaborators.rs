//! Acquisition and persistence hooks called by the scan engine.

use core::convert::Infallible;
use core::fmt::Debug;

use alloc::vec::Vec;

use crate::config::GridPoint;

/// Instrument measurement taken at each grid point.
pub trait Acquire {
    /// Value produced by one acquisition.
    type Measurement;
    /// Acquisition failure. Logged by the engine, never fatal.
    type Error: Debug;

    /// Measure at grid point `index`. Called once the stage has arrived.
    fn acquire(
        &mut self,
        index: usize,
        point: GridPoint,
    ) -> Result<Self::Measurement, Self::Error>;
}

impl<F, M, E> Acquire for F
where
    F: FnMut(usize, GridPoint) -> Result<M, E>,
    E: Debug,
{
    type Measurement = M;
    type Error = E;

    fn acquire(&mut self, index: usize, point: GridPoint) -> Result<M, E> {
        self(index, point)
    }
}

/// What the sink receives for one visited point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRecord<'a, M> {
    /// Position in the grid.
    pub index: usize,
    /// Commanded coordinates.
    pub point: GridPoint,
    /// Measurement, absent when the point failed.
    pub measurement: Option<&'a M>,
    /// Time spent in the acquisition, in ms. Zero when it was skipped.
    pub acquisition_ms: u64,
}

/// Append-only store for point records.
pub trait PointSink<M> {
    /// Persistence failure. Fatal to the scan.
    type Error: Debug;

    /// Store one record.
    fn persist(&mut self, record: PointRecord<'_, M>) -> Result<(), Self::Error>;
}

impl<F, M, E> PointSink<M> for F
where
    F: FnMut(PointRecord<'_, M>) -> Result<(), E>,
    E: Debug,
{
    type Error = E;

    fn persist(&mut self, record: PointRecord<'_, M>) -> Result<(), E> {
        self(record)
    }
}

/// Owned copy of a [`PointRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPoint<M> {
    /// Position in the grid.
    pub index: usize,
    /// Commanded coordinates.
    pub point: GridPoint,
    /// Measurement, absent when the point failed.
    pub measurement: Option<M>,
    /// Time spent in the acquisition, in ms.
    pub acquisition_ms: u64,
}

/// Sink keeping every record in memory.
#[derive(Debug, Clone)]
pub struct MemorySink<M> {
    records: Vec<StoredPoint<M>>,
}

impl<M> Default for MemorySink<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MemorySink<M> {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Records in persist order.
    pub fn records(&self) -> &[StoredPoint<M>] {
        &self.records
    }

    /// Take the stored records.
    pub fn into_records(self) -> Vec<StoredPoint<M>> {
        self.records
    }
}

impl<M: Clone> PointSink<M> for MemorySink<M> {
    type Error = Infallible;

    fn persist(&mut self, record: PointRecord<'_, M>) -> Result<(), Infallible> {
        self.records.push(StoredPoint {
            index: record.index,
            point: record.point,
            measurement: record.measurement.cloned(),
            acquisition_ms: record.acquisition_ms,
        });
        Ok(())
    }
}
