//! Simulated daisy chain shared by the integration tests.
//!
//! Time is a shared microsecond counter: the delay advances it, the clock
//! reads it, and the transport releases reply bytes once their due time has
//! passed. Nothing sleeps.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use stepper_scan::config::{AxisPair, AxisUnit};
use stepper_scan::protocol::{Clock, Command, Packet, PacketChannel, Transport, PACKET_SIZE};
use stepper_scan::{MotionController, ReplyPolicy};

/// Units present on the simulated chain.
pub const CHAIN_UNITS: [u8; 2] = [1, 2];

/// Reply latency of a simulated unit.
pub const LATENCY_US: u64 = 5_000;

/// Axes with 100 cm and 50 cm of travel.
pub fn tile_axes() -> AxisPair {
    AxisPair::new(
        AxisUnit::new(1, 80_629.92, 8_062_992, 100_000.0),
        AxisUnit::new(2, 80_629.92, 4_031_496, 50_000.0),
    )
}

/// Millisecond clock over the shared counter.
pub struct SimClock(Rc<Cell<u64>>);

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.0.get() / 1000
    }
}

/// Delay that advances the shared counter.
pub struct SimDelay(Rc<Cell<u64>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + (u64::from(ns) + 999) / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        self.0.set(self.0.get() + u64::from(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.set(self.0.get() + u64::from(ms) * 1000);
    }
}

/// Something that happened on the simulated line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sent {
    /// Time of the write, in microseconds.
    pub at_us: u64,
    /// Packet written by the host.
    pub packet: Packet,
}

#[derive(Default)]
struct ChainState {
    positions: HashMap<u8, i32>,
    offsets: HashMap<u8, i32>,
    silent: HashSet<u8>,
    answers_left: HashMap<u8, usize>,
    line: VecDeque<(u64, u8)>,
    sent: Vec<Sent>,
}

/// Transport end of the simulated chain.
pub struct SimChain {
    now: Rc<Cell<u64>>,
    state: Rc<RefCell<ChainState>>,
}

impl SimChain {
    fn emit(&self, state: &mut ChainState, packet: Packet) {
        let due = self.now.get() + LATENCY_US;
        for b in packet.encode() {
            state.line.push_back((due, b));
        }
    }
}

impl Transport for SimChain {
    type Error = ();

    fn read_byte(&mut self) -> Result<Option<u8>, ()> {
        let mut state = self.state.borrow_mut();
        match state.line.front() {
            Some(&(due, b)) if due <= self.now.get() => {
                state.line.pop_front();
                Ok(Some(b))
            }
            _ => Ok(None),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), ()> {
        let raw: [u8; PACKET_SIZE] = bytes.try_into().map_err(|_| ())?;
        let packet = Packet::decode(&raw);
        let mut state = self.state.borrow_mut();
        state.sent.push(Sent {
            at_us: self.now.get(),
            packet,
        });

        match Command::from_id(packet.command) {
            Some(Command::Renumber) => {
                for (n, unit) in CHAIN_UNITS.iter().enumerate() {
                    self.emit(&mut state, Packet::new(*unit, packet.command, n as i32 + 1));
                }
            }
            Some(Command::MoveAbsolute) => {
                let offset = state.offsets.get(&packet.unit).copied().unwrap_or(0);
                state.positions.insert(packet.unit, packet.data + offset);
            }
            Some(Command::ReturnPosition) => {
                if state.silent.contains(&packet.unit) {
                    return Ok(());
                }
                if let Some(left) = state.answers_left.get_mut(&packet.unit) {
                    if *left == 0 {
                        return Ok(());
                    }
                    *left -= 1;
                }
                let position = state.positions.get(&packet.unit).copied().unwrap_or(0);
                self.emit(&mut state, Packet::new(packet.unit, packet.command, position));
            }
            None => {}
        }
        Ok(())
    }
}

/// Handle for building and inspecting a simulated chain.
#[derive(Clone, Default)]
pub struct Sim {
    now: Rc<Cell<u64>>,
    state: Rc<RefCell<ChainState>>,
}

impl Sim {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clock(&self) -> SimClock {
        SimClock(self.now.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.now.clone())
    }

    pub fn transport(&self) -> SimChain {
        SimChain {
            now: self.now.clone(),
            state: self.state.clone(),
        }
    }

    /// Open channel over this chain.
    pub fn channel(&self) -> PacketChannel<SimChain, SimClock> {
        let mut channel = PacketChannel::new(self.clock());
        channel.open(self.transport()).unwrap();
        channel
    }

    /// Controller with short deadlines.
    pub fn controller(&self) -> MotionController<SimChain, SimClock, SimDelay> {
        MotionController::new(self.channel(), self.delay()).with_reply_policy(ReplyPolicy {
            timeout_ms: 100,
            retries: 2,
            poll_interval_us: 1000,
        })
    }

    pub fn now_us(&self) -> u64 {
        self.now.get()
    }

    pub fn now_ms(&self) -> u64 {
        self.now.get() / 1000
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.set(self.now.get() + ms * 1000);
    }

    pub fn set_position(&self, unit: u8, position: i32) {
        self.state.borrow_mut().positions.insert(unit, position);
    }

    pub fn position(&self, unit: u8) -> i32 {
        self.state.borrow().positions.get(&unit).copied().unwrap_or(0)
    }

    /// Make a unit land `offset` microsteps away from every commanded target.
    pub fn set_offset(&self, unit: u8, offset: i32) {
        self.state.borrow_mut().offsets.insert(unit, offset);
    }

    pub fn set_silent(&self, unit: u8) {
        self.state.borrow_mut().silent.insert(unit);
    }

    /// Answer `count` more position queries from `unit`, then go quiet.
    pub fn answer_only(&self, unit: u8, count: usize) {
        self.state.borrow_mut().answers_left.insert(unit, count);
    }

    /// Queue raw bytes that become readable at `at_ms`.
    pub fn push_raw(&self, at_ms: u64, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        for &b in bytes {
            state.line.push_back((at_ms * 1000, b));
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.state.borrow().sent.clone()
    }

    pub fn sent_packets(&self) -> Vec<Packet> {
        self.sent().into_iter().map(|s| s.packet).collect()
    }

    /// Move commands in send order as `(unit, target)`.
    pub fn moves(&self) -> Vec<(u8, i32)> {
        self.sent_packets()
            .into_iter()
            .filter(|p| p.command == Command::MoveAbsolute.id())
            .map(|p| (p.unit, p.data))
            .collect()
    }
}
