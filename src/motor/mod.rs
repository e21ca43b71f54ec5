//! Motor module for stepper-scan.
//!
//! Provides the motion controller that addresses units on the daisy chain,
//! with bounded position queries and a reply mailbox.

mod controller;
mod mailbox;

pub use controller::{MotionController, ReplyPolicy, ReplyStatus, DEFAULT_SETTLE_MS};
pub use mailbox::{Mailbox, MAILBOX_CAPACITY};
