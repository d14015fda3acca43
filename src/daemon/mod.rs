//! Daemon module for the desk clock.
//!
//! This module contains the core daemon functionality:
//! - `engine`: tick-driven state (alarms, stopwatch, countdown, page)
//! - `ipc`: Unix socket server and request dispatch
//! - `service`: the daemon run loop

pub mod engine;
pub mod ipc;
pub mod service;

pub use engine::{ClockEngine, ClockEvent};
pub use ipc::{IpcServer, RequestHandler};
