//! Wall-clock time source for the desk clock.
//!
//! This module provides:
//! - The `WallClock` trait abstracting the process-wide time source
//! - `SystemClock` reading the host clock
//! - `MockClock` with a settable instant for tests
//! - Display formatting for the clock page

use std::sync::Mutex;

use chrono::{DateTime, Local};

// ============================================================================
// WallClock
// ============================================================================

/// Abstraction over the process-wide wall-clock read.
///
/// The alarm tick reads the clock once per second; resolution must be at
/// least per-second for the seconds gate to work.
pub trait WallClock: Send + Sync {
    /// Returns the current local date and time.
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock backed by the host OS.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl WallClock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

// ============================================================================
// MockClock
// ============================================================================

/// A wall clock frozen at a settable instant, for tests.
pub struct MockClock {
    current: Mutex<DateTime<Local>>,
}

impl MockClock {
    /// Creates a mock clock frozen at the given instant.
    pub fn new(initial: DateTime<Local>) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    /// Moves the clock to the given instant.
    pub fn set(&self, instant: DateTime<Local>) {
        *self.current.lock().unwrap() = instant;
    }

    /// Advances the clock by the given duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut current = self.current.lock().unwrap();
        *current = *current + duration;
    }
}

impl WallClock for MockClock {
    fn now(&self) -> DateTime<Local> {
        *self.current.lock().unwrap()
    }
}

// ============================================================================
// Display Formatting
// ============================================================================

/// Formats the time for the clock page, e.g. `14:05:09`.
pub fn format_time(now: &DateTime<Local>) -> String {
    now.format("%H:%M:%S").to_string()
}

/// Formats the date for the clock page, e.g. `Wednesday, January 1, 2025`.
pub fn format_date(now: &DateTime<Local>) -> String {
    now.format("%A, %B %-d, %Y").to_string()
}

// ============================================================================
// Tests
// ============================================================================
