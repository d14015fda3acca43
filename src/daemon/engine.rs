//! Clock engine for the desk clock daemon.
//!
//! This module provides the core tick-driven state:
//! - Alarm matching against the wall clock (1s tick, seconds gate)
//! - Stopwatch accumulation (10ms tick)
//! - Countdown decrement and completion (1s tick)
//! - Page selection for the navigation shell
//! - Event firing for notifications and sounds

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Timelike;
use tokio::sync::mpsc;

use crate::clock::{self, WallClock};
use crate::types::{AlarmEntry, CountdownState, Page, StopwatchState};

// ============================================================================
// ClockEvent
// ============================================================================

/// Engine events for notifications and external integrations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockEvent {
    /// An alarm matched the current minute and was removed from the registry
    AlarmFired {
        /// Label of the fired entry
        label: String,
        /// Alarm time as `hh:mm`
        time: String,
    },
    /// One second elapsed on a running countdown
    CountdownTick {
        /// Remaining seconds after the tick
        remaining_seconds: u32,
    },
    /// The countdown reached zero and stopped
    CountdownFinished,
}

// ============================================================================
// ClockEngine
// ============================================================================

/// Owns all mutable state of the daemon: the alarm registry, the two
/// counters, and the selected page.
///
/// The engine itself is tick-driven and passive; the daemon service drives
/// `tick_second`/`tick_stopwatch`/`tick_countdown` from its interval sources
/// and consumes the emitted events.
pub struct ClockEngine {
    /// Wall-clock source for the 1s tick and the clock page
    clock: Arc<dyn WallClock>,
    /// Currently selected page
    page: Page,
    /// Alarm registry, insertion order preserved
    alarms: Vec<AlarmEntry>,
    /// Stopwatch counter
    stopwatch: StopwatchState,
    /// Countdown counter
    countdown: CountdownState,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<ClockEvent>,
}

impl ClockEngine {
    /// Creates a new engine with the given time source and event channel.
    pub fn new(clock: Arc<dyn WallClock>, event_tx: mpsc::UnboundedSender<ClockEvent>) -> Self {
        Self {
            clock,
            page: Page::default(),
            alarms: Vec::new(),
            stopwatch: StopwatchState::new(),
            countdown: CountdownState::new(),
            event_tx,
        }
    }

    // ------------------------------------------------------------------------
    // Tick handlers
    // ------------------------------------------------------------------------

    /// Handles the 1s clock tick: reads the wall clock and fires matching
    /// alarms.
    ///
    /// Matching is gated on the current second being 0, so an entry fires at
    /// most once per matching minute. A tick that lands on any other second
    /// (or a tick skipped entirely while the host was suspended) does not
    /// fire and is not caught up.
    pub fn tick_second(&mut self) -> Result<()> {
        let now = self.clock.now();
        if now.second() != 0 {
            return Ok(());
        }

        let hour = now.hour();
        let minute = now.minute();

        // Removal during the scan: the index only advances past entries that
        // did not fire, so the entry following a removed one is not skipped.
        let mut i = 0;
        while i < self.alarms.len() {
            if self.alarms[i].matches(hour, minute) {
                let fired = self.alarms.remove(i);
                self.event_tx
                    .send(ClockEvent::AlarmFired {
                        time: fired.time_display(),
                        label: fired.label,
                    })
                    .context("Failed to send alarm fired event")?;
            } else {
                i += 1;
            }
        }

        Ok(())
    }

    /// Handles the 10ms stopwatch tick. No-op while the stopwatch is stopped.
    pub fn tick_stopwatch(&mut self) {
        self.stopwatch.tick();
    }

    /// Handles the 1s countdown tick. No-op while the countdown is stopped.
    ///
    /// Emits exactly one `CountdownFinished` on the tick that reaches zero;
    /// the counter stops itself at that point.
    pub fn tick_countdown(&mut self) -> Result<()> {
        if !self.countdown.running {
            return Ok(());
        }

        let finished = self.countdown.tick();

        self.event_tx
            .send(ClockEvent::CountdownTick {
                remaining_seconds: self.countdown.remaining_seconds,
            })
            .context("Failed to send countdown tick event")?;

        if finished {
            self.countdown.stop();
            self.event_tx
                .send(ClockEvent::CountdownFinished)
                .context("Failed to send countdown finished event")?;
        }

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Returns the currently selected page.
    pub fn page(&self) -> Page {
        self.page
    }

    /// Selects a page. Pure assignment; no other view's state is touched.
    pub fn select_page(&mut self, page: Page) {
        self.page = page;
    }

    /// Returns the clock page display strings (time, date).
    pub fn clock_display(&self) -> (String, String) {
        let now = self.clock.now();
        (clock::format_time(&now), clock::format_date(&now))
    }

    // ------------------------------------------------------------------------
    // Alarms
    // ------------------------------------------------------------------------

    /// Adds an alarm to the end of the registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the time components are out of range.
    pub fn add_alarm(
        &mut self,
        hour: u32,
        minute: u32,
        label: Option<String>,
    ) -> Result<AlarmEntry> {
        if hour > 23 {
            anyhow::bail!("時は0-23の範囲で指定してください");
        }
        if minute > 59 {
            anyhow::bail!("分は0-59の範囲で指定してください");
        }

        let entry = AlarmEntry::new(hour, minute, label.unwrap_or_default());
        self.alarms.push(entry.clone());
        Ok(entry)
    }

    /// Returns the alarm registry in insertion order.
    pub fn alarms(&self) -> &[AlarmEntry] {
        &self.alarms
    }

    /// Deletes the alarm at the given position.
    ///
    /// `None` (no selection) and out-of-range positions are no-ops; the
    /// registry is unchanged and `None` is returned.
    pub fn delete_alarm(&mut self, index: Option<usize>) -> Option<AlarmEntry> {
        let index = index?;
        if index < self.alarms.len() {
            Some(self.alarms.remove(index))
        } else {
            None
        }
    }

    // ------------------------------------------------------------------------
    // Stopwatch
    // ------------------------------------------------------------------------

    /// Returns the stopwatch state.
    pub fn stopwatch(&self) -> &StopwatchState {
        &self.stopwatch
    }

    /// Starts the stopwatch.
    ///
    /// # Errors
    ///
    /// Returns an error if the stopwatch is already running.
    pub fn start_stopwatch(&mut self) -> Result<()> {
        if self.stopwatch.running {
            anyhow::bail!("ストップウォッチは既に動作しています");
        }
        self.stopwatch.start();
        Ok(())
    }

    /// Stops the stopwatch, preserving the elapsed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the stopwatch is not running.
    pub fn stop_stopwatch(&mut self) -> Result<()> {
        if !self.stopwatch.running {
            anyhow::bail!("ストップウォッチは動作していません");
        }
        self.stopwatch.stop();
        Ok(())
    }

    /// Zeroes the stopwatch counter. Permitted in any state.
    pub fn reset_stopwatch(&mut self) {
        self.stopwatch.reset();
    }

    // ------------------------------------------------------------------------
    // Countdown
    // ------------------------------------------------------------------------

    /// Returns the countdown state.
    pub fn countdown(&self) -> &CountdownState {
        &self.countdown
    }

    /// Configures and starts the countdown timer.
    ///
    /// Returns `Ok(true)` if the countdown started, `Ok(false)` if the
    /// computed total was zero (the counter stays stopped; this is not an
    /// error).
    ///
    /// # Errors
    ///
    /// Returns an error if the countdown is already running or a component
    /// is out of range.
    pub fn start_countdown(&mut self, minutes: u32, seconds: u32) -> Result<bool> {
        if self.countdown.running {
            anyhow::bail!("タイマーは既に動作しています");
        }
        if minutes > 59 {
            anyhow::bail!("分は0-59の範囲で指定してください");
        }
        if seconds > 59 {
            anyhow::bail!("秒は0-59の範囲で指定してください");
        }

        let total = self.countdown.arm(minutes, seconds);
        if total == 0 {
            return Ok(false);
        }

        self.countdown.start();
        Ok(true)
    }

    /// Pauses the countdown without resetting the remaining time.
    ///
    /// # Errors
    ///
    /// Returns an error if the countdown is not running.
    pub fn stop_countdown(&mut self) -> Result<()> {
        if !self.countdown.running {
            anyhow::bail!("タイマーは動作していません");
        }
        self.countdown.stop();
        Ok(())
    }

    /// Recomputes the countdown from its configured duration.
    ///
    /// Discards paused progress; a running countdown keeps counting from the
    /// recomputed value.
    pub fn reset_countdown(&mut self) {
        self.countdown.reset();
    }
}

// ============================================================================
// Tests
// ============================================================================
