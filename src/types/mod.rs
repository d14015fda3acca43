//! Core data types for the desk clock.
//!
//! This module defines the data structures used for:
//! - View/page selection
//! - Alarm entries and the alarm registry
//! - Stopwatch and countdown counter state
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};

// ============================================================================
// Page
// ============================================================================

/// The four views of the application, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Live clock and date display
    Clock,
    /// Alarm list management
    Alarms,
    /// Stopwatch (10ms resolution)
    Stopwatch,
    /// Countdown timer
    Timer,
}

impl Page {
    /// All pages in display order.
    pub const ALL: [Page; 4] = [Page::Clock, Page::Alarms, Page::Stopwatch, Page::Timer];

    /// Returns the string representation of the page.
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Clock => "clock",
            Page::Alarms => "alarms",
            Page::Stopwatch => "stopwatch",
            Page::Timer => "timer",
        }
    }

    /// Returns the position of this page in the sidebar order.
    pub fn index(&self) -> usize {
        match self {
            Page::Clock => 0,
            Page::Alarms => 1,
            Page::Stopwatch => 2,
            Page::Timer => 3,
        }
    }

    /// Returns the page at the given sidebar position, if any.
    pub fn from_index(index: usize) -> Option<Page> {
        Page::ALL.get(index).copied()
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Clock
    }
}

impl std::str::FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "clock" => Ok(Page::Clock),
            "alarms" => Ok(Page::Alarms),
            "stopwatch" => Ok(Page::Stopwatch),
            "timer" => Ok(Page::Timer),
            other => Err(format!(
                "不明なページです: {} (clock, alarms, stopwatch, timer から選択してください)",
                other
            )),
        }
    }
}

// ============================================================================
// AlarmEntry
// ============================================================================

/// Placeholder label applied when an alarm is added with an empty label.
pub const DEFAULT_ALARM_LABEL: &str = "アラーム";

/// A single alarm registration.
///
/// Entries have no natural key; they are identified by list position only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmEntry {
    /// Hour of day (0-23)
    pub hour: u32,
    /// Minute of hour (0-59)
    pub minute: u32,
    /// User-facing label
    pub label: String,
    /// Whether the entry participates in matching
    pub enabled: bool,
}

impl AlarmEntry {
    /// Creates a new enabled alarm entry.
    ///
    /// An empty or whitespace-only label is replaced by
    /// [`DEFAULT_ALARM_LABEL`].
    pub fn new(hour: u32, minute: u32, label: impl Into<String>) -> Self {
        let label = label.into();
        let trimmed = label.trim();
        let label = if trimmed.is_empty() {
            DEFAULT_ALARM_LABEL.to_string()
        } else {
            trimmed.to_string()
        };

        Self {
            hour,
            minute,
            label,
            enabled: true,
        }
    }

    /// Returns true if this entry should fire at the given minute.
    ///
    /// The seconds gate (fire only when the current second is 0) is applied
    /// by the caller; matching itself is minute-granularity.
    pub fn matches(&self, hour: u32, minute: u32) -> bool {
        self.enabled && self.hour == hour && self.minute == minute
    }

    /// Returns the alarm time formatted as `hh:mm`.
    pub fn time_display(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

// ============================================================================
// StopwatchState
// ============================================================================

/// Milliseconds added per stopwatch tick.
pub const STOPWATCH_TICK_MS: u64 = 10;

/// Stopwatch counter state.
///
/// Elapsed time is tick-counted: every 10ms tick adds exactly 10, so the
/// value drifts from wall-clock time under scheduler load. The accumulator
/// has no upper bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchState {
    /// Accumulated elapsed time in milliseconds
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    /// Whether the 10ms tick is accumulating
    pub running: bool,
}

impl StopwatchState {
    /// Creates a stopped, zeroed stopwatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins accumulation.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Halts accumulation, preserving the elapsed value.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Zeroes the counter. Permitted in any state; `running` is unchanged.
    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    /// Advances the counter by one 10ms tick. No-op while stopped.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_ms += STOPWATCH_TICK_MS;
        }
    }

    /// Formats the elapsed time as `mm:ss.cc`.
    pub fn display(&self) -> String {
        let minutes = self.elapsed_ms / 60_000;
        let seconds = (self.elapsed_ms % 60_000) / 1_000;
        let centis = (self.elapsed_ms % 1_000) / 10;
        format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
    }
}

// ============================================================================
// CountdownState
// ============================================================================

/// Countdown timer state.
///
/// `set_minutes`/`set_seconds` hold the configured duration (each bounded to
/// 0-59); `reset` recomputes the remaining time from them, discarding any
/// paused progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    /// Configured minutes component (0-59)
    #[serde(rename = "setMinutes")]
    pub set_minutes: u32,
    /// Configured seconds component (0-59)
    #[serde(rename = "setSeconds")]
    pub set_seconds: u32,
    /// Remaining time in whole seconds
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Whether the 1s tick is decrementing
    pub running: bool,
}

impl Default for CountdownState {
    fn default() -> Self {
        // Mirrors the initial 05:00 shown before any start
        Self {
            set_minutes: 5,
            set_seconds: 0,
            remaining_seconds: 5 * 60,
            running: false,
        }
    }
}

impl CountdownState {
    /// Creates a stopped countdown with the default 05:00 duration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the duration and computes the remaining total.
    ///
    /// Returns the computed total in seconds. Does not start the counter.
    pub fn arm(&mut self, minutes: u32, seconds: u32) -> u32 {
        self.set_minutes = minutes;
        self.set_seconds = seconds;
        self.remaining_seconds = minutes * 60 + seconds;
        self.remaining_seconds
    }

    /// Returns the configured duration total in seconds.
    pub fn set_total(&self) -> u32 {
        self.set_minutes * 60 + self.set_seconds
    }

    /// Begins the 1s decrement tick.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Pauses the tick without resetting the remaining time.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Recomputes the remaining time from the configured duration.
    ///
    /// Discards paused progress; `running` is unchanged, so a running
    /// countdown keeps counting from the recomputed value.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.set_total();
    }

    /// Decrements by one second. Returns true when the counter reaches 0.
    ///
    /// The caller flips `running` off and emits the finished event exactly
    /// once, on the tick that returns true.
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
        }
        self.remaining_seconds == 0
    }

    /// Formats the remaining time as `mm:ss`.
    pub fn display(&self) -> String {
        let minutes = self.remaining_seconds / 60;
        let seconds = self.remaining_seconds % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum IpcRequest {
    /// Query the currently selected page's display
    Status,
    /// Select a page and return its display
    View {
        /// Page to select
        page: Page,
    },
    /// Add an alarm entry
    AlarmAdd {
        /// Hour of day (0-23)
        hour: u32,
        /// Minute of hour (0-59)
        minute: u32,
        /// Optional label (placeholder applied when empty)
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// List all alarm entries
    AlarmList,
    /// Delete the alarm at the given list position
    AlarmDelete {
        /// Position to delete; `None` (no selection) is a no-op
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
    },
    /// Start the stopwatch
    StopwatchStart,
    /// Stop the stopwatch, preserving elapsed time
    StopwatchStop,
    /// Zero the stopwatch counter
    StopwatchReset,
    /// Configure and start the countdown timer
    TimerStart {
        /// Minutes component (0-59)
        minutes: u32,
        /// Seconds component (0-59)
        seconds: u32,
    },
    /// Pause the countdown timer
    TimerStop,
    /// Recompute the countdown from its configured duration
    TimerReset,
    /// Show the persisted preferences
    ConfigShow,
    /// Update persisted preferences
    ConfigSet {
        /// Enable or disable the alarm chime
        #[serde(rename = "alarmSound", skip_serializing_if = "Option::is_none")]
        alarm_sound: Option<bool>,
        /// Enable or disable the shutdown confirmation guard
        #[serde(rename = "confirmExit", skip_serializing_if = "Option::is_none")]
        confirm_exit: Option<bool>,
    },
    /// Shut the daemon down
    Shutdown {
        /// Bypass the confirm-exit guard
        #[serde(default)]
        force: bool,
    },
}

/// Alarm entry as rendered in IPC responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmInfo {
    /// Alarm time as `hh:mm`
    pub time: String,
    /// User-facing label
    pub label: String,
    /// Whether the entry participates in matching
    pub enabled: bool,
}

impl AlarmInfo {
    /// Builds the response view of an alarm entry.
    pub fn from_entry(entry: &AlarmEntry) -> Self {
        Self {
            time: entry.time_display(),
            label: entry.label.clone(),
            enabled: entry.enabled,
        }
    }
}

/// Stopwatch state as rendered in IPC responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchInfo {
    /// Formatted `mm:ss.cc` display string
    pub display: String,
    /// Raw elapsed milliseconds
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
    /// Whether the counter is accumulating
    pub running: bool,
}

impl StopwatchInfo {
    /// Builds the response view of the stopwatch state.
    pub fn from_state(state: &StopwatchState) -> Self {
        Self {
            display: state.display(),
            elapsed_ms: state.elapsed_ms,
            running: state.running,
        }
    }
}

/// Countdown state as rendered in IPC responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownInfo {
    /// Formatted `mm:ss` display string
    pub display: String,
    /// Raw remaining seconds
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    /// Whether the counter is decrementing
    pub running: bool,
}

impl CountdownInfo {
    /// Builds the response view of the countdown state.
    pub fn from_state(state: &CountdownState) -> Self {
        Self {
            display: state.display(),
            remaining_seconds: state.remaining_seconds,
            running: state.running,
        }
    }
}

/// Response data for IPC responses.
///
/// Only the fields relevant to the handled command are populated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseData {
    /// Currently selected page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Current time as `hh:mm:ss`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Current date, long form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Alarm list in registry order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarms: Option<Vec<AlarmInfo>>,
    /// Stopwatch state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopwatch: Option<StopwatchInfo>,
    /// Countdown state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<CountdownInfo>,
    /// Persisted alarm chime preference
    #[serde(rename = "alarmSound", skip_serializing_if = "Option::is_none")]
    pub alarm_sound: Option<bool>,
    /// Persisted confirm-exit preference
    #[serde(rename = "confirmExit", skip_serializing_if = "Option::is_none")]
    pub confirm_exit: Option<bool>,
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Optional response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<ResponseData>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
