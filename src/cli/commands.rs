//! Command definitions for the desk clock CLI.
//!
//! Uses clap derive macro for argument parsing. Inputs are pre-constrained
//! here (time format, 0-59 ranges, label length), so the daemon only ever
//! sees well-formed values from this client.

use clap::{Args, Parser, Subcommand};

use crate::types::Page;

// ============================================================================
// CLI Structure
// ============================================================================

/// Desk clock CLI
#[derive(Parser, Debug)]
#[command(
    name = "deskclock",
    version,
    about = "時計・アラーム・ストップウォッチ・タイマーCLI",
    long_about = "ターミナル上で動作するデスクトップクロック。\n\
                  時計表示、アラーム、ストップウォッチ、カウントダウンタイマーの\n\
                  4つのページをDaemonが管理します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the currently selected page
    Status,

    /// Switch to a page and show it
    View {
        /// Page to select (clock, alarms, stopwatch, timer)
        #[arg(value_parser = parse_page)]
        page: Page,
    },

    /// Manage alarms
    #[command(subcommand)]
    Alarm(AlarmCommands),

    /// Control the stopwatch
    #[command(subcommand)]
    Stopwatch(StopwatchCommands),

    /// Control the countdown timer
    #[command(subcommand)]
    Timer(TimerCommands),

    /// Show or update preferences
    Config(ConfigArgs),

    /// Run as daemon (background service)
    Daemon,

    /// Shut the daemon down
    Shutdown {
        /// Shut down even while a counter is running
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Alarm subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum AlarmCommands {
    /// Add an alarm
    Add(AlarmAddArgs),

    /// List alarms in registry order
    List,

    /// Delete the alarm at the given list number
    Delete {
        /// List number as shown by `alarm list` (1-based)
        #[arg(value_parser = parse_index)]
        number: usize,
    },
}

/// Stopwatch subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum StopwatchCommands {
    /// Start the stopwatch
    Start,
    /// Stop the stopwatch, preserving elapsed time
    Stop,
    /// Zero the counter
    Reset,
}

/// Timer subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TimerCommands {
    /// Configure and start the countdown
    Start(TimerStartArgs),
    /// Pause the countdown
    Stop,
    /// Recompute the countdown from its configured duration
    Reset,
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for the alarm add command
#[derive(Args, Debug, Clone)]
pub struct AlarmAddArgs {
    /// Alarm time as HH:MM (24-hour)
    #[arg(value_parser = parse_alarm_time)]
    pub time: (u32, u32),

    /// Label for the alarm
    #[arg(short, long, value_parser = validate_label)]
    pub label: Option<String>,
}

/// Arguments for the timer start command
#[derive(Args, Debug, Clone)]
pub struct TimerStartArgs {
    /// Minutes component (0-59)
    #[arg(
        short,
        long,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(0..=59)
    )]
    pub minutes: u32,

    /// Seconds component (0-59)
    #[arg(
        short,
        long,
        default_value = "0",
        value_parser = clap::value_parser!(u32).range(0..=59)
    )]
    pub seconds: u32,
}

impl Default for TimerStartArgs {
    fn default() -> Self {
        Self {
            minutes: 5,
            seconds: 0,
        }
    }
}

/// Arguments for the config command
///
/// With no flag, the current preferences are shown.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Enable or disable the alarm chime (true/false)
    #[arg(long)]
    pub alarm_sound: Option<bool>,

    /// Enable or disable the shutdown confirmation guard (true/false)
    #[arg(long)]
    pub confirm_exit: Option<bool>,
}

impl ConfigArgs {
    /// Returns true if no preference flag was given.
    pub fn is_show(&self) -> bool {
        self.alarm_sound.is_none() && self.confirm_exit.is_none()
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a page name.
fn parse_page(s: &str) -> Result<Page, String> {
    s.parse()
}

/// Parses an alarm time in `HH:MM` form.
fn parse_alarm_time(s: &str) -> Result<(u32, u32), String> {
    let (hour, minute) = s
        .split_once(':')
        .ok_or_else(|| "時刻は HH:MM 形式で指定してください".to_string())?;

    let hour: u32 = hour
        .parse()
        .map_err(|_| "時刻は HH:MM 形式で指定してください".to_string())?;
    let minute: u32 = minute
        .parse()
        .map_err(|_| "時刻は HH:MM 形式で指定してください".to_string())?;

    if hour > 23 {
        return Err("時は0-23の範囲で指定してください".to_string());
    }
    if minute > 59 {
        return Err("分は0-59の範囲で指定してください".to_string());
    }

    Ok((hour, minute))
}

/// Parses a 1-based list number.
fn parse_index(s: &str) -> Result<usize, String> {
    let number: usize = s
        .parse()
        .map_err(|_| "番号を指定してください".to_string())?;
    if number == 0 {
        return Err("番号は1以上で指定してください".to_string());
    }
    Ok(number)
}

/// Validates the alarm label.
///
/// - Must not exceed 100 characters
/// - Empty labels are allowed; the daemon substitutes a placeholder
fn validate_label(s: &str) -> Result<String, String> {
    if s.len() > 100 {
        return Err("ラベルは100文字以内にしてください".to_string());
    }
    Ok(s.to_string())
}

// ============================================================================
// Tests
// ============================================================================
