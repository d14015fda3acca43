//! Desk Clock Library
//!
//! This library provides the core functionality for the desk clock CLI.
//! It includes:
//! - Clock engine with alarm matching, stopwatch, and countdown counters
//! - IPC server/client for daemon-CLI communication
//! - CLI command parsing and display utilities
//! - Wall-clock abstraction with a mockable time source
//! - Desktop notifications for alarm fire and timer completion
//! - Sound playback for the alarm chime
//! - Persisted settings (selected page and preferences)

pub mod cli;
pub mod clock;
pub mod daemon;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    AlarmEntry, AlarmInfo, CountdownInfo, CountdownState, IpcRequest, IpcResponse, Page,
    ResponseData, StopwatchInfo, StopwatchState,
};

// Re-export the engine and its events
pub use daemon::{ClockEngine, ClockEvent};

// Re-export clock types
pub use clock::{MockClock, SystemClock, WallClock};

// Re-export notification types
pub use notification::{
    DesktopNotifier, MockNotificationSender, NotificationContent, NotificationError,
    NotificationSender,
};

// Re-export sound types
pub use sound::{try_create_player, MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};

// Re-export settings types
pub use settings::{Settings, SettingsError, SettingsStore};
