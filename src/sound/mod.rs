//! Sound playback for the alarm chime.
//!
//! This module provides audio capabilities for alarm fire and countdown
//! completion:
//!
//! - A synthesized chime that needs no sound file
//! - Optional playback of a user-supplied sound file, with chime fallback
//! - Non-blocking playback
//! - Graceful degradation when no audio device is available

mod error;
mod player;
mod source;

pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::SoundSource;

use std::sync::Mutex;

// ============================================================================
// SoundPlayer
// ============================================================================

/// Trait for sound playback implementations.
///
/// Playback is non-blocking; implementations return as soon as the sound is
/// queued on the output device.
pub trait SoundPlayer {
    /// Plays a sound from the given source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be decoded or the audio device
    /// rejects playback.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

// ============================================================================
// MockSoundPlayer
// ============================================================================

/// A sound player that records played sources, for tests.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    played: Mutex<Vec<SoundSource>>,
}

impl MockSoundPlayer {
    /// Creates a new mock player.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sources played so far.
    pub fn played(&self) -> Vec<SoundSource> {
        self.played.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        self.played.lock().unwrap().push(source.clone());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
