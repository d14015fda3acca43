//! Sound player implementation using rodio.
//!
//! The chime is synthesized (a short sine burst), so no audio asset needs
//! to ship with the binary. File sources fall back to the chime when the
//! file is missing or cannot be decoded.

use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;
use super::SoundPlayer;

/// Chime frequency in Hz.
const CHIME_FREQUENCY: f32 = 880.0;

/// Chime duration.
const CHIME_DURATION: Duration = Duration::from_millis(900);

/// Chime amplitude (full scale is painfully loud).
const CHIME_AMPLITUDE: f32 = 0.25;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; sounds continue playing in the background.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Whether sound playback is disabled.
    disabled: AtomicBool,
}

impl RodioSoundPlayer {
    /// Creates a new sound player.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new(disabled: bool) -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            disabled: AtomicBool::new(disabled),
        })
    }

    /// Enables or disables playback at runtime.
    ///
    /// Used to apply the `alarmSound` preference without tearing down the
    /// audio stream.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.store(disabled, Ordering::Relaxed);
    }

    /// Creates a detached sink for one playback.
    fn sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::PlaybackError(e.to_string()))
    }

    /// Plays the synthesized chime.
    fn play_chime(&self) -> Result<(), SoundError> {
        let source = SineWave::new(CHIME_FREQUENCY)
            .take_duration(CHIME_DURATION)
            .amplify(CHIME_AMPLITUDE);

        let sink = self.sink()?;
        sink.append(source);
        sink.detach();
        Ok(())
    }

    /// Plays a sound file from the filesystem.
    fn play_file(&self, path: &std::path::Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let reader = BufReader::new(file);
        let decoder = Decoder::new(reader).map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.sink()?;
        sink.append(decoder);
        sink.detach();
        Ok(())
    }
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.disabled.load(Ordering::Relaxed) {
            debug!("Sound playback disabled, skipping");
            return Ok(());
        }

        match source {
            SoundSource::Chime => self.play_chime(),
            SoundSource::File { path } => match self.play_file(path) {
                Ok(()) => Ok(()),
                Err(e) if e.should_fallback_to_chime() => {
                    warn!(
                        "サウンドファイルを再生できません ({}): チャイムにフォールバックします",
                        e
                    );
                    self.play_chime()
                }
                Err(e) => Err(e),
            },
        }
    }
}

/// Creates a sound player, degrading to `None` when no audio device exists.
///
/// Daemons on headless machines still run; they just stay silent.
pub fn try_create_player(disabled: bool) -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new(disabled) {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("オーディオを初期化できません ({}): サウンドなしで続行します", e);
            None
        }
    }
}
