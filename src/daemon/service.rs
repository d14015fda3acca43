//! Daemon service loop.
//!
//! Wires the pieces together and runs them on the current-thread runtime:
//! - a ticker task multiplexing the three periodic sources
//!   (1s clock/alarm, 10ms stopwatch, 1s countdown)
//! - an event task turning engine events into notifications and sound
//! - the IPC accept loop serving one request per connection
//!
//! Shutdown is signalled through a watch channel (from the `shutdown`
//! command) or Ctrl-C.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::clock::SystemClock;
use crate::notification::{DesktopNotifier, NotificationContent, NotificationSender};
use crate::settings::{SettingsStore, APP_DIR};
use crate::sound::{try_create_player, RodioSoundPlayer, SoundPlayer, SoundSource};

use super::engine::{ClockEngine, ClockEvent};
use super::ipc::{IpcServer, RequestHandler};

/// Socket file name inside the application directory.
pub const SOCKET_FILE: &str = "deskclock.sock";

/// Returns the default socket path under the home directory.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_socket_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("ホームディレクトリを特定できません")?;
    Ok(home.join(APP_DIR).join(SOCKET_FILE))
}

/// Runs the daemon until a shutdown request or Ctrl-C arrives.
///
/// # Errors
///
/// Returns an error if the socket cannot be bound.
pub async fn run(socket_path: &Path, settings_path: &Path) -> Result<()> {
    info!("Daemonを起動します (socket: {:?})", socket_path);

    let store = SettingsStore::load(settings_path);
    let initial_page = store.settings.page;
    let settings = Arc::new(Mutex::new(store));

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut engine = ClockEngine::new(Arc::new(SystemClock::new()), event_tx);
    engine.select_page(initial_page);
    let engine = Arc::new(Mutex::new(engine));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // The event loop owns the rodio sound player, whose audio stream is
    // `!Send`, so it must run on this thread via a `LocalSet` rather than
    // through the `Send`-bound `tokio::spawn`.
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            let ticker = tokio::task::spawn_local(run_ticker(engine.clone(), shutdown_rx.clone()));
            let events = tokio::task::spawn_local(run_event_loop(event_rx, settings.clone()));

            let server = IpcServer::new(socket_path)?;
            let handler = RequestHandler::new(engine.clone(), settings.clone(), shutdown_tx);

            let mut shutdown = shutdown_rx;
            loop {
                tokio::select! {
                    result = server.accept() => match result {
                        Ok(mut stream) => match IpcServer::receive_request(&mut stream).await {
                            Ok(request) => {
                                let response = handler.handle(request).await;
                                if let Err(e) = IpcServer::send_response(&mut stream, &response).await {
                                    warn!("レスポンスの送信に失敗しました: {}", e);
                                }
                            }
                            Err(e) => debug!("不正なリクエストを無視します: {}", e),
                        },
                        Err(e) => warn!("接続の受け付けに失敗しました: {}", e),
                    },
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            info!("シャットダウン要求を受信しました");
                            break;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Ctrl-Cを受信しました");
                        break;
                    }
                }
            }

            ticker.abort();
            events.abort();
            info!("Daemonを終了しました");
            Ok(())
        })
        .await
}

/// Drives the three periodic tick sources into the engine.
///
/// Each source skips missed ticks rather than bursting to catch up; a
/// missed alarm tick is silently missed.
async fn run_ticker(engine: Arc<Mutex<ClockEngine>>, mut shutdown: watch::Receiver<bool>) {
    let mut clock_tick = interval(Duration::from_secs(1));
    clock_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut stopwatch_tick = interval(Duration::from_millis(10));
    stopwatch_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut countdown_tick = interval(Duration::from_secs(1));
    countdown_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = clock_tick.tick() => {
                if let Err(e) = engine.lock().await.tick_second() {
                    error!("クロックティックに失敗しました: {}", e);
                    break;
                }
            }
            _ = stopwatch_tick.tick() => {
                engine.lock().await.tick_stopwatch();
            }
            _ = countdown_tick.tick() => {
                if let Err(e) = engine.lock().await.tick_countdown() {
                    error!("カウントダウンティックに失敗しました: {}", e);
                    break;
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

/// Consumes engine events and performs the notification/sound side effects.
async fn run_event_loop(
    mut event_rx: mpsc::UnboundedReceiver<ClockEvent>,
    settings: Arc<Mutex<SettingsStore>>,
) {
    let notifier = DesktopNotifier::new();
    let player = try_create_player(false);

    while let Some(event) = event_rx.recv().await {
        match event {
            ClockEvent::AlarmFired { label, time } => {
                info!("アラーム発火: {} ({})", label, time);
                notify(&notifier, &NotificationContent::alarm_fired(&label, &time));
                play_chime(&player, &settings).await;
            }
            ClockEvent::CountdownTick { remaining_seconds } => {
                debug!("タイマー残り {}秒", remaining_seconds);
            }
            ClockEvent::CountdownFinished => {
                info!("タイマーが終了しました");
                notify(&notifier, &NotificationContent::countdown_finished());
                play_chime(&player, &settings).await;
            }
        }
    }
}

/// Sends a notification, degrading failures to a warning.
fn notify(notifier: &DesktopNotifier, content: &NotificationContent) {
    if let Err(e) = notifier.send(content) {
        warn!("{}", e);
    }
}

/// Plays the chime if the `alarmSound` preference allows it.
async fn play_chime(player: &Option<RodioSoundPlayer>, settings: &Arc<Mutex<SettingsStore>>) {
    if !settings.lock().await.settings.alarm_sound {
        return;
    }

    if let Some(player) = player {
        if let Err(e) = player.play(&SoundSource::Chime) {
            warn!("{}", e);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_socket_path_under_app_dir() {
        let path = default_socket_path().unwrap();
        assert!(path.ends_with(".deskclock/deskclock.sock"));
    }

    #[tokio::test]
    async fn test_ticker_accumulates_running_stopwatch() {
        let clock = Arc::new(SystemClock::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Mutex::new(ClockEngine::new(clock, tx)));
        engine.lock().await.start_stopwatch().unwrap();

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_ticker(engine.clone(), shutdown_rx));

        tokio::time::sleep(Duration::from_millis(200)).await;
        shutdown_tx.send(true).unwrap();
        let _ = handle.await;

        // ~20 ticks expected; allow generous scheduling slack
        let elapsed = engine.lock().await.stopwatch().elapsed_ms;
        assert!(elapsed >= 50, "Expected at least 50ms, got {}", elapsed);
    }

    #[tokio::test]
    async fn test_ticker_ignores_stopped_counters() {
        let clock = Arc::new(SystemClock::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Mutex::new(ClockEngine::new(clock, tx)));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_ticker(engine.clone(), shutdown_rx));

        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown_tx.send(true).unwrap();
        let _ = handle.await;

        assert_eq!(engine.lock().await.stopwatch().elapsed_ms, 0);
        // No countdown events while stopped (alarm events would need a
        // matching registry entry)
        assert!(rx.try_recv().is_err());
    }
}
