//! IPC server for the desk clock daemon.
//!
//! This module provides Unix Domain Socket IPC functionality:
//! - Server that listens on a Unix socket
//! - Request/response handling for clock commands
//! - Integration with ClockEngine and the settings store

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{watch, Mutex};
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::settings::SettingsStore;
use crate::types::{
    AlarmInfo, CountdownInfo, IpcRequest, IpcResponse, ResponseData, StopwatchInfo,
};

use super::engine::ClockEngine;

// ============================================================================
// Constants
// ============================================================================

/// Maximum request size in bytes (4KB)
const MAX_REQUEST_SIZE: usize = 4096;

/// Read timeout in seconds
const READ_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// IpcError
// ============================================================================

/// IPC-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum IpcError {
    /// Read error
    #[error("Failed to read request: {0}")]
    ReadError(String),

    /// Write error
    #[error("Failed to write response: {0}")]
    WriteError(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,
}

// ============================================================================
// IpcServer
// ============================================================================

/// Unix Domain Socket IPC server.
pub struct IpcServer {
    /// Unix socket listener
    listener: UnixListener,
    /// Socket path (for cleanup)
    socket_path: PathBuf,
}

impl IpcServer {
    /// Creates a new IPC server bound to the specified socket path.
    ///
    /// A stale socket file at the path is removed before binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be bound.
    pub fn new(socket_path: &Path) -> Result<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path)
                .with_context(|| format!("Failed to remove existing socket: {:?}", socket_path))?;
        }

        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {:?}", parent))?;
        }

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("Failed to bind Unix socket: {:?}", socket_path))?;

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
        })
    }

    /// Accepts an incoming client connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be accepted.
    pub async fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        Ok(stream)
    }

    /// Receives and deserializes an IPC request from the stream.
    ///
    /// Applies a read timeout to prevent blocking indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or deserialization fails.
    pub async fn receive_request(stream: &mut UnixStream) -> Result<IpcRequest> {
        let mut buffer = vec![0u8; MAX_REQUEST_SIZE];

        let read_result = timeout(
            Duration::from_secs(READ_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(IpcError::ReadError(e.to_string()).into()),
            Err(_) => return Err(IpcError::Timeout.into()),
        };

        if n == 0 {
            anyhow::bail!("Connection closed by client");
        }

        let request: IpcRequest = serde_json::from_slice(&buffer[..n])
            .with_context(|| "Failed to deserialize IPC request")?;

        Ok(request)
    }

    /// Serializes and sends an IPC response to the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn send_response(stream: &mut UnixStream, response: &IpcResponse) -> Result<()> {
        let json = serde_json::to_vec(response).context("Failed to serialize IPC response")?;

        stream
            .write_all(&json)
            .await
            .map_err(|e| IpcError::WriteError(e.to_string()))?;
        stream.flush().await.context("Failed to flush response")?;

        Ok(())
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        // Clean up socket file on drop
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

// ============================================================================
// RequestHandler
// ============================================================================

/// Handles IPC requests by dispatching to the clock engine and settings.
pub struct RequestHandler {
    /// Shared reference to the clock engine
    engine: Arc<Mutex<ClockEngine>>,
    /// Shared reference to the persisted settings
    settings: Arc<Mutex<SettingsStore>>,
    /// Shutdown signal to the daemon service
    shutdown_tx: watch::Sender<bool>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(
        engine: Arc<Mutex<ClockEngine>>,
        settings: Arc<Mutex<SettingsStore>>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            engine,
            settings,
            shutdown_tx,
        }
    }

    /// Handles an IPC request and returns the appropriate response.
    pub async fn handle(&self, request: IpcRequest) -> IpcResponse {
        debug!("Handling request: {:?}", request);

        match request {
            IpcRequest::Status => self.handle_status().await,
            IpcRequest::View { page } => self.handle_view(page).await,
            IpcRequest::AlarmAdd {
                hour,
                minute,
                label,
            } => self.handle_alarm_add(hour, minute, label).await,
            IpcRequest::AlarmList => self.handle_alarm_list().await,
            IpcRequest::AlarmDelete { index } => self.handle_alarm_delete(index).await,
            IpcRequest::StopwatchStart => self.handle_stopwatch_start().await,
            IpcRequest::StopwatchStop => self.handle_stopwatch_stop().await,
            IpcRequest::StopwatchReset => self.handle_stopwatch_reset().await,
            IpcRequest::TimerStart { minutes, seconds } => {
                self.handle_timer_start(minutes, seconds).await
            }
            IpcRequest::TimerStop => self.handle_timer_stop().await,
            IpcRequest::TimerReset => self.handle_timer_reset().await,
            IpcRequest::ConfigShow => self.handle_config_show().await,
            IpcRequest::ConfigSet {
                alarm_sound,
                confirm_exit,
            } => self.handle_config_set(alarm_sound, confirm_exit).await,
            IpcRequest::Shutdown { force } => self.handle_shutdown(force).await,
        }
    }

    /// Builds the response data for the engine's selected page.
    fn page_data(engine: &ClockEngine) -> ResponseData {
        let page = engine.page();
        let mut data = ResponseData {
            page: Some(page.as_str().to_string()),
            ..Default::default()
        };

        match page {
            crate::types::Page::Clock => {
                let (time, date) = engine.clock_display();
                data.time = Some(time);
                data.date = Some(date);
            }
            crate::types::Page::Alarms => {
                data.alarms = Some(engine.alarms().iter().map(AlarmInfo::from_entry).collect());
            }
            crate::types::Page::Stopwatch => {
                data.stopwatch = Some(StopwatchInfo::from_state(engine.stopwatch()));
            }
            crate::types::Page::Timer => {
                data.countdown = Some(CountdownInfo::from_state(engine.countdown()));
            }
        }

        data
    }

    /// Handles the status command.
    async fn handle_status(&self) -> IpcResponse {
        let engine = self.engine.lock().await;
        IpcResponse::success("", Some(Self::page_data(&engine)))
    }

    /// Handles the view command.
    async fn handle_view(&self, page: crate::types::Page) -> IpcResponse {
        let mut engine = self.engine.lock().await;
        engine.select_page(page);

        // Persist the selection so a daemon restart comes back on the same
        // page; a failed write degrades to a warning
        {
            let mut settings = self.settings.lock().await;
            settings.settings.page = page;
            if let Err(e) = settings.save() {
                warn!("ページ選択を保存できませんでした: {}", e);
            }
        }

        IpcResponse::success(
            format!("{} ページを表示します", page.as_str()),
            Some(Self::page_data(&engine)),
        )
    }

    /// Handles the alarm add command.
    async fn handle_alarm_add(
        &self,
        hour: u32,
        minute: u32,
        label: Option<String>,
    ) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.add_alarm(hour, minute, label) {
            Ok(entry) => IpcResponse::success(
                format!(
                    "アラームを追加しました: {} - {}",
                    entry.time_display(),
                    entry.label
                ),
                Some(ResponseData {
                    alarms: Some(engine.alarms().iter().map(AlarmInfo::from_entry).collect()),
                    ..Default::default()
                }),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the alarm list command.
    async fn handle_alarm_list(&self) -> IpcResponse {
        let engine = self.engine.lock().await;

        IpcResponse::success(
            "",
            Some(ResponseData {
                alarms: Some(engine.alarms().iter().map(AlarmInfo::from_entry).collect()),
                ..Default::default()
            }),
        )
    }

    /// Handles the alarm delete command.
    ///
    /// A missing or out-of-range index is a no-op, mirroring deletion with
    /// no selection.
    async fn handle_alarm_delete(&self, index: Option<usize>) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        let message = match engine.delete_alarm(index) {
            Some(removed) => format!(
                "アラームを削除しました: {} - {}",
                removed.time_display(),
                removed.label
            ),
            None => "削除対象のアラームがありません".to_string(),
        };

        IpcResponse::success(
            message,
            Some(ResponseData {
                alarms: Some(engine.alarms().iter().map(AlarmInfo::from_entry).collect()),
                ..Default::default()
            }),
        )
    }

    /// Handles the stopwatch start command.
    async fn handle_stopwatch_start(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.start_stopwatch() {
            Ok(()) => IpcResponse::success(
                "ストップウォッチを開始しました",
                Some(ResponseData {
                    stopwatch: Some(StopwatchInfo::from_state(engine.stopwatch())),
                    ..Default::default()
                }),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the stopwatch stop command.
    async fn handle_stopwatch_stop(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.stop_stopwatch() {
            Ok(()) => IpcResponse::success(
                "ストップウォッチを停止しました",
                Some(ResponseData {
                    stopwatch: Some(StopwatchInfo::from_state(engine.stopwatch())),
                    ..Default::default()
                }),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the stopwatch reset command.
    async fn handle_stopwatch_reset(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;
        engine.reset_stopwatch();

        IpcResponse::success(
            "ストップウォッチをリセットしました",
            Some(ResponseData {
                stopwatch: Some(StopwatchInfo::from_state(engine.stopwatch())),
                ..Default::default()
            }),
        )
    }

    /// Handles the timer start command.
    async fn handle_timer_start(&self, minutes: u32, seconds: u32) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.start_countdown(minutes, seconds) {
            Ok(true) => IpcResponse::success(
                "タイマーを開始しました",
                Some(ResponseData {
                    countdown: Some(CountdownInfo::from_state(engine.countdown())),
                    ..Default::default()
                }),
            ),
            // Zero duration: nothing starts, and that is not an error
            Ok(false) => IpcResponse::success(
                "時間が設定されていないため、タイマーは開始されませんでした",
                Some(ResponseData {
                    countdown: Some(CountdownInfo::from_state(engine.countdown())),
                    ..Default::default()
                }),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the timer stop command.
    async fn handle_timer_stop(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;

        match engine.stop_countdown() {
            Ok(()) => IpcResponse::success(
                "タイマーを停止しました",
                Some(ResponseData {
                    countdown: Some(CountdownInfo::from_state(engine.countdown())),
                    ..Default::default()
                }),
            ),
            Err(e) => IpcResponse::error(e.to_string()),
        }
    }

    /// Handles the timer reset command.
    async fn handle_timer_reset(&self) -> IpcResponse {
        let mut engine = self.engine.lock().await;
        engine.reset_countdown();

        IpcResponse::success(
            "タイマーをリセットしました",
            Some(ResponseData {
                countdown: Some(CountdownInfo::from_state(engine.countdown())),
                ..Default::default()
            }),
        )
    }

    /// Handles the config show command.
    async fn handle_config_show(&self) -> IpcResponse {
        let settings = self.settings.lock().await;

        IpcResponse::success(
            "",
            Some(ResponseData {
                alarm_sound: Some(settings.settings.alarm_sound),
                confirm_exit: Some(settings.settings.confirm_exit),
                ..Default::default()
            }),
        )
    }

    /// Handles the config set command.
    async fn handle_config_set(
        &self,
        alarm_sound: Option<bool>,
        confirm_exit: Option<bool>,
    ) -> IpcResponse {
        let mut settings = self.settings.lock().await;

        if let Some(value) = alarm_sound {
            settings.settings.alarm_sound = value;
        }
        if let Some(value) = confirm_exit {
            settings.settings.confirm_exit = value;
        }

        if let Err(e) = settings.save() {
            return IpcResponse::error(e.to_string());
        }

        IpcResponse::success(
            "設定を保存しました",
            Some(ResponseData {
                alarm_sound: Some(settings.settings.alarm_sound),
                confirm_exit: Some(settings.settings.confirm_exit),
                ..Default::default()
            }),
        )
    }

    /// Handles the shutdown command.
    ///
    /// With `confirmExit` enabled, shutdown is refused while the stopwatch
    /// or countdown is running unless `force` is set.
    async fn handle_shutdown(&self, force: bool) -> IpcResponse {
        let engine = self.engine.lock().await;
        let settings = self.settings.lock().await;

        let counter_running = engine.stopwatch().running || engine.countdown().running;
        if settings.settings.confirm_exit && counter_running && !force {
            return IpcResponse::error(
                "タイマーまたはストップウォッチが動作中です。--force を指定すると終了できます",
            );
        }

        if self.shutdown_tx.send(true).is_err() {
            warn!("シャットダウン通知の送信に失敗しました");
        }

        IpcResponse::success("Daemonを終了します", None)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::daemon::engine::ClockEvent;
    use crate::types::Page;
    use chrono::TimeZone;
    use tokio::sync::mpsc;

    // ------------------------------------------------------------------------
    // Helper functions
    // ------------------------------------------------------------------------

    fn create_temp_socket_path() -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sock");
        // Keep the directory so it's not deleted
        std::mem::forget(dir);
        path
    }

    fn create_handler() -> (
        RequestHandler,
        Arc<Mutex<ClockEngine>>,
        mpsc::UnboundedReceiver<ClockEvent>,
        watch::Receiver<bool>,
    ) {
        let clock = Arc::new(MockClock::new(
            chrono::Local
                .with_ymd_and_hms(2025, 1, 1, 12, 0, 1)
                .unwrap(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::new(Mutex::new(ClockEngine::new(clock, tx)));

        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        std::mem::forget(dir);
        let settings = Arc::new(Mutex::new(SettingsStore::load(&settings_path)));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handler = RequestHandler::new(engine.clone(), settings, shutdown_tx);
        (handler, engine, rx, shutdown_rx)
    }

    // ------------------------------------------------------------------------
    // IpcServer Tests
    // ------------------------------------------------------------------------

    mod ipc_server_tests {
        use super::*;

        #[tokio::test]
        async fn test_server_creation() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path);

            assert!(server.is_ok());
            assert!(socket_path.exists());

            drop(server);
        }

        #[tokio::test]
        async fn test_server_removes_existing_socket() {
            let socket_path = create_temp_socket_path();
            std::fs::write(&socket_path, "stale").unwrap();

            let server = IpcServer::new(&socket_path);
            assert!(server.is_ok());
        }

        #[tokio::test]
        async fn test_server_creates_parent_directory() {
            let dir = tempfile::tempdir().unwrap();
            let socket_path = dir.path().join("subdir").join("test.sock");

            let server = IpcServer::new(&socket_path);
            assert!(server.is_ok());
            assert!(socket_path.parent().unwrap().exists());
        }

        #[tokio::test]
        async fn test_receive_request_status() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                stream.write_all(br#"{"command":"status"}"#).await.unwrap();
                stream.flush().await.unwrap();
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await;

            assert!(request.is_ok());
            assert!(matches!(request.unwrap(), IpcRequest::Status));

            client_handle.await.unwrap();
        }

        #[tokio::test]
        async fn test_send_response() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();

                let mut buffer = vec![0u8; 4096];
                let n = stream.read(&mut buffer).await.unwrap();
                serde_json::from_slice::<IpcResponse>(&buffer[..n]).unwrap()
            });

            let mut stream = server.accept().await.unwrap();
            let response = IpcResponse::success("テストメッセージ", None);
            IpcServer::send_response(&mut stream, &response)
                .await
                .unwrap();

            let received = client_handle.await.unwrap();
            assert_eq!(received.status, "success");
            assert_eq!(received.message, "テストメッセージ");
        }

        #[tokio::test]
        async fn test_receive_request_invalid_json() {
            let socket_path = create_temp_socket_path();
            let server = IpcServer::new(&socket_path).unwrap();

            let client_path = socket_path.clone();
            let _client_handle = tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                let mut stream = UnixStream::connect(&client_path).await.unwrap();
                stream.write_all(b"not valid json").await.unwrap();
                stream.flush().await.unwrap();
            });

            let mut stream = server.accept().await.unwrap();
            let request = IpcServer::receive_request(&mut stream).await;

            assert!(request.is_err());
        }

        #[tokio::test]
        async fn test_server_drop_cleanup() {
            let socket_path = create_temp_socket_path();

            {
                let _server = IpcServer::new(&socket_path).unwrap();
                assert!(socket_path.exists());
            }

            assert!(!socket_path.exists());
        }
    }

    // ------------------------------------------------------------------------
    // RequestHandler Tests
    // ------------------------------------------------------------------------

    mod request_handler_tests {
        use super::*;

        #[tokio::test]
        async fn test_handle_status_default_page() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler.handle(IpcRequest::Status).await;

            assert_eq!(response.status, "success");
            let data = response.data.unwrap();
            assert_eq!(data.page, Some("clock".to_string()));
            assert_eq!(data.time, Some("12:00:01".to_string()));
            assert_eq!(data.date, Some("Wednesday, January 1, 2025".to_string()));
        }

        #[tokio::test]
        async fn test_handle_view_switches_page() {
            let (handler, engine, _rx, _shutdown) = create_handler();

            let response = handler
                .handle(IpcRequest::View {
                    page: Page::Stopwatch,
                })
                .await;

            assert_eq!(response.status, "success");
            let data = response.data.unwrap();
            assert_eq!(data.page, Some("stopwatch".to_string()));
            assert!(data.stopwatch.is_some());
            assert!(data.time.is_none());

            assert_eq!(engine.lock().await.page(), Page::Stopwatch);
        }

        #[tokio::test]
        async fn test_handle_view_does_not_disturb_counters() {
            let (handler, engine, _rx, _shutdown) = create_handler();

            handler.handle(IpcRequest::StopwatchStart).await;
            handler
                .handle(IpcRequest::TimerStart {
                    minutes: 0,
                    seconds: 30,
                })
                .await;

            handler.handle(IpcRequest::View { page: Page::Clock }).await;

            let engine = engine.lock().await;
            assert!(engine.stopwatch().running);
            assert!(engine.countdown().running);
        }

        #[tokio::test]
        async fn test_handle_alarm_add() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler
                .handle(IpcRequest::AlarmAdd {
                    hour: 7,
                    minute: 30,
                    label: Some("起床".to_string()),
                })
                .await;

            assert_eq!(response.status, "success");
            assert!(response.message.contains("07:30"));

            let alarms = response.data.unwrap().alarms.unwrap();
            assert_eq!(alarms.len(), 1);
            assert_eq!(alarms[0].time, "07:30");
            assert_eq!(alarms[0].label, "起床");
        }

        #[tokio::test]
        async fn test_handle_alarm_add_invalid_hour() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler
                .handle(IpcRequest::AlarmAdd {
                    hour: 24,
                    minute: 0,
                    label: None,
                })
                .await;

            assert_eq!(response.status, "error");
            assert!(response.message.contains("0-23"));
        }

        #[tokio::test]
        async fn test_handle_alarm_list_empty() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler.handle(IpcRequest::AlarmList).await;

            assert_eq!(response.status, "success");
            assert_eq!(response.data.unwrap().alarms.unwrap().len(), 0);
        }

        #[tokio::test]
        async fn test_handle_alarm_delete() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            handler
                .handle(IpcRequest::AlarmAdd {
                    hour: 6,
                    minute: 0,
                    label: Some("A".to_string()),
                })
                .await;
            handler
                .handle(IpcRequest::AlarmAdd {
                    hour: 7,
                    minute: 0,
                    label: Some("B".to_string()),
                })
                .await;

            let response = handler
                .handle(IpcRequest::AlarmDelete { index: Some(0) })
                .await;

            assert_eq!(response.status, "success");
            assert!(response.message.contains("削除しました"));

            let alarms = response.data.unwrap().alarms.unwrap();
            assert_eq!(alarms.len(), 1);
            assert_eq!(alarms[0].label, "B");
        }

        #[tokio::test]
        async fn test_handle_alarm_delete_no_selection() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            handler
                .handle(IpcRequest::AlarmAdd {
                    hour: 6,
                    minute: 0,
                    label: None,
                })
                .await;

            let response = handler
                .handle(IpcRequest::AlarmDelete { index: None })
                .await;

            assert_eq!(response.status, "success");
            assert!(response.message.contains("削除対象のアラームがありません"));
            assert_eq!(response.data.unwrap().alarms.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn test_handle_alarm_delete_out_of_range() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler
                .handle(IpcRequest::AlarmDelete { index: Some(9) })
                .await;

            assert_eq!(response.status, "success");
            assert!(response.message.contains("削除対象のアラームがありません"));
        }

        #[tokio::test]
        async fn test_handle_stopwatch_start_stop_reset() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler.handle(IpcRequest::StopwatchStart).await;
            assert_eq!(response.status, "success");
            assert!(response.data.unwrap().stopwatch.unwrap().running);

            let response = handler.handle(IpcRequest::StopwatchStop).await;
            assert_eq!(response.status, "success");
            assert!(!response.data.unwrap().stopwatch.unwrap().running);

            let response = handler.handle(IpcRequest::StopwatchReset).await;
            assert_eq!(response.status, "success");
            let stopwatch = response.data.unwrap().stopwatch.unwrap();
            assert_eq!(stopwatch.elapsed_ms, 0);
            assert_eq!(stopwatch.display, "00:00.00");
        }

        #[tokio::test]
        async fn test_handle_stopwatch_start_twice() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            handler.handle(IpcRequest::StopwatchStart).await;
            let response = handler.handle(IpcRequest::StopwatchStart).await;

            assert_eq!(response.status, "error");
            assert!(response.message.contains("既に動作"));
        }

        #[tokio::test]
        async fn test_handle_timer_start() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler
                .handle(IpcRequest::TimerStart {
                    minutes: 1,
                    seconds: 30,
                })
                .await;

            assert_eq!(response.status, "success");
            assert_eq!(response.message, "タイマーを開始しました");

            let countdown = response.data.unwrap().countdown.unwrap();
            assert_eq!(countdown.remaining_seconds, 90);
            assert_eq!(countdown.display, "01:30");
            assert!(countdown.running);
        }

        #[tokio::test]
        async fn test_handle_timer_start_zero_duration() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler
                .handle(IpcRequest::TimerStart {
                    minutes: 0,
                    seconds: 0,
                })
                .await;

            assert_eq!(response.status, "success");
            assert!(response.message.contains("開始されませんでした"));

            let countdown = response.data.unwrap().countdown.unwrap();
            assert!(!countdown.running);
        }

        #[tokio::test]
        async fn test_handle_timer_stop_not_running() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler.handle(IpcRequest::TimerStop).await;

            assert_eq!(response.status, "error");
            assert!(response.message.contains("動作していません"));
        }

        #[tokio::test]
        async fn test_handle_timer_reset_restores_set_duration() {
            let (handler, engine, _rx, _shutdown) = create_handler();

            handler
                .handle(IpcRequest::TimerStart {
                    minutes: 0,
                    seconds: 30,
                })
                .await;

            {
                let mut engine = engine.lock().await;
                engine.tick_countdown().unwrap();
                engine.tick_countdown().unwrap();
                engine.stop_countdown().unwrap();
            }

            let response = handler.handle(IpcRequest::TimerReset).await;

            assert_eq!(response.status, "success");
            let countdown = response.data.unwrap().countdown.unwrap();
            assert_eq!(countdown.remaining_seconds, 30);
            assert!(!countdown.running);
        }

        #[tokio::test]
        async fn test_handle_config_show_defaults() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler.handle(IpcRequest::ConfigShow).await;

            assert_eq!(response.status, "success");
            let data = response.data.unwrap();
            assert_eq!(data.alarm_sound, Some(true));
            assert_eq!(data.confirm_exit, Some(true));
        }

        #[tokio::test]
        async fn test_handle_config_set() {
            let (handler, _engine, _rx, _shutdown) = create_handler();

            let response = handler
                .handle(IpcRequest::ConfigSet {
                    alarm_sound: Some(false),
                    confirm_exit: None,
                })
                .await;

            assert_eq!(response.status, "success");
            let data = response.data.unwrap();
            assert_eq!(data.alarm_sound, Some(false));
            assert_eq!(data.confirm_exit, Some(true));
        }

        #[tokio::test]
        async fn test_handle_shutdown_idle() {
            let (handler, _engine, _rx, shutdown_rx) = create_handler();

            let response = handler.handle(IpcRequest::Shutdown { force: false }).await;

            assert_eq!(response.status, "success");
            assert!(*shutdown_rx.borrow());
        }

        #[tokio::test]
        async fn test_handle_shutdown_refused_while_running() {
            let (handler, _engine, _rx, shutdown_rx) = create_handler();

            handler.handle(IpcRequest::StopwatchStart).await;

            let response = handler.handle(IpcRequest::Shutdown { force: false }).await;

            assert_eq!(response.status, "error");
            assert!(response.message.contains("--force"));
            assert!(!*shutdown_rx.borrow());
        }

        #[tokio::test]
        async fn test_handle_shutdown_forced_while_running() {
            let (handler, _engine, _rx, shutdown_rx) = create_handler();

            handler.handle(IpcRequest::StopwatchStart).await;

            let response = handler.handle(IpcRequest::Shutdown { force: true }).await;

            assert_eq!(response.status, "success");
            assert!(*shutdown_rx.borrow());
        }

        #[tokio::test]
        async fn test_handle_shutdown_with_confirm_exit_disabled() {
            let (handler, _engine, _rx, shutdown_rx) = create_handler();

            handler
                .handle(IpcRequest::ConfigSet {
                    alarm_sound: None,
                    confirm_exit: Some(false),
                })
                .await;
            handler.handle(IpcRequest::StopwatchStart).await;

            let response = handler.handle(IpcRequest::Shutdown { force: false }).await;

            assert_eq!(response.status, "success");
            assert!(*shutdown_rx.borrow());
        }
    }
}
