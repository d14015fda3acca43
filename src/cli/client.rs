//! IPC client for communicating with the desk clock daemon.
//!
//! This module provides:
//! - Unix Domain Socket client
//! - Request/response handling per command
//! - Connection retry logic
//! - Timeout handling

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::timeout;

use crate::types::{IpcRequest, IpcResponse, Page};

// ============================================================================
// Constants
// ============================================================================

/// Default socket path relative to the home directory
const DEFAULT_SOCKET_PATH: &str = ".deskclock/deskclock.sock";

/// Connection timeout in seconds
const CONNECTION_TIMEOUT_SECS: u64 = 5;

/// Read/write timeout in seconds
const IO_TIMEOUT_SECS: u64 = 5;

/// Maximum response size in bytes (64KB)
const MAX_RESPONSE_SIZE: usize = 65536;

/// Maximum retry attempts
const MAX_RETRIES: u32 = 3;

/// Retry delay in milliseconds (base delay, multiplied by attempt number)
const RETRY_DELAY_MS: u64 = 500;

// ============================================================================
// IpcClient
// ============================================================================

/// IPC client for daemon communication.
pub struct IpcClient {
    /// Socket path
    socket_path: PathBuf,
    /// Connection timeout
    timeout: Duration,
}

impl IpcClient {
    /// Creates a new IPC client with the default socket path.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let socket_path = Self::default_socket_path()?;
        Ok(Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        })
    }

    /// Creates a new IPC client with a custom socket path.
    pub fn with_socket_path(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            timeout: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        }
    }

    /// Returns the default socket path.
    fn default_socket_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME環境変数が設定されていません")?;
        Ok(PathBuf::from(home).join(DEFAULT_SOCKET_PATH))
    }

    /// Returns the socket path.
    pub fn socket_path(&self) -> &PathBuf {
        &self.socket_path
    }

    /// Queries the currently selected page.
    pub async fn status(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Status).await
    }

    /// Selects a page and returns its display.
    pub async fn view(&self, page: Page) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::View { page })
            .await
    }

    /// Adds an alarm.
    pub async fn alarm_add(
        &self,
        hour: u32,
        minute: u32,
        label: Option<String>,
    ) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::AlarmAdd {
            hour,
            minute,
            label,
        })
        .await
    }

    /// Lists alarms.
    pub async fn alarm_list(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::AlarmList).await
    }

    /// Deletes the alarm at the given position.
    pub async fn alarm_delete(&self, index: Option<usize>) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::AlarmDelete { index })
            .await
    }

    /// Starts the stopwatch.
    pub async fn stopwatch_start(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::StopwatchStart)
            .await
    }

    /// Stops the stopwatch.
    pub async fn stopwatch_stop(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::StopwatchStop)
            .await
    }

    /// Zeroes the stopwatch counter.
    pub async fn stopwatch_reset(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::StopwatchReset)
            .await
    }

    /// Configures and starts the countdown timer.
    pub async fn timer_start(&self, minutes: u32, seconds: u32) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::TimerStart { minutes, seconds })
            .await
    }

    /// Pauses the countdown timer.
    pub async fn timer_stop(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::TimerStop).await
    }

    /// Recomputes the countdown from its configured duration.
    pub async fn timer_reset(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::TimerReset).await
    }

    /// Shows the persisted preferences.
    pub async fn config_show(&self) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::ConfigShow).await
    }

    /// Updates the persisted preferences.
    pub async fn config_set(
        &self,
        alarm_sound: Option<bool>,
        confirm_exit: Option<bool>,
    ) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::ConfigSet {
            alarm_sound,
            confirm_exit,
        })
        .await
    }

    /// Requests daemon shutdown.
    pub async fn shutdown(&self, force: bool) -> Result<IpcResponse> {
        self.send_request_with_retry(&IpcRequest::Shutdown { force })
            .await
    }

    /// Sends a request to the daemon with retry logic.
    async fn send_request_with_retry(&self, request: &IpcRequest) -> Result<IpcResponse> {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match self.send_request(request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    tracing::warn!("リクエスト失敗 (試行 {}/{}): {}", attempt, MAX_RETRIES, e);
                    last_error = Some(e);

                    if attempt < MAX_RETRIES {
                        let delay = Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt));
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap())
    }

    /// Sends a single request to the daemon.
    async fn send_request(&self, request: &IpcRequest) -> Result<IpcResponse> {
        // Connect with timeout
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .context("接続がタイムアウトしました")?
            .context("Daemonに接続できません。'deskclock daemon' を起動してください")?;

        // Serialize request
        let request_json =
            serde_json::to_string(request).context("リクエストのシリアライズに失敗しました")?;

        // Send request with timeout
        timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.write_all(request_json.as_bytes()),
        )
        .await
        .context("書き込みがタイムアウトしました")?
        .context("リクエストの送信に失敗しました")?;

        // Flush
        timeout(Duration::from_secs(IO_TIMEOUT_SECS), stream.flush())
            .await
            .context("フラッシュがタイムアウトしました")?
            .context("フラッシュに失敗しました")?;

        // Shutdown write side to signal end of request
        stream
            .shutdown()
            .await
            .context("シャットダウンに失敗しました")?;

        // Read response with timeout
        let mut buffer = vec![0u8; MAX_RESPONSE_SIZE];
        let n = timeout(
            Duration::from_secs(IO_TIMEOUT_SECS),
            stream.read(&mut buffer),
        )
        .await
        .context("読み込みがタイムアウトしました")?
        .context("レスポンスの受信に失敗しました")?;

        if n == 0 {
            anyhow::bail!("Daemonからの応答がありませんでした");
        }

        // Deserialize response
        let response: IpcResponse =
            serde_json::from_slice(&buffer[..n]).context("レスポンスのパースに失敗しました")?;

        // Check for error response
        if response.status == "error" {
            anyhow::bail!("{}", response.message);
        }

        Ok(response)
    }
}

// ============================================================================
// Tests
// ============================================================================
