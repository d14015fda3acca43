//! Display utilities for the desk clock CLI.
//!
//! This module provides formatted output for:
//! - Page displays (clock, alarms, stopwatch, timer)
//! - Success messages
//! - Error messages

use crate::types::{AlarmInfo, IpcResponse, ResponseData};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the currently selected page.
    pub fn show_status(response: &IpcResponse) {
        let Some(data) = &response.data else {
            println!("Daemonから情報を取得できませんでした");
            return;
        };

        match data.page.as_deref() {
            Some("clock") => Self::show_clock_page(data),
            Some("alarms") => Self::show_alarms_page(data),
            Some("stopwatch") => Self::show_stopwatch_page(data),
            Some("timer") => Self::show_timer_page(data),
            _ => println!("{}", response.message),
        }
    }

    /// Shows the clock page.
    fn show_clock_page(data: &ResponseData) {
        println!("時計");
        println!("─────────────────────────────");
        if let Some(time) = &data.time {
            println!("{}", time);
        }
        if let Some(date) = &data.date {
            println!("{}", date);
        }
    }

    /// Shows the alarms page.
    fn show_alarms_page(data: &ResponseData) {
        println!("アラーム");
        println!("─────────────────────────────");
        match &data.alarms {
            Some(alarms) if !alarms.is_empty() => Self::print_alarm_list(alarms),
            _ => println!("アラームはありません"),
        }
    }

    /// Shows the stopwatch page.
    fn show_stopwatch_page(data: &ResponseData) {
        println!("ストップウォッチ");
        println!("─────────────────────────────");
        if let Some(stopwatch) = &data.stopwatch {
            let state = if stopwatch.running { "計測中" } else { "停止中" };
            println!("{}  ({})", stopwatch.display, state);
        }
    }

    /// Shows the timer page.
    fn show_timer_page(data: &ResponseData) {
        println!("タイマー");
        println!("─────────────────────────────");
        if let Some(countdown) = &data.countdown {
            let state = if countdown.running { "動作中" } else { "停止中" };
            println!("{}  ({})", countdown.display, state);
        }
    }

    /// Shows the alarm list after add/delete/list commands.
    pub fn show_alarms(response: &IpcResponse) {
        if !response.message.is_empty() {
            println!("{}", response.message);
        }

        if let Some(data) = &response.data {
            match &data.alarms {
                Some(alarms) if !alarms.is_empty() => Self::print_alarm_list(alarms),
                _ => println!("アラームはありません"),
            }
        }
    }

    /// Prints numbered alarm entries.
    fn print_alarm_list(alarms: &[AlarmInfo]) {
        for (i, alarm) in alarms.iter().enumerate() {
            let state = if alarm.enabled { "有効" } else { "無効" };
            println!("{}. {} - {} [{}]", i + 1, alarm.time, alarm.label, state);
        }
    }

    /// Shows the result of a stopwatch command.
    pub fn show_stopwatch(response: &IpcResponse) {
        println!("{}", response.message);

        if let Some(data) = &response.data {
            if let Some(stopwatch) = &data.stopwatch {
                println!("  経過時間: {}", stopwatch.display);
            }
        }
    }

    /// Shows the result of a timer command.
    pub fn show_timer(response: &IpcResponse) {
        println!("{}", response.message);

        if let Some(data) = &response.data {
            if let Some(countdown) = &data.countdown {
                println!("  残り時間: {}", countdown.display);
            }
        }
    }

    /// Shows the result of a view command.
    pub fn show_view(response: &IpcResponse) {
        Self::show_status(response);
    }

    /// Shows the persisted preferences.
    pub fn show_config(response: &IpcResponse) {
        if !response.message.is_empty() {
            println!("{}", response.message);
        }

        if let Some(data) = &response.data {
            if let Some(alarm_sound) = data.alarm_sound {
                println!("  アラーム音: {}", Self::format_flag(alarm_sound));
            }
            if let Some(confirm_exit) = data.confirm_exit {
                println!("  終了確認: {}", Self::format_flag(confirm_exit));
            }
        }
    }

    /// Shows the result of a shutdown command.
    pub fn show_shutdown(response: &IpcResponse) {
        println!("{}", response.message);
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }

    /// Formats a boolean preference.
    fn format_flag(value: bool) -> &'static str {
        if value {
            "有効"
        } else {
            "無効"
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
    fn test_format_flag() {
        assert_eq!(Display::format_flag(true), "有効");
        assert_eq!(Display::format_flag(false), "無効");
    }

    // Output itself goes to stdout; these verify the renderers accept every
    // response shape without panicking.

    #[test]
    fn test_show_status_handles_missing_data() {
        let response = IpcResponse::success("", None);
        Display::show_status(&response);
    }

    #[test]
    fn test_show_status_clock_page() {
        let response = IpcResponse::success(
            "",
            Some(ResponseData {
                page: Some("clock".to_string()),
                time: Some("12:34:56".to_string()),
                date: Some("Wednesday, January 1, 2025".to_string()),
                ..Default::default()
            }),
        );
        Display::show_status(&response);
    }

    #[test]
    fn test_show_alarms_empty() {
        let response = IpcResponse::success(
            "",
            Some(ResponseData {
                alarms: Some(vec![]),
                ..Default::default()
            }),
        );
        Display::show_alarms(&response);
    }

    #[test]
    fn test_show_alarms_with_entries() {
        let response = IpcResponse::success(
            "アラームを追加しました: 07:30 - 起床",
            Some(ResponseData {
                alarms: Some(vec![AlarmInfo {
                    time: "07:30".to_string(),
                    label: "起床".to_string(),
                    enabled: true,
                }]),
                ..Default::default()
            }),
        );
        Display::show_alarms(&response);
    }

    #[test]
    fn test_show_stopwatch() {
        let response = IpcResponse::success(
            "ストップウォッチを開始しました",
            Some(ResponseData {
                stopwatch: Some(crate::types::StopwatchInfo {
                    display: "01:05.43".to_string(),
                    elapsed_ms: 65_432,
                    running: true,
                }),
                ..Default::default()
            }),
        );
        Display::show_stopwatch(&response);
    }

    #[test]
    fn test_show_timer() {
        let response = IpcResponse::success(
            "タイマーを開始しました",
            Some(ResponseData {
                countdown: Some(crate::types::CountdownInfo {
                    display: "01:15".to_string(),
                    remaining_seconds: 75,
                    running: true,
                }),
                ..Default::default()
            }),
        );
        Display::show_timer(&response);
    }

    #[test]
    fn test_show_config() {
        let response = IpcResponse::success(
            "設定を保存しました",
            Some(ResponseData {
                alarm_sound: Some(true),
                confirm_exit: Some(false),
                ..Default::default()
            }),
        );
        Display::show_config(&response);
    }
}
