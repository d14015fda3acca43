//! Desk Clock CLI - clock, alarms, stopwatch, and countdown timer
//!
//! The daemon owns the four views and their tick sources; this binary is
//! both the daemon entry point (`deskclock daemon`) and the thin client
//! for every other command.

use anyhow::Result;
use clap::{CommandFactory, Parser};

use deskclock::cli::{
    AlarmCommands, Cli, Commands, Display, IpcClient, StopwatchCommands, TimerCommands,
};
use deskclock::daemon::service;
use deskclock::settings::SettingsStore;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Status) => {
            let client = IpcClient::new()?;
            let response = client.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::View { page }) => {
            let client = IpcClient::new()?;
            let response = client.view(page).await?;
            Display::show_view(&response);
        }
        Some(Commands::Alarm(command)) => {
            let client = IpcClient::new()?;
            let response = match command {
                AlarmCommands::Add(args) => {
                    let (hour, minute) = args.time;
                    client.alarm_add(hour, minute, args.label).await?
                }
                AlarmCommands::List => client.alarm_list().await?,
                // The list is shown 1-based; the registry is 0-based
                AlarmCommands::Delete { number } => {
                    client.alarm_delete(Some(number - 1)).await?
                }
            };
            Display::show_alarms(&response);
        }
        Some(Commands::Stopwatch(command)) => {
            let client = IpcClient::new()?;
            let response = match command {
                StopwatchCommands::Start => client.stopwatch_start().await?,
                StopwatchCommands::Stop => client.stopwatch_stop().await?,
                StopwatchCommands::Reset => client.stopwatch_reset().await?,
            };
            Display::show_stopwatch(&response);
        }
        Some(Commands::Timer(command)) => {
            let client = IpcClient::new()?;
            let response = match command {
                TimerCommands::Start(args) => {
                    client.timer_start(args.minutes, args.seconds).await?
                }
                TimerCommands::Stop => client.timer_stop().await?,
                TimerCommands::Reset => client.timer_reset().await?,
            };
            Display::show_timer(&response);
        }
        Some(Commands::Config(args)) => {
            let client = IpcClient::new()?;
            let response = if args.is_show() {
                client.config_show().await?
            } else {
                client.config_set(args.alarm_sound, args.confirm_exit).await?
            };
            Display::show_config(&response);
        }
        Some(Commands::Daemon) => {
            let socket_path = service::default_socket_path()?;
            let settings_path = SettingsStore::default_path()?;
            service::run(&socket_path, &settings_path).await?;
        }
        Some(Commands::Shutdown { force }) => {
            let client = IpcClient::new()?;
            let response = client.shutdown(force).await?;
            Display::show_shutdown(&response);
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
