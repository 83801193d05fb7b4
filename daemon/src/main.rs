mod config;
mod ddc;
mod event;
mod instance;
mod paths;
mod process_monitor;
mod state;
mod status;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::ddc::{DdcDisplay, DisplayControl, DisplaySetting};
use crate::event::DaemonEvent;
use crate::state::{Mode, ModeState, Profiles, Transition};

#[derive(Parser)]
#[command(
    name = "swapper-daemon",
    version,
    about = "Switches monitor brightness/contrast profiles over DDC/CI while a watched game process is running"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the monitor's current brightness and contrast, then exit.
    Read,
    /// Apply one of the configured profiles once, then exit.
    Apply {
        #[arg(value_enum)]
        profile: ProfileArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ProfileArg {
    Game,
    Desktop,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app_dir = paths::app_data_dir();
    std::fs::create_dir_all(&app_dir)
        .with_context(|| format!("failed to create app data directory {}", app_dir.display()))?;

    // Invalid configuration is startup-fatal; the daemon must not begin
    // monitoring with unusable settings.
    let config = config::load(&paths::config_file_path())?;

    match cli.command {
        Some(Command::Read) => read_once(),
        Some(Command::Apply { profile }) => apply_once(&config, profile),
        None => run_daemon(config).await,
    }
}

/// Diagnostic one-shot: report what the panel currently shows.
fn read_once() -> Result<()> {
    let setting = DdcDisplay
        .read()
        .context("could not read monitor settings")?;
    println!("brightness: {}", setting.brightness);
    println!("contrast:   {}", setting.contrast);
    Ok(())
}

/// Diagnostic one-shot: force a configured profile onto the panel.
fn apply_once(config: &Config, profile: ProfileArg) -> Result<()> {
    let setting = match profile {
        ProfileArg::Game => config.game_mode.as_setting(),
        ProfileArg::Desktop => config.desktop_mode.as_setting(),
    };
    DdcDisplay
        .apply(setting)
        .context("could not apply profile")?;
    println!(
        "applied brightness {} / contrast {}",
        setting.brightness, setting.contrast
    );
    Ok(())
}

async fn run_daemon(config: Config) -> Result<()> {
    let _lock = instance::InstanceLock::acquire(&paths::pid_file_path())
        .context("refusing to start")?;

    let status_path = paths::status_file_path();
    let mut current_status = status::DaemonStatus::new();
    status::write_status(&status_path, &current_status);

    let (event_tx, mut event_rx) = mpsc::channel::<DaemonEvent>(32);

    tokio::spawn(process_monitor::run(
        config.game_processes.clone(),
        config.poll_interval_secs,
        event_tx.clone(),
    ));

    // Graceful shutdown on Ctrl+C.
    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(DaemonEvent::Shutdown).await;
            }
        });
    }

    info!("swapper-daemon v{} started", env!("CARGO_PKG_VERSION"));
    info!(
        "watching for {:?} every {}s",
        config.game_processes, config.poll_interval_secs
    );

    let profiles = Profiles {
        game: config.game_mode.as_setting(),
        desktop: config.desktop_mode.as_setting(),
    };
    let mut hw = DdcDisplay;
    let mut mode_state = ModeState::new();

    // One event at a time: a cycle finishes, blocking hardware calls
    // included, before the next detection result is even looked at.
    while let Some(evt) = event_rx.recv().await {
        match evt {
            DaemonEvent::Detection { matched } => {
                let detected = matched.is_some();
                match mode_state.observe(detected, &profiles, &mut hw) {
                    Ok(Some(Transition::EnteredGame)) => {
                        info!(
                            "detected {}; game profile applied",
                            matched.as_deref().unwrap_or("<unknown>")
                        );
                        current_status.mode = Mode::Game;
                        current_status.active_process = matched;
                        current_status.last_transition = Some(chrono::Local::now().to_rfc3339());
                        current_status.error = None;
                        status::write_status(&status_path, &current_status);
                    }
                    Ok(Some(Transition::ExitedGame)) => {
                        info!("game closed; previous monitor settings restored");
                        current_status.mode = Mode::Desktop;
                        current_status.active_process = None;
                        current_status.last_transition = Some(chrono::Local::now().to_rfc3339());
                        current_status.error = None;
                        status::write_status(&status_path, &current_status);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // Contained within this cycle; the unchanged detection
                        // result drives the retry on the next poll.
                        warn!("profile switch failed, retrying next poll: {e}");
                        current_status.error = Some(e.to_string());
                        status::write_status(&status_path, &current_status);
                    }
                }
            }

            DaemonEvent::Shutdown => {
                info!("shutting down");
                if mode_state.mode() == Mode::Game {
                    if let Some(saved) = mode_state.saved() {
                        restore_on_shutdown(&mut hw, saved);
                    }
                }
                current_status.mode = Mode::Desktop;
                current_status.active_process = None;
                current_status.error = None;
                status::write_status(&status_path, &current_status);
                break;
            }
        }
    }

    Ok(())
}

/// Best-effort restore when exiting while a game is still running. The user
/// is quitting the daemon, not the game, so leaving the panel stuck on the
/// game profile is the only alternative.
fn restore_on_shutdown(hw: &mut dyn DisplayControl, saved: DisplaySetting) {
    if let Err(e) = hw.apply(saved) {
        warn!("could not restore monitor settings on shutdown: {e}");
    }
}
