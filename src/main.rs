mod api;
mod clock;
mod config;
mod conn;
mod dashboard;
mod state;
mod surface;
#[cfg(test)]
mod test_support;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use maze::{MazeSnapshot, Projector};
use tokio::sync::mpsc;
use tracing::warn;
use wire::{Decoder, Event};

use crate::api::{ApiClient, ApiError};
use crate::config::{ConfigArgs, ConfigError, DashboardConfig};
use crate::conn::{ConnError, Controller};
use crate::dashboard::{ActionError, Dashboard, UserAction};
use crate::surface::ConsoleSurface;

const ACTION_BUFFER: usize = 32;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not load .env: {0}")]
    Env(#[from] dotenvy::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Conn(#[from] ConnError),
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("`{0}` is not a command that can be sent")]
    NotACommand(String),
    #[error("command was not sent: stream closed")]
    NotSent,
    #[error("maze file decode failed: {0}")]
    Decode(#[from] wire::DecodeError),
    #[error("expected a maze event, found `{0}`")]
    NotAMaze(&'static str),
    #[error("io failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Parser, Debug)]
#[command(name = "roverdeck", about = "Remote-operations dashboard for a maze rover")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Run the live dashboard. Stdin lines: start, stop, say <text>, maze <id>, reset, quit.
    Watch {
        /// Write the current maze as SVG to this path on every update.
        #[arg(long)]
        svg_out: Option<PathBuf>,
    },
    /// Print the rover connection status reported by the controller.
    Status,
    /// Print the controller's log history.
    Logs,
    /// Print identifiers of previously explored mazes.
    History,
    /// Ask the controller to clear its log.
    ResetLogs,
    /// Send one command: start | stop | say <text> | maze <id>.
    Send {
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
    /// Decode a saved maze event and render it offline.
    Render {
        file: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Emit the projected primitives as JSON instead of SVG.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            return Err(CliError::Env(error));
        }
    }

    let cli = Cli::parse();
    let config = cli.config.resolve()?;

    match cli.command.unwrap_or(CliCommand::Watch { svg_out: None }) {
        CliCommand::Watch { svg_out } => run_watch(config, svg_out).await,
        CliCommand::Status => {
            let connected = api_client(&config)?.fetch_connection_status().await?;
            println!("{}", state::ConnectionState::from_flag(connected).label());
            Ok(())
        }
        CliCommand::Logs => {
            for entry in api_client(&config)?.fetch_logs().await? {
                println!("{} - {}", entry.time, entry.message);
            }
            Ok(())
        }
        CliCommand::History => {
            for id in api_client(&config)?.fetch_maze_history().await? {
                println!("{id}");
            }
            Ok(())
        }
        CliCommand::ResetLogs => {
            api_client(&config)?.reset_logs().await?;
            println!("logs cleared");
            Ok(())
        }
        CliCommand::Send { words } => run_send(&config, &words.join(" ")).await,
        CliCommand::Render { file, out, json } => run_render(&config, &file, out, json),
    }
}

fn api_client(config: &DashboardConfig) -> Result<ApiClient, CliError> {
    Ok(ApiClient::new(&config.base_url, config.http_timeout)?)
}

async fn run_watch(config: DashboardConfig, svg_out: Option<PathBuf>) -> Result<(), CliError> {
    let api = api_client(&config)?;
    let surface = ConsoleSurface::new(io::stdout(), svg_out);
    let (actions_tx, actions_rx) = mpsc::channel(ACTION_BUFFER);

    spawn_stdin_reader(actions_tx.clone());
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "watch: ctrl-c handler unavailable");
            return;
        }
        if actions_tx.send(UserAction::Quit).await.is_err() {
            tracing::debug!("watch: dashboard already stopped");
        }
    });

    tracing::info!(base_url = api.base_url(), stream = %config.ws_url, variant = %config.variant, "watch: starting");
    let (store, surface) = Dashboard::new(config, api, surface).run(actions_rx).await;
    tracing::info!(
        log_entries = store.log().len(),
        log_capacity = store.log_capacity(),
        status = store.connection().label(),
        svgs_written = surface.mazes_written(),
        "watch: session ended"
    );
    Ok(())
}

/// Stdin is read on a plain thread: a blocking read must not hold up
/// runtime shutdown once the dashboard quits.
fn spawn_stdin_reader(actions: mpsc::Sender<UserAction>) {
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(error) => {
                    warn!(%error, "watch: stdin read failed");
                    break;
                }
            };
            match UserAction::parse(&line) {
                Ok(Some(action)) => {
                    let quit = action == UserAction::Quit;
                    if actions.blocking_send(action).is_err() || quit {
                        break;
                    }
                }
                Ok(None) => {}
                Err(error) => eprintln!("{error}"),
            }
        }
    });
}

async fn run_send(config: &DashboardConfig, line: &str) -> Result<(), CliError> {
    let command = match UserAction::parse(line)? {
        Some(UserAction::Send(command)) => command,
        _ => return Err(CliError::NotACommand(line.to_owned())),
    };

    let (events_tx, mut events_rx) = mpsc::channel(16);
    let mut controller = Controller::new(config.ws_url.clone(), Decoder::new(config.variant))
        .with_connect_timeout(config.http_timeout);
    controller.open(events_tx).await?;
    let drain = tokio::spawn(async move { while events_rx.recv().await.is_some() {} });

    let sent = controller.send(&command);
    controller.close().await;
    drain.await?;
    if !sent {
        return Err(CliError::NotSent);
    }
    println!("sent {}", command.kind());
    Ok(())
}

fn run_render(config: &DashboardConfig, file: &Path, out: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let text = std::fs::read_to_string(file)?;
    let snapshot: MazeSnapshot = match Decoder::new(config.variant).decode(&text)? {
        Event::Maze(snapshot) => snapshot,
        other => return Err(CliError::NotAMaze(other.kind())),
    };
    let scene = Projector::new(config.cell_size).project(&snapshot);
    let rendered = if json { serde_json::to_string_pretty(&scene)? } else { maze::svg::to_svg(&scene) };

    match out {
        Some(path) => std::fs::write(path, rendered)?,
        None => io::stdout().write_all(rendered.as_bytes())?,
    }
    Ok(())
}
