mod api;
mod input;
mod play;
mod terminal;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use viewsync::LaunchError;
use viewsync::api::game_title;
use viewsync::config::ClientConfig;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("{0}")]
    Launch(#[from] LaunchError),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("websocket failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("gave up after {0} reconnect attempts")]
    ReconnectExhausted(u32),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "nhie", about = "Never Have I Ever terminal client")]
struct Cli {
    #[arg(long, env = "NHIE_BASE_URL", default_value = "http://127.0.0.1:5000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new room and print its id.
    CreateRoom,
    /// Print the game record and question total.
    Info {
        #[arg(long, env = "NHIE_GAME")]
        game: String,
    },
    /// Join a game and play interactively.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[arg(long, env = "NHIE_GAME")]
    game: String,

    #[arg(long, env = "NHIE_PLAYER")]
    player: String,

    #[arg(long, default_value_t = false)]
    host: bool,

    #[arg(long, default_value_t = 5)]
    reconnect_attempts: u32,

    #[arg(long, default_value_t = 1000)]
    reconnect_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // stdout belongs to the game view; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::with_origin(cli.base_url.trim());

    match cli.command {
        Command::CreateRoom => run_create_room(&config).await,
        Command::Info { game } => run_info(&config, &game).await,
        Command::Play(args) => {
            config.reconnect = play::policy_from_args(&args);
            play::run_play(&config, args).await
        }
    }
}

async fn run_create_room(config: &ClientConfig) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let room_id = api::create_room(&client, config).await?;
    println!("{room_id}");
    eprintln!("join as host with: nhie play --game {room_id} --player <id> --host");
    Ok(())
}

async fn run_info(config: &ClientConfig, game: &str) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let info = api::fetch_game_info(&client, config, game).await?;
    let question_count = match api::fetch_question_count(&client, config, game).await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!("question total unavailable: {e}");
            None
        }
    };

    let players = info
        .players
        .iter()
        .map(|p| serde_json::json!({ "name": p.name, "is_host": p.is_host }))
        .collect::<Vec<Value>>();
    let summary = serde_json::json!({
        "game": game,
        "title": game_title(info.game_modes.as_deref()),
        "players": players,
        "question_count": question_count,
    });
    print_json(&summary)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
