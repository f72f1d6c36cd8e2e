use clap::Parser;
use std::io::{self, BufRead};
use std::sync::Arc;
use taskbot::cli::Cli;
use taskbot::gateway::{ConsoleGateway, Gateway, Inbound};
use taskbot::runtime;
use taskbot_core::config;
use taskbot_core::engine::Engine;
use taskbot_core::storage::JsonStore;
use tokio::sync::{Mutex, mpsc};
use tracing_subscriber::EnvFilter;

const INBOUND_QUEUE_DEPTH: usize = 32;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // The gateway token is the one piece of config the bot cannot run
    // without; anything wrong with it aborts startup.
    let config = match &cli.config {
        Some(path) => config::load_config_from_path(path),
        None => config::load_config(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };
    tracing::info!(token_len = config.token.len(), "gateway token loaded");

    let store = match &cli.store {
        Some(path) => Ok(JsonStore::new(path.clone())),
        None => JsonStore::at_default_path(),
    };
    let store = match store {
        Ok(store) => store,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    let engine = Arc::new(Mutex::new(Engine::new(Box::new(store))));
    let gateway: Arc<dyn Gateway> = Arc::new(ConsoleGateway);

    let (tx, rx) = mpsc::channel(INBOUND_QUEUE_DEPTH);
    let chat_id = cli.chat_id;
    std::thread::spawn(move || read_stdin(chat_id, tx));

    runtime::run(engine, gateway, rx).await;
}

/// Blocking stdin reader: each non-empty line becomes one inbound message
/// for the console chat. EOF ends the inbound stream and drains the bot.
fn read_stdin(chat_id: i64, tx: mpsc::Sender<Inbound>) {
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();
    let mut input = String::new();

    loop {
        input.clear();
        match stdin_lock.read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {
                let line = input.trim();
                if line.is_empty() {
                    continue;
                }
                let message = Inbound {
                    chat_id,
                    text: line.to_string(),
                };
                if tx.blocking_send(message).is_err() {
                    break;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stdin");
                break;
            }
        }
    }
}
