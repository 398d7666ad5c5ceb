mod config;
mod render;

use anyhow::Context;
use chrono::Utc;
use lexis::{ConnectivityState, HttpGateway, MessageId, SendOutcome, Session};
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const HELP: &str = "\
Commands:
  /clear   start a new conversation
  /retry   reconnect to the backend now
  /status  show backend and model status
  /help    show this help
  /quit    exit
Anything else is sent as a message.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Send(String),
    Clear,
    Retry,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown command: /{0} (try /help)")]
struct UnknownCommand(String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(name) = line.trim().strip_prefix('/') else {
            return Ok(Self::Send(line.to_string()));
        };

        match name {
            "clear" => Ok(Self::Clear),
            "retry" => Ok(Self::Retry),
            "status" => Ok(Self::Status),
            "help" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config);

    tracing::info!("Starting Lexis terminal client");
    tracing::info!("Backend: {}", config.gateway.base_url);

    let gateway = Arc::new(
        HttpGateway::from_config(&config.gateway).context("Invalid gateway configuration")?,
    );
    let session = Session::builder()
        .gateway(gateway)
        .options(config.session.clone().into())
        .build()?;

    session.start();
    // Joins the first poll fired by start()
    let state = session.monitor().check_now().await;
    println!("{}", render::status(&state));

    let watcher = spawn_status_watcher(session.monitor().subscribe());
    let mut printed = print_new(&session, None, true);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(
            "{}",
            render::prompt(session.monitor().is_connected(), &session.conversation().snapshot())
        );
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Err(e) => println!("{}", e),
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Status) => println!("{}", render::status(&session.connectivity())),
            Ok(Command::Retry) => {
                let state = session.retry_connection().await;
                println!("{}", render::status(&state));
            }
            Ok(Command::Clear) => {
                session.clear().await;
                printed = print_new(&session, printed, false);
            }
            Ok(Command::Send(text)) => match session.send(&text).await {
                SendOutcome::Rejected(reason) => println!("Not sent: {}", reason),
                SendOutcome::Discarded => {}
                SendOutcome::Replied | SendOutcome::Failed(_) => {
                    printed = print_new(&session, printed, false);
                    if let Some(banner) = session.conversation().last_error() {
                        println!("! {}", banner);
                    }
                }
            },
        }
    }

    session.stop();
    watcher.abort();
    tracing::info!("Lexis terminal client stopped");

    Ok(())
}

/// Print messages newer than `after`; user turns are skipped unless
/// `include_user` since the terminal already echoed them
fn print_new(session: &Session, after: Option<MessageId>, include_user: bool) -> Option<MessageId> {
    let now = Utc::now();
    let snapshot = session.conversation().snapshot();

    for message in snapshot
        .messages
        .iter()
        .filter(|message| after.map_or(true, |id| message.id() > id))
        .filter(|message| include_user || !message.is_user())
    {
        println!("{}", render::message(message, now));
    }

    snapshot.last_message().map(|message| message.id()).or(after)
}

/// Announce connectivity flips between prompts
fn spawn_status_watcher(mut updates: watch::Receiver<ConnectivityState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut connected = updates.borrow_and_update().connected;
        while updates.changed().await.is_ok() {
            let state = *updates.borrow_and_update();
            if state.connected != connected {
                connected = state.connected;
                println!("\n-- {}", render::status(&state));
            }
        }
    })
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout belongs to the conversation
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("/clear".parse::<Command>(), Ok(Command::Clear));
        assert_eq!("  /retry ".parse::<Command>(), Ok(Command::Retry));
        assert_eq!("/exit".parse::<Command>(), Ok(Command::Quit));
        assert_eq!(
            "hello /clear".parse::<Command>(),
            Ok(Command::Send("hello /clear".to_string()))
        );
        assert_eq!(
            "/nope".parse::<Command>(),
            Err(UnknownCommand("nope".to_string()))
        );
    }
}
