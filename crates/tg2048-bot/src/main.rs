use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tg2048_bot::console::ConsoleTransport;
use tg2048_bot::{Bot, Config};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play 2048 over a chat transport (console by default)")]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,
    /// Seed for reproducible games (overrides [game].seed)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
    /// Optional tracing filter, e.g. "info", "debug".
    #[arg(long, default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log.clone()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            Config::from_toml(path)?
        }
        None => Config::default(),
    };
    if args.seed.is_some() {
        config.game.seed = args.seed;
    }
    match config.token() {
        Ok(_) => info!(var = %config.bot.token_env, "access token present"),
        Err(_) => info!(var = %config.bot.token_env, "no access token set; console transport needs none"),
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    let poll_timeout = Duration::from_secs(config.bot.poll_timeout_s.max(1));
    let mut transport = ConsoleTransport::stdio(config.console.default_user, poll_timeout);
    let mut bot = Bot::new(&config);
    info!(seed = ?config.game.seed, "bot started; one message per line, `@<id> text` to play as another user");
    if let Err(err) = bot.run(&mut transport, cancel).await {
        error!(error = %err, "bot failed");
        return Err(err);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
