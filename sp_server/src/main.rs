//! Single-table no-limit hold'em server.
//!
//! Hosts one six-seat table behind a WebSocket endpoint and serves the
//! static lobby assets next to it. All game state lives in the table
//! actor spawned at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Error;
use axum::{routing::get, Router};
use pico_args::Arguments;
use tower_http::services::ServeDir;

use sixmax_poker::{constants, TableActor};
use sp_server::{config::ServerConfig, logging, ws};

const HELP: &str = "\
Run a single-table no-limit hold'em server

USAGE:
  sp_server [OPTIONS]

OPTIONS:
  --bind    IP:PORT    Server socket bind address  [default: env PORT on 127.0.0.1, or 127.0.0.1:8080]
  --assets  DIR        Static lobby asset directory  [default: ./assets]

FLAGS:
  -h, --help           Print help information

ENVIRONMENT:
  PORT                 Listen port when --bind is not given
";

struct Args {
    bind: Option<SocketAddr>,
    assets: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        assets: pargs.opt_value_from_str("--assets")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.assets)
        .map_err(|e| anyhow::anyhow!("configuration error: {e}"))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("configuration validation failed: {e}"))?;

    tracing::info!(
        "starting table: {} seats, blinds {}/{}, starting stack {}",
        constants::MAX_SEATS,
        constants::SMALL_BLIND,
        constants::BIG_BLIND,
        constants::DEFAULT_STARTING_STACK,
    );

    let (actor, handle) = TableActor::new(
        constants::DEFAULT_STARTING_STACK,
        constants::SMALL_BLIND,
        constants::BIG_BLIND,
    );
    tokio::spawn(actor.run());

    let app = Router::new()
        .route("/ws", get(ws::websocket_handler))
        .fallback_service(ServeDir::new(&config.assets_dir))
        .with_state(ws::AppState { table: handle });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {}: {e}", config.bind))?;

    tracing::info!(
        "server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    tracing::info!("shutting down");

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install CTRL+C signal handler");
}
