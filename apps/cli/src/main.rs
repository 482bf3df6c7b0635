mod args;
mod config;
mod dirs;

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use app_api::AppContext;
use http_api::HttpState;
use ledger_app::{AppPaths, AppState, ensure_app_data_dir};
use tracing_subscriber::EnvFilter;

fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::parse_args().map_err(|err| {
        eprintln!("{err}");
        args::print_help();
        io::Error::new(io::ErrorKind::InvalidInput, "invalid arguments")
    })?;

    let config = config::load_or_create().map_err(io::Error::other)?;
    init_tracing(&config.config.log);
    if config.created {
        println!(
            "Created config at {} (default port {}).",
            config.paths.file.display(),
            config.config.port
        );
    }

    let data_dir = dirs::resolve_data_dir(args.data_dir).map_err(io::Error::other)?;
    println!("Using data dir: {}", data_dir.display());

    let port = args.port.unwrap_or(config.config.port);
    let bind: IpAddr = config
        .config
        .bind
        .parse()
        .map_err(|err| io::Error::other(format!("invalid bind address: {err}")))?;

    let paths = AppPaths::new(data_dir);
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;

    let app_state = AppState::with_busy_timeout(
        paths.db_path,
        Duration::from_millis(config.config.busy_timeout_ms),
    );
    app_state
        .initialize()
        .map_err(|err| io::Error::other(format!("failed to initialize database: {}", err)))?;

    let context = AppContext { app_state };
    let state = HttpState::new(context).with_max_upload_bytes(config.config.max_upload_bytes);
    let router = http_api::router(state);

    let listener = tokio::net::TcpListener::bind(SocketAddr::new(bind, port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "listening");

    println!("Call Ledger is running at http://{addr}");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
