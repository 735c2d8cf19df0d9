#![cfg(not(tarpaulin_include))]

use navstack::app;
use navstack::config::ServerConfig;
use std::env;

/// Main entry point for the web application
///
/// Initializes logging from `RUST_LOG` (default `info`), reads the server
/// configuration and serves the navigation routes until Ctrl-C.
///
/// # Arguments
/// * `[host] [port]` - optional positional arguments, see [`ServerConfig`]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let config = ServerConfig::load(&args);

    log::info!(
        "Starting navigation server on {} (sessions in {})",
        config.bind_address(),
        config.sessions_file().display()
    );
    app::run(config).await
}
