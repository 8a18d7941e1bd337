use std::path::PathBuf;

use clap::Parser;
use log::error;

use talking_head::utils::logger;
use talking_head::{commands, AppConfig};

/// Web UI that turns a script and a face photo into a lip-synced video
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// JSON configuration file (also read from ANCHOR_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Host interface to bind
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    logger::init_logger();
    let args = Args::parse();

    let mut config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Err(e) = config.validate() {
        error!("{}", e);
        std::process::exit(2);
    }

    if let Err(e) = commands::serve(config).await {
        error!("Server stopped: {:#}", e);
        std::process::exit(1);
    }
}
