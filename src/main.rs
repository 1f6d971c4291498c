use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rangeserve::config::Config;
use rangeserve::fs::FileResolver;
use rangeserve::server;

#[derive(Debug, Parser)]
#[command(name = "rangeserve", about = "Serve a directory over HTTP/1.1 with range support")]
struct Cli {
    /// Directory to serve
    #[arg(short = 'd', long = "dir")]
    dir: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    listen: Option<String>,

    /// YAML config file
    #[arg(short, long, env = "RANGESERVE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => {
            let mut cfg = Config::from_file(path)?;
            cfg.apply_env();
            cfg
        }
        None => Config::load(),
    };
    if let Some(dir) = cli.dir {
        cfg.root_dir = dir;
    }
    if let Some(listen) = cli.listen {
        cfg.listen_addr = listen;
    }
    cfg.validate().context("invalid configuration")?;

    tracing::info!(root = %cfg.root_dir.display(), "Serving directory");
    let resolver = Arc::new(FileResolver::new(cfg.root_dir.clone()));

    tokio::select! {
        res = server::listener::run(&cfg, resolver) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
