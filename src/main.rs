//! Debweb main entry point

use anyhow::Context;
use clap::Parser;
use debweb_api::start_server;
use debweb_config::{Config, ConfigError};
use debweb_core::BackendApi;
use debweb_http::HttpTransport;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "debweb")]
#[command(author = "Debweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Web front end for Deb Telecom accounts, customers and transactions", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (config, missing) = match Config::load(args.config.clone()) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound { .. }) => {
            let mut config = Config::default();
            config.apply_env_overrides();
            config.validate()?;
            (config, true)
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load {}", args.config.display()))
        }
    };

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    if missing {
        log::warn!("{} not found, using default configuration", args.config.display());
    } else {
        log::info!("Config loaded from {}", args.config.display());
    }

    let transport = HttpTransport::from_config(&config).context("Failed to create backend client")?;
    let api = BackendApi::new(Arc::new(transport)).with_export_limit(config.pagination.export_limit);

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, api))
}
