//! PeritoAI HTTP server
//!
//! Usage: `perito-server [--config <path>]`

use perito_server::{config::load_config, start_server};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1).map(String::as_str) {
        Some("--help") | Some("-h") => {
            print_help();
            return Ok(());
        }
        Some("--config") => match args.get(2) {
            Some(path) => Some(PathBuf::from(path)),
            None => anyhow::bail!("--config requires a path"),
        },
        Some(other) => anyhow::bail!("unknown argument: {}", other),
        None => None,
    };

    let config = load_config(config_path.as_deref())?;
    start_server(config).await?;
    Ok(())
}

fn print_help() {
    println!("PeritoAI Server - insurance adjuster report API");
    println!();
    println!("USAGE:");
    println!("    perito-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    PERITO_CONFIG          Config file used when --config is absent");
    println!("    WHATSAPP_VERIFY_TOKEN  Webhook verification token");
    println!("    RUST_LOG               Log filter (default: info)");
    println!();
}
