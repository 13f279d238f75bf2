//! PeritoAI CLI - index, search and draft adjuster reports from the terminal.

use clap::Parser;
use perito_cli::commands;
use perito_cli::{Cli, Command, Formatter, Settings};
use perito_rag::PeritoConfig;
use perito_server::bootstrap;
use perito_server::config::load_config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Providers use blocking HTTP clients; only `serve` builds a runtime.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> perito_cli::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().unwrap_or_default();

    let format = cli.format.map(Into::into).unwrap_or(settings.format);
    let color_enabled = !cli.no_color && settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let config_path = cli.config.clone().or_else(|| settings.engine_config.clone());
    let config: PeritoConfig = load_config(config_path.as_deref())?;
    debug!(index = %config.paths.index_path.display(), "Configuration loaded");

    match cli.command {
        Command::Parse(args) => commands::execute_parse(args, &formatter)?,
        Command::Templates => commands::execute_templates(&formatter)?,
        Command::Serve => commands::execute_serve(config)?,
        Command::Index(args) => {
            let mut engine = bootstrap::build_engine(&config)?;
            commands::execute_index(args, &mut engine, &formatter)?;
        }
        Command::Documents(args) => {
            let engine = bootstrap::build_engine(&config)?;
            commands::execute_documents(args, &engine, &formatter)?;
        }
        Command::Search(args) => {
            let engine = bootstrap::build_engine(&config)?;
            commands::execute_search(args, &engine, &formatter)?;
        }
        Command::Context(args) => {
            let engine = bootstrap::build_engine(&config)?;
            commands::execute_context(args, &engine, &formatter)?;
        }
        Command::Report(args) => {
            let engine = bootstrap::build_engine(&config)?;
            let generator = bootstrap::build_generator(&config)?;
            commands::execute_report(args, &engine, &generator, &formatter)?;
        }
    }

    Ok(())
}
