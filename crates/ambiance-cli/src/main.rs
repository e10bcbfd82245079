//! Ambiance CLI - render procedural ambiences and manage the plugin rack.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ambiance")]
#[command(author, version, about = "Procedural ambience renderer", long_about = None)]
struct Cli {
    /// Log pipeline details (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render sources and effects to a WAV file
    Render(commands::render::RenderArgs),

    /// List available sources and their parameters
    Sources(commands::sources::SourcesArgs),

    /// List available effects and their parameters
    Effects(commands::effects::EffectsArgs),

    /// Manage the plugin catalog
    Plugins(commands::plugins::PluginsArgs),

    /// Inspect and edit a rack configuration file
    Rack(commands::rack::RackArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Sources(args) => commands::sources::run(args),
        Commands::Effects(args) => commands::effects::run(args),
        Commands::Plugins(args) => commands::plugins::run(args),
        Commands::Rack(args) => commands::rack::run(args),
    }
}
