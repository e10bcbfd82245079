//! Rack configuration commands.

use std::path::PathBuf;
use std::sync::Arc;

use ambiance_rack::{PluginHost, PluginRack, RackConfig, SlotConfig, paths};
use anyhow::Context;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct RackArgs {
    /// Rack configuration file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Plugin catalog used to resolve slugs
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: RackCommand,
}

#[derive(Subcommand)]
enum RackCommand {
    /// Show banks, chains, and configuration notes as JSON
    Status,

    /// Insert a plugin into a bank's stream chain
    Assign {
        /// Bank name (e.g. A or B)
        bank: String,

        /// Stream name: a source id, "master", or "*"
        stream: String,

        /// Plugin slug
        slug: String,

        /// Plugin parameter (key=value), repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Position in the chain (appends by default)
        #[arg(long)]
        position: Option<usize>,
    },

    /// Remove the slot at INDEX from a bank's stream chain
    Remove {
        /// Bank name
        bank: String,

        /// Stream name
        stream: String,

        /// Slot index
        index: usize,
    },

    /// Make BANK the active bank
    Switch {
        /// Bank name
        bank: String,
    },

    /// Advance to the next bank
    Toggle,
}

pub fn run(args: RackArgs) -> anyhow::Result<()> {
    let path = args.file.unwrap_or_else(paths::rack_config_path);
    let mut config = RackConfig::load_or_default(&path)
        .with_context(|| format!("failed to load rack {}", path.display()))?;

    match args.command {
        RackCommand::Status => {
            let library = super::open_library(args.catalog)?;
            let rack = PluginRack::from_config(&config, &library, Arc::new(PluginHost::from_env()));
            println!("{}", serde_json::to_string_pretty(&rack.status())?);
            return Ok(());
        }
        RackCommand::Assign {
            bank,
            stream,
            slug,
            params,
            position,
        } => {
            let library = super::open_library(args.catalog)?;
            if library.get(&slug).is_none() {
                anyhow::bail!("unknown plugin '{slug}' (see 'ambiance plugins list')");
            }
            let params = super::parse_params(&params)?;
            let index = config.assign(&bank, &stream, SlotConfig::with_params(&slug, params), position);
            println!("Assigned {slug} to {bank}/{stream} at position {index}");
        }
        RackCommand::Remove {
            bank,
            stream,
            index,
        } => {
            let removed = config
                .remove(&bank, &stream, index)
                .with_context(|| format!("no slot {index} in {bank}/{stream}"))?;
            println!("Removed {} from {bank}/{stream}", removed.slug);
        }
        RackCommand::Switch { bank } => {
            if !config.set_active(&bank) {
                anyhow::bail!("unknown bank '{bank}'");
            }
            println!("Active bank: {bank}");
        }
        RackCommand::Toggle => match config.toggle_active() {
            Some(bank) => println!("Active bank: {bank}"),
            None => anyhow::bail!("rack has no banks"),
        },
    }

    config
        .save(&path)
        .with_context(|| format!("failed to save rack {}", path.display()))?;
    Ok(())
}
