//! Plugin catalog commands.

use std::path::PathBuf;

use ambiance_rack::{PluginDescriptor, PluginFormat, RegisterOptions};
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct PluginsArgs {
    /// Plugin catalog file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: PluginsCommand,
}

#[derive(Subcommand)]
enum PluginsCommand {
    /// List known plugins
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Register a plugin file or bundle
    Register {
        /// Plugin path
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Display name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,

        /// Format: vst, vst3, au, mcsvt
        #[arg(long, value_parser = parse_format)]
        format: Option<PluginFormat>,
    },

    /// Remove a registered plugin
    Remove {
        /// Plugin slug
        slug: String,
    },

    /// Scan default plugin directories and extra paths
    Rescan {
        /// Extra directories to scan
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Only scan the given paths
        #[arg(long)]
        no_defaults: bool,
    },
}

fn parse_format(s: &str) -> Result<PluginFormat, String> {
    PluginFormat::parse(s).ok_or_else(|| format!("unknown plugin format '{s}'"))
}

fn print_table(plugins: &[&PluginDescriptor]) {
    println!("  {:24}  {:8}  {:24}  {}", "Slug", "Format", "Name", "Path");
    println!("  {:24}  {:8}  {:24}  {}", "----", "------", "----", "----");
    for plugin in plugins {
        let path = plugin
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(built-in)".to_string());
        println!(
            "  {:24}  {:8}  {:24}  {}",
            plugin.slug,
            plugin.format.as_str(),
            plugin.name,
            path
        );
    }
}

pub fn run(args: PluginsArgs) -> anyhow::Result<()> {
    let mut library = super::open_library(args.catalog)?;

    match args.command {
        PluginsCommand::List { json } => {
            let plugins: Vec<&PluginDescriptor> = library.list().collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&plugins)?);
            } else {
                print_table(&plugins);
            }
        }
        PluginsCommand::Register { path, name, format } => {
            let options = RegisterOptions {
                name,
                format,
                ..RegisterOptions::default()
            };
            let descriptor = library.register_path(&path, options)?;
            println!("Registered {} ({})", descriptor.slug, descriptor.format);
        }
        PluginsCommand::Remove { slug } => {
            if library.remove(&slug)? {
                println!("Removed {slug}");
            } else {
                anyhow::bail!("'{slug}' is not a removable plugin");
            }
        }
        PluginsCommand::Rescan { paths, no_defaults } => {
            if no_defaults {
                library = library.with_scan_roots(Vec::new());
            }
            let added = library.rescan(&paths)?;
            if added.is_empty() {
                println!("No new plugins found");
            } else {
                println!("Added {} plugin(s):", added.len());
                print_table(&added.iter().collect::<Vec<_>>());
            }
        }
    }

    Ok(())
}
