//! Render command.

use std::path::PathBuf;
use std::sync::Arc;

use ambiance_engine::{ProjectConfig, WavSpec, write_wav};
use ambiance_rack::{PluginHost, PluginRack, RackConfig};
use ambiance_registry::Registry;
use anyhow::Context;
use clap::Args;

/// Duration used when neither the flag nor the project gives one.
const DEFAULT_DURATION: f64 = 5.0;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Length in seconds (defaults to the project's duration, then 5)
    #[arg(short, long)]
    duration: Option<f64>,

    /// Sample rate in Hz (overrides the project)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Project file describing sources, effects and plugins
    #[arg(short, long, value_name = "PROJECT")]
    config: Option<PathBuf>,

    /// Rack configuration file (overrides the project's "plugins")
    #[arg(long, value_name = "RACK")]
    rack: Option<PathBuf>,

    /// Bank to activate before rendering
    #[arg(long)]
    bank: Option<String>,

    /// Plugin catalog used to resolve rack slugs
    #[arg(long, value_name = "PATH")]
    catalog: Option<PathBuf>,

    /// Output bit depth
    #[arg(long, default_value = "16", value_parser = parse_bit_depth)]
    bit_depth: u16,

    /// Print the engine configuration snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s.parse::<u16>() {
        Ok(bits @ (16 | 24 | 32)) => Ok(bits),
        _ => Err(format!("unsupported bit depth '{s}' (use 16, 24 or 32)")),
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut project = match &args.config {
        Some(path) => ProjectConfig::load(path)
            .with_context(|| format!("failed to load project {}", path.display()))?,
        None => ProjectConfig::default_ambience(),
    };
    if let Some(sample_rate) = args.sample_rate {
        project.sample_rate = sample_rate;
    }
    let duration = args
        .duration
        .or(project.duration)
        .unwrap_or(DEFAULT_DURATION);

    let mut engine = project.build_engine(&Registry::new())?;

    let rack_config = match &args.rack {
        Some(path) => Some(
            RackConfig::load(path)
                .with_context(|| format!("failed to load rack {}", path.display()))?,
        ),
        None => project.plugins.clone(),
    };

    if let Some(rack_config) = rack_config {
        let library = super::open_library(args.catalog.clone())?;
        let rack = PluginRack::from_config(&rack_config, &library, Arc::new(PluginHost::from_env()));
        for note in rack.notes() {
            tracing::warn!("{note}");
        }
        if let Some(bank) = &args.bank {
            if !rack.set_active_bank(bank) {
                let known: Vec<&str> = rack.bank_names().collect();
                anyhow::bail!("unknown bank '{bank}' (known: {})", known.join(", "));
            }
        }
        tracing::info!(bank = %rack.active_bank_name(), "plugin rack attached");
        engine.set_plugin_rack(Some(Arc::new(rack)));
    } else if args.bank.is_some() {
        anyhow::bail!("--bank needs a rack (--rack or a project with \"plugins\")");
    }

    let buffer = engine.render(duration)?;

    let spec = WavSpec {
        sample_rate: engine.sample_rate(),
        bits_per_sample: args.bit_depth,
    };
    write_wav(&args.output, &buffer, spec)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    if let Some(rack) = engine.plugin_rack() {
        for failure in rack.host().recent_failures() {
            tracing::warn!(slug = %failure.slug, index = failure.index, "slot skipped: {}", failure.reason);
        }
    }

    let summary = format!(
        "Rendered {:.3}s ({} samples, {} Hz, {}-bit) to {}",
        duration,
        buffer.len(),
        spec.sample_rate,
        spec.bits_per_sample,
        args.output.display()
    );

    // With --snapshot, stdout carries only the JSON document
    if args.snapshot {
        eprintln!("{summary}");
        println!("{}", engine.configuration().to_json_pretty());
    } else {
        println!("{summary}");
    }

    Ok(())
}
