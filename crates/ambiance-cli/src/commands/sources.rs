//! Source listing command.

use ambiance_registry::Registry;
use clap::Args;

#[derive(Args)]
pub struct SourcesArgs {
    /// Show details for a specific source
    #[arg(value_name = "SOURCE")]
    source: Option<String>,
}

pub fn run(args: SourcesArgs) -> anyhow::Result<()> {
    let registry = Registry::new();

    if let Some(id) = &args.source {
        let source = registry
            .source(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown source: {id}"))?;

        println!("{}", source.name);
        println!("{}", "=".repeat(source.name.len()));
        println!();
        println!("{}", source.description);
        println!();
        println!("Parameters: {}, label", source.params.join(", "));
        println!();
        println!("Example project entry:");
        println!("  {{ \"type\": \"{}\", \"label\": \"my-{}\" }}", source.id, source.id);
        return Ok(());
    }

    println!("Available Sources");
    println!("=================");
    println!();
    for source in registry.sources() {
        println!("  {:16} {}", source.id, source.description);
    }
    println!();
    println!("Use 'ambiance sources <SOURCE>' for parameters.");
    Ok(())
}
