//! Effect listing command.

use ambiance_registry::{EffectCategory, Registry};
use clap::Args;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for a specific effect
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

const CATEGORIES: [EffectCategory; 4] = [
    EffectCategory::TimeBased,
    EffectCategory::Filter,
    EffectCategory::Utility,
    EffectCategory::Distortion,
];

pub fn run(args: EffectsArgs) -> anyhow::Result<()> {
    let registry = Registry::new();

    if let Some(id) = &args.effect {
        let effect = registry
            .effect(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown effect: {id}"))?;

        println!("{}", effect.name);
        println!("{}", "=".repeat(effect.name.len()));
        println!();
        println!("{}", effect.description);
        println!();
        println!("Category:   {}", effect.category.name());
        println!("Parameters: {}", effect.params.join(", "));
        return Ok(());
    }

    println!("Available Effects");
    println!("=================");
    for category in CATEGORIES {
        let effects: Vec<_> = registry.effects_in_category(category).collect();
        if effects.is_empty() {
            continue;
        }
        println!();
        println!("{}:", category.name());
        for effect in effects {
            println!("  {:12} {}", effect.id, effect.description);
        }
    }
    println!();
    println!("Use 'ambiance effects <EFFECT>' for parameters.");
    Ok(())
}
