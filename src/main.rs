use std::env;
use std::fs;

use anyhow::{anyhow, Result};
use bakehouse::config::{EngineConfig, LogFormat};
use bakehouse::ingredient_parser::parse_ingredient_list;
use bakehouse::scaling::{
    calculate_scaling_factor, format_weight, scale_ingredients, total_scaled_grams, ScalingInput,
};
use bakehouse::timeline::generate_timeline_from_template;
use chrono::{DateTime, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage:
  bakehouse scale <recipe-file> [multiplier]
  bakehouse timeline <template-id> <bake-start, RFC 3339>
  bakehouse templates";

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = EngineConfig::from_env()?;
    init_tracing(&config);

    let args: Vec<String> = env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("scale") => run_scale(&args[1..]),
        Some("timeline") => run_timeline(&config, &args[1..]),
        Some("templates") => run_templates(&config),
        _ => {
            eprintln!("{USAGE}");
            Ok(())
        }
    }
}

fn init_tracing(config: &EngineConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

fn run_scale(args: &[String]) -> Result<()> {
    let path = args.first().ok_or_else(|| anyhow!("missing recipe file\n{USAGE}"))?;
    let multiplier = args
        .get(1)
        .map(|value| {
            value
                .parse::<f64>()
                .map_err(|_| anyhow!("invalid multiplier: {value}"))
        })
        .transpose()?;

    let text = fs::read_to_string(path)?;
    let ingredients = parse_ingredient_list(&text);
    let factor = calculate_scaling_factor(&ScalingInput::Multiplier { multiplier });
    info!(recipe = %path, ingredients = ingredients.len(), factor, "Scaling recipe");

    let sheet = scale_ingredients(&ingredients, factor);
    for (parsed, scaled) in ingredients.iter().zip(&sheet) {
        let weight = if parsed.unit_grams.is_some() {
            scaled.display_weight.clone()
        } else {
            "--".to_string()
        };
        let percentage = scaled
            .bakers_percentage
            .map(|p| format!("{:.1}%", p * 100.0))
            .unwrap_or_default();
        println!("{:<32} {:>10} {:>8}", scaled.ingredient_name, weight, percentage);
    }
    println!("{:<32} {:>10}", "total", format_weight(total_scaled_grams(&sheet)));

    Ok(())
}

fn run_timeline(config: &EngineConfig, args: &[String]) -> Result<()> {
    let (Some(template_id), Some(bake_at)) = (args.first(), args.get(1)) else {
        return Err(anyhow!("missing template id or bake time\n{USAGE}"));
    };
    let bake_at: DateTime<Utc> = DateTime::parse_from_rfc3339(bake_at)
        .map_err(|err| anyhow!("invalid bake time {bake_at}: {err}"))?
        .with_timezone(&Utc);

    let registry = config.template_registry()?;
    let template = registry
        .get(template_id)
        .ok_or_else(|| anyhow!("unknown template: {template_id}"))?;

    println!("{} (bake at {})", template.name, bake_at.format("%Y-%m-%d %H:%M UTC"));
    for step in generate_timeline_from_template(template, bake_at) {
        println!("  {step}");
    }

    Ok(())
}

fn run_templates(config: &EngineConfig) -> Result<()> {
    let registry = config.template_registry()?;
    for template in registry.templates() {
        println!("{:<24} {} ({} steps)", template.id, template.name, template.steps.len());
    }
    Ok(())
}
