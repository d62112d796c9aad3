//! prodflow - Command Line Interface
//!
//! Builds the production flow graph for a solver result and prints it, either
//! as a readable summary or as the JSON scene handed to a renderer.
//! Run with `--help` to see all available options.

use clap::Parser;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use prodflow::{
    data::{load_factories, load_registry, load_totals, parse_targets, validate_totals},
    display::{display_count, display_rate, format_name, MonospaceMeasure},
    factory::FactoryTable,
    models::{RateUnit, Settings},
    render::{render_graph, JsonSurface},
};

/// Command-line arguments for prodflow.
#[derive(Parser, Debug)]
#[command(name = "prodflow")]
#[command(author, version, about = "Build the production flow graph for a factory plan", long_about = None)]
struct Args {
    /// Solver output JSON with recipe totals and waste
    #[arg(short, long)]
    totals: PathBuf,

    /// Build targets as item:rate pairs (items per second), comma separated
    #[arg(short = 'T', long, default_value = "")]
    target: String,

    /// Directory containing items.csv, recipes.csv and factories.csv
    #[arg(short, long, default_value = "data")]
    data: PathBuf,

    /// Recipes to leave unexpanded (repeatable)
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Item burned by fuel-powered buildings
    #[arg(long)]
    fuel: Option<String>,

    /// Rate display unit (s, m or h)
    #[arg(long, default_value = "m")]
    rate_unit: RateUnit,

    /// Mining productivity bonus (0.1 = +10%)
    #[arg(long, default_value = "0")]
    mining_productivity: Decimal,

    /// Use this factory for its category (category=factory, repeatable)
    #[arg(long = "factory")]
    factories: Vec<String>,

    /// Print the render scene as JSON instead of a summary
    #[arg(long, default_value = "false")]
    json: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.data.exists() {
        eprintln!(
            "Error: data directory '{}' not found. Please run from the project root.",
            args.data.display()
        );
        std::process::exit(1);
    }

    let registry = load_registry(&args.data)?;
    let mut table = FactoryTable::new(load_factories(&args.data)?);
    table.apply_overrides(&args.factories);

    let totals = load_totals(&args.totals)?;
    validate_totals(&totals, &registry)?;
    let targets = parse_targets(&args.target)?;
    let ignore: HashMap<String, bool> = args.ignore.iter().map(|r| (r.clone(), true)).collect();

    let settings = Settings {
        fuel: args.fuel,
        mining_productivity: args.mining_productivity,
        rate_unit: args.rate_unit,
        ..Settings::default()
    };

    let mut surface = JsonSurface::default();
    let (graph, colors) = render_graph(
        &mut surface,
        &registry,
        &totals,
        &targets,
        &ignore,
        &table,
        &settings,
        &MonospaceMeasure::default(),
    )?;

    if args.json {
        let scene = surface.output.unwrap_or_default();
        println!("{}", serde_json::to_string_pretty(&scene)?);
        return Ok(());
    }

    let unit = settings.rate_unit.name();
    println!("prodflow - Production Flow Graph");
    println!("================================================================");
    println!();
    println!("[NODES]");
    println!("----------------------------------------------------------------");
    for node in &graph.nodes {
        let color = colors.recipe_color(node.recipe).unwrap_or("-");
        match (node.rate, &node.factory) {
            (None, _) => println!("  {:<28} {}", format_name(&node.name), color),
            (Some(rate), Some(factory)) => println!(
                "  {:<28} {} {:>10}/{}  {} x {}",
                format_name(&node.name),
                color,
                display_rate(rate, &settings),
                unit,
                display_count(node.count, &settings),
                factory
            ),
            (Some(rate), None) => println!(
                "  {:<28} {} {:>10}/{}",
                format_name(&node.name),
                color,
                display_rate(rate, &settings),
                unit
            ),
        }
    }

    println!();
    println!("[FLOWS]");
    println!("----------------------------------------------------------------");
    for edge in &graph.edges {
        println!(
            "  {} -> {}: {} {}/{}{} {}",
            format_name(&graph.nodes[edge.source].name),
            format_name(&graph.nodes[edge.target].name),
            format_name(&registry.item(edge.item).name),
            display_rate(edge.rate, &settings),
            unit,
            if edge.fuel { " (fuel)" } else { "" },
            colors.item_color(edge.item).unwrap_or("-"),
        );
    }
    println!();

    Ok(())
}
