//! # prodflow
//!
//! A library and command-line tool that turns the output of a factory-planning
//! solver into a production flow diagram (a Sankey graph).
//!
//! Given how often each recipe runs and which items are left over, prodflow:
//!
//! - Builds a graph with one node per active recipe plus sinks for the
//!   build targets and for surplus items
//! - Splits each consumer's demand for an item across its producers in
//!   proportion to what each one supplies
//! - Colours items so that items sharing a recipe get different colours
//! - Resolves labels, icons and colours into a scene for an external
//!   Sankey layout and renderer
//!
//! ## Modules
//!
//! - [`models`] - Items, recipes, registries, solver totals and settings
//! - [`data`] - CSV and JSON loading
//! - [`factory`] - Building assignment and building counts
//! - [`graph`] - Flow graph construction
//! - [`color`] - Colour class assignment
//! - [`highlight`] - Hover and click state
//! - [`display`] - Labels and formatting
//! - [`render`] - Scene building and the render surface seam
//!
//! ## Example Usage
//!
//! ```no_run
//! use prodflow::{
//!     color::assign_colors,
//!     data::{load_factories, load_registry, load_totals, parse_targets},
//!     factory::FactoryTable,
//!     graph::build_graph,
//!     models::Settings,
//! };
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! let registry = load_registry(Path::new("data")).unwrap();
//! let table = FactoryTable::new(load_factories(Path::new("data")).unwrap());
//! let totals = load_totals(Path::new("data/totals.json")).unwrap();
//! let targets = parse_targets("electronic-circuit:1").unwrap();
//! let settings = Settings::default();
//!
//! let graph = build_graph(&registry, &totals, &targets, &HashMap::new(), &table, &settings);
//! let colors = assign_colors(&graph, &registry, &settings);
//!
//! for edge in &graph.edges {
//!     println!("{} -> {}: {}", edge.source, edge.target, colors.items[&edge.item]);
//! }
//! ```

pub mod color;
pub mod data;
pub mod display;
pub mod error;
pub mod factory;
pub mod graph;
pub mod highlight;
pub mod models;
pub mod render;
pub mod wasm;
