//! Display and formatting utilities for prodflow.
//!
//! This module provides the text drawn on and around graph nodes and links,
//! and the node width estimate the layout needs before anything is drawn.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::graph::{FlowGraph, GraphEdge, GraphNode};
use crate::models::{Registry, Settings};

/// Icon edge length in pixels.
pub const ICON_SIZE: f64 = 32.0;
/// Vertical gap between nodes in a column.
pub const NODE_PADDING: f64 = 32.0;
/// Horizontal distance between node columns.
pub const COLUMN_WIDTH: f64 = 200.0;
/// Tallest a node may be drawn.
pub const MAX_NODE_HEIGHT: f64 = 175.0;
/// Width of the colon between a recipe icon and its building icon.
pub const COLON_WIDTH: f64 = 12.0;

/// Measures rendered text width.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f64;
}

/// Fixed advance per character.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMeasure {
    pub advance: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        MonospaceMeasure { advance: 8.0 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.advance
    }
}

/// Formats an item or recipe name for display.
///
/// # Arguments
///
/// * `name` - A dash-separated identifier
///
/// # Returns
///
/// The name with dashes turned into spaces and the first letter capitalised.
///
/// # Example
///
/// ```
/// use prodflow::display::format_name;
///
/// assert_eq!(format_name("iron-gear-wheel"), "Iron gear wheel");
/// assert_eq!(format_name("output"), "Output");
/// ```
pub fn format_name(name: &str) -> String {
    let spaced = name.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Formats a per-second rate in the configured unit.
///
/// # Arguments
///
/// * `rate` - Items or executions per second
/// * `settings` - Supplies the rate unit and decimal places
///
/// # Returns
///
/// The scaled rate rounded half away from zero, without trailing zeros.
/// Rates too large for the unit saturate at [`Decimal::MAX`].
///
/// # Example
///
/// ```
/// use prodflow::display::display_rate;
/// use prodflow::models::Settings;
/// use rust_decimal::Decimal;
///
/// let settings = Settings::default(); // per minute, 3 places
/// assert_eq!(display_rate(Decimal::new(5, 1), &settings), "30");
/// assert_eq!(display_rate(Decimal::ONE / Decimal::from(3), &settings), "20");
/// ```
pub fn display_rate(rate: Decimal, settings: &Settings) -> String {
    rate.saturating_mul(settings.rate_unit.multiplier())
        .round_dp_with_strategy(settings.rate_precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Formats a building count.
pub fn display_count(count: Decimal, settings: &Settings) -> String {
    count
        .round_dp_with_strategy(settings.count_precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Label drawn inside a node.
pub fn node_text(node: &GraphNode, settings: &Settings) -> String {
    match node.rate {
        None => node.name.clone(),
        Some(rate) if node.count.is_zero() => format!(
            " \u{00d7} {}/{}",
            display_rate(rate, settings),
            settings.rate_unit.name()
        ),
        Some(_) => format!(" \u{00d7} {}", display_count(node.count, settings)),
    }
}

/// Tooltip for a link.
///
/// # Arguments
///
/// * `edge` - The link to describe
/// * `graph` - Graph the edge belongs to, for endpoint names
/// * `registry` - Item lookup
/// * `settings` - Rate unit and precision
///
/// # Returns
///
/// Two lines: `Source → Target`, with ` (fuel)` for fuel links, then the
/// rate. The item name prefixes the rate unless it matches the source.
pub fn link_title(
    edge: &GraphEdge,
    graph: &FlowGraph,
    registry: &Registry,
    settings: &Settings,
) -> String {
    let source = &graph.nodes[edge.source].name;
    let target = &graph.nodes[edge.target].name;
    let item = &registry.item(edge.item).name;
    let item_name = if source != item {
        format!("{} \u{00d7} ", format_name(item))
    } else {
        String::new()
    };
    let fuel = if edge.fuel { " (fuel)" } else { "" };
    format!(
        "{} \u{2192} {}{}\n{}{}/{}",
        format_name(source),
        format_name(target),
        fuel,
        item_name,
        display_rate(edge.rate, settings),
        settings.rate_unit.name()
    )
}

/// Rate label drawn next to a link's source.
pub fn link_label(edge: &GraphEdge, settings: &Settings) -> String {
    format!(
        "{}{}/{}",
        if edge.extra { "\u{00d7} " } else { "" },
        display_rate(edge.rate, settings),
        settings.rate_unit.name()
    )
}

/// Width a node needs for its icons and label.
pub fn node_width(node: &GraphNode, settings: &Settings, measure: &dyn TextMeasure) -> f64 {
    let mut width = measure.width(&node_text(node, settings)) + 4.0;
    if node.factory.is_some() {
        width += ICON_SIZE * 2.0 + COLON_WIDTH;
    } else if node.rate.is_some() {
        width += ICON_SIZE;
    }
    width
}

/// Common node width: the widest node in the graph.
pub fn max_node_width(graph: &FlowGraph, settings: &Settings, measure: &dyn TextMeasure) -> f64 {
    graph
        .nodes
        .iter()
        .map(|n| node_width(n, settings, measure))
        .fold(0.0, f64::max)
}
