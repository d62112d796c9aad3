//! Hand-off to the drawing layer.
//!
//! Layout and drawing live outside this crate. [`render_graph`] builds and
//! colours the graph, flattens it into a [`Scene`] with every label, colour
//! and size already resolved, and passes it to a [`RenderSurface`].

use std::collections::HashMap;

use serde::Serialize;

use crate::color::{assign_colors, darker, palette_color, ColorMaps};
use crate::display::{
    format_name, link_label, link_title, max_node_width, node_text, TextMeasure, COLUMN_WIDTH,
    ICON_SIZE, MAX_NODE_HEIGHT, NODE_PADDING,
};
use crate::error::{Error, Result};
use crate::factory::FactorySpec;
use crate::graph::{build_graph, FlowGraph};
use crate::models::{BuildTarget, Icon, ProductionTotals, Registry, Settings};

/// Something that lays out and draws a scene.
pub trait RenderSurface {
    fn draw(&mut self, scene: &Scene) -> Result<()>;
}

/// Layout parameters for the external Sankey layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutParams {
    pub node_width: f64,
    pub node_padding: f64,
    pub max_node_height: f64,
    pub link_length: f64,
    pub icon_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneNode {
    pub name: String,
    pub title: String,
    pub text: String,
    /// Sprite of the recipe; None for sinks
    pub icon: Option<Icon>,
    pub factory: Option<String>,
    pub factory_icon: Option<Icon>,
    pub stroke: String,
    pub fill: String,
    pub ignored: bool,
    pub sink: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLink {
    pub source: usize,
    pub target: usize,
    pub item: String,
    pub item_icon: Icon,
    pub value: f64,
    pub color: String,
    pub title: String,
    pub label: String,
    pub fuel: bool,
    pub extra: bool,
}

/// Everything a surface needs to draw one graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub layout: LayoutParams,
    pub nodes: Vec<SceneNode>,
    pub links: Vec<SceneLink>,
}

impl Scene {
    /// Resolves labels, sprites and colours for a built and coloured graph.
    pub fn new(
        graph: &FlowGraph,
        colors: &ColorMaps,
        registry: &Registry,
        spec: &dyn FactorySpec,
        ignore: &HashMap<String, bool>,
        settings: &Settings,
        measure: &dyn TextMeasure,
    ) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|node| {
                let recipe = node.recipe.recipe_id().map(|id| registry.recipe(id));
                let stroke = palette_color(colors.recipes.get(&node.recipe).copied().unwrap_or(0));
                SceneNode {
                    name: node.name.clone(),
                    title: format_name(&node.name),
                    text: node_text(node, settings),
                    icon: recipe.map(|r| r.icon),
                    factory: node.factory.clone(),
                    factory_icon: recipe.and_then(|r| spec.factory(r)).map(|f| f.icon),
                    stroke: stroke.to_string(),
                    fill: darker(stroke),
                    ignored: recipe.is_some_and(|r| ignore.get(&r.name).copied().unwrap_or(false)),
                    sink: node.recipe.is_sink(),
                }
            })
            .collect();

        let links = graph
            .edges
            .iter()
            .map(|edge| {
                let item = registry.item(edge.item);
                SceneLink {
                    source: edge.source,
                    target: edge.target,
                    item: item.name.clone(),
                    item_icon: item.icon,
                    value: edge.value,
                    color: colors.item_color(edge.item).unwrap_or(palette_color(0)).to_string(),
                    title: link_title(edge, graph, registry, settings),
                    label: link_label(edge, settings),
                    fuel: edge.fuel,
                    extra: edge.extra,
                }
            })
            .collect();

        Scene {
            layout: LayoutParams {
                node_width: max_node_width(graph, settings, measure),
                node_padding: NODE_PADDING,
                max_node_height: MAX_NODE_HEIGHT,
                link_length: COLUMN_WIDTH,
                icon_size: ICON_SIZE,
            },
            nodes,
            links,
        }
    }
}

/// Builds, colours and draws the flow graph for one set of totals.
///
/// Returns the graph and colours so the caller can wire up highlighting.
#[allow(clippy::too_many_arguments)]
pub fn render_graph(
    surface: &mut dyn RenderSurface,
    registry: &Registry,
    totals: &ProductionTotals,
    targets: &[BuildTarget],
    ignore: &HashMap<String, bool>,
    spec: &dyn FactorySpec,
    settings: &Settings,
    measure: &dyn TextMeasure,
) -> Result<(FlowGraph, ColorMaps)> {
    let graph = build_graph(registry, totals, targets, ignore, spec, settings);
    let colors = assign_colors(&graph, registry, settings);
    let scene = Scene::new(&graph, &colors, registry, spec, ignore, settings, measure);
    surface.draw(&scene)?;
    Ok((graph, colors))
}

/// Surface that captures the scene as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonSurface {
    pub output: Option<serde_json::Value>,
}

impl RenderSurface for JsonSurface {
    fn draw(&mut self, scene: &Scene) -> Result<()> {
        let value = serde_json::to_value(scene).map_err(|e| Error::Render {
            message: e.to_string(),
        })?;
        self.output = Some(value);
        Ok(())
    }
}
