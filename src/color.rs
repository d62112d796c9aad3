//! Colour assignment for flow graphs.
//!
//! Items get colour classes from a greedy graph colouring in which two items
//! are adjacent when some recipe touches both of them. Links take the colour
//! of their item, and single-product recipes take the colour of their
//! product so a node matches what flows out of it.
//!
//! Classes are unbounded; [`ColorMaps`] reduces them modulo the palette
//! size when a colour is looked up, so graphs with more than
//! [`PALETTE`]`.len()` mutually adjacent items will reuse colours.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::graph::{FlowGraph, RecipeRef};
use crate::models::{ItemId, RecipeId, Registry, Settings};

/// Link and node colours, indexed by colour class modulo its length.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", // blue
    "#8c564b", // brown
    "#2ca02c", // green
    "#d62728", // red
    "#9467bd", // purple
    "#e377c2", // pink
    "#17becf", // cyan
    "#7f7f7f", // gray
    "#bcbd22", // yellow
    "#ff7f0e", // orange
];

/// Per-channel factor applied to a stroke colour to get the node fill.
const DARKER: f64 = 0.7;

/// Colour classes for every item on an edge and every node's recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMaps {
    pub items: HashMap<ItemId, usize>,
    pub recipes: HashMap<RecipeRef, usize>,
}

impl ColorMaps {
    /// Palette colour of an item's links.
    pub fn item_color(&self, item: ItemId) -> Option<&'static str> {
        self.items.get(&item).map(|&c| palette_color(c))
    }

    /// Palette colour of a node's outline.
    pub fn recipe_color(&self, recipe: RecipeRef) -> Option<&'static str> {
        self.recipes.get(&recipe).map(|&c| palette_color(c))
    }
}

/// Reduces a colour class to a palette entry.
pub fn palette_color(class: usize) -> &'static str {
    PALETTE[class % PALETTE.len()]
}

/// Darkens a `#rrggbb` colour for use as a node fill.
///
/// # Example
///
/// ```
/// use prodflow::color::darker;
///
/// assert_eq!(darker("#ffffff"), "#b3b3b3");
/// assert_eq!(darker("#000000"), "#000000");
/// ```
pub fn darker(hex: &str) -> String {
    let channel = |i: usize| {
        let v = hex
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0);
        (f64::from(v) * DARKER).round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(1), channel(3), channel(5))
}

/// Items touching `item` through any recipe that produces, consumes or burns it.
fn item_neighbors(
    item: ItemId,
    registry: &Registry,
    settings: &Settings,
    fuel_links: &HashMap<ItemId, Vec<RecipeId>>,
) -> HashSet<ItemId> {
    let entry = registry.item(item);
    let recipes = entry
        .recipes
        .iter()
        .chain(entry.uses.iter())
        .chain(fuel_links.get(&item).into_iter().flatten());

    let mut touching = HashSet::new();
    for &id in recipes {
        let recipe = registry.recipe(id);
        let fuel = recipe.fuel_ingredients(registry, settings);
        for ing in recipe.ingredients.iter().chain(&recipe.products).chain(&fuel) {
            if ing.item != item {
                touching.insert(ing.item);
            }
        }
    }
    touching
}

/// Assigns colour classes to the items and recipes of `graph`.
///
/// Items are coloured greedily: on every round the uncoloured item whose
/// coloured neighbours already use the most distinct classes is picked and
/// given the smallest class none of them uses. Items start out ordered by
/// degree, which only decides ties.
///
/// Recipes with exactly one product inherit that item's class. Every other
/// node (multi-product recipes and the sinks) draws from a separate counter.
pub fn assign_colors(graph: &FlowGraph, registry: &Registry, settings: &Settings) -> ColorMaps {
    let mut fuel_links: HashMap<ItemId, Vec<RecipeId>> = HashMap::new();
    let mut items: Vec<ItemId> = Vec::new();
    for edge in &graph.edges {
        items.push(edge.item);
        if edge.fuel {
            if let Some(recipe) = graph.nodes[edge.target].recipe.recipe_id() {
                fuel_links.entry(edge.item).or_default().push(recipe);
            }
        }
    }

    let neighbors: HashMap<ItemId, HashSet<ItemId>> = items
        .iter()
        .map(|&item| (item, item_neighbors(item, registry, settings, &fuel_links)))
        .collect();

    items.sort_by(|a, b| neighbors[b].len().cmp(&neighbors[a].len()));
    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(*item));

    let mut item_colors: HashMap<ItemId, usize> = HashMap::new();
    while !items.is_empty() {
        let mut chosen = 0;
        let mut used_colors: Option<HashSet<usize>> = None;
        for (i, item) in items.iter().enumerate() {
            let colors: HashSet<usize> = neighbors[item]
                .iter()
                .filter_map(|n| item_colors.get(n).copied())
                .collect();
            if used_colors.as_ref().map_or(true, |used| colors.len() > used.len()) {
                chosen = i;
                used_colors = Some(colors);
            }
        }
        let used = used_colors.unwrap_or_default();
        let item = items.remove(chosen);
        let color = (0..).find(|c| !used.contains(c)).unwrap_or(0);
        item_colors.insert(item, color);
    }

    let mut recipe_colors = HashMap::new();
    let mut next_recipe_color = 0;
    for node in &graph.nodes {
        let single_product = node.recipe.recipe_id().and_then(|id| {
            let recipe = registry.recipe(id);
            match recipe.products.as_slice() {
                [product] => item_colors.get(&product.item).copied(),
                _ => None,
            }
        });
        let color = single_product.unwrap_or_else(|| {
            next_recipe_color += 1;
            next_recipe_color - 1
        });
        recipe_colors.insert(node.recipe, color);
    }

    debug!(
        items = item_colors.len(),
        classes = item_colors.values().collect::<HashSet<_>>().len(),
        "assigned flow colors"
    );
    ColorMaps {
        items: item_colors,
        recipes: recipe_colors,
    }
}
