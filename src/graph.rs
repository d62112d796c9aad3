//! Production flow graph construction.
//!
//! [`build_graph`] turns solver output into a Sankey-style graph: one sink
//! node for the user's build targets, an optional sink for surplus items,
//! and one node per active recipe. Each edge carries one item from a
//! producing recipe to a consumer, with the consumer's demand split across
//! producers in proportion to how much of the item each one supplies.

use std::collections::HashMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::factory::FactorySpec;
use crate::models::{
    BuildTarget, Ingredient, ItemId, Phase, ProductionTotals, RecipeId, Registry, Settings,
};

/// Node name of the build target sink.
pub const OUTPUT_NODE: &str = "output";
/// Node name of the surplus sink.
pub const SURPLUS_NODE: &str = "surplus";

/// Links carrying fluids are drawn this many times thinner than solids.
const FLUID_DISPLAY_RATIO: f64 = 2.0;

/// Index of a node in [`FlowGraph::nodes`].
pub type NodeId = usize;
/// Index of an edge in [`FlowGraph::edges`].
pub type EdgeId = usize;

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeRef {
    /// A recipe from the registry
    Real(RecipeId),
    /// The sink for configured build targets
    Output,
    /// The sink for unconsumed items
    Surplus,
}

impl RecipeRef {
    pub fn is_sink(&self) -> bool {
        !matches!(self, RecipeRef::Real(_))
    }

    pub fn recipe_id(&self) -> Option<RecipeId> {
        match *self {
            RecipeRef::Real(id) => Some(id),
            _ => None,
        }
    }
}

/// A node of the flow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// "output", "surplus", or the recipe name
    pub name: String,
    /// Standard ingredients; for sinks these are absolute rates
    pub ingredients: Vec<Ingredient>,
    pub recipe: RecipeRef,
    /// Assigned building name
    pub factory: Option<String>,
    /// Buildings needed
    pub count: Decimal,
    /// Executions per second; None for sinks
    pub rate: Option<Decimal>,
}

/// A flow of one item from a producer to a consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub item: ItemId,
    /// Exact items per second
    pub rate: Decimal,
    /// Display width, `rate` compressed for fluids
    pub value: f64,
    /// The item is burned as fuel by the target
    pub fuel: bool,
    /// The source recipe has several products and needs an item label
    pub extra: bool,
}

/// Nodes and edges produced by [`build_graph`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl FlowGraph {
    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Edges ending at `node`.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &GraphEdge)> {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.target == node)
    }

    /// Edges starting at `node`.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &GraphEdge)> {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.source == node)
    }

    /// Edges touching `node` in either direction, outgoing first.
    pub fn incident(&self, node: NodeId) -> Vec<EdgeId> {
        self.outgoing(node)
            .chain(self.incoming(node))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Builds the flow graph for one render.
///
/// * `targets` feed the output sink; unknown target items are skipped.
/// * `totals.waste`, when non-empty, feeds the surplus sink.
/// * Recipes with a zero total are inactive: they get no node and supply
///   nothing.
/// * A flow whose rate overflows is skipped with a warning.
/// * A recipe marked `true` in `ignore` keeps its node but none of its
///   ingredients are drawn, so nothing flows into it.
///
/// # Example
///
/// ```
/// use prodflow::factory::FactoryTable;
/// use prodflow::graph::build_graph;
/// use prodflow::models::{
///     BuildTarget, Icon, Ingredient, Item, Phase, ProductionTotals, Recipe, Registry, Settings,
/// };
/// use rust_decimal::Decimal;
/// use std::collections::HashMap;
///
/// let ore = Item {
///     name: "iron-ore".to_string(),
///     phase: Phase::Solid,
///     fuel_value: None,
///     icon: Icon::default(),
///     recipes: vec![],
///     uses: vec![],
/// };
/// let mine = Recipe {
///     name: "iron-ore".to_string(),
///     time: Decimal::ONE,
///     ingredients: vec![],
///     products: vec![Ingredient::new(Decimal::ONE, prodflow::models::ItemId(0))],
///     category: "mining".to_string(),
///     fuel: None,
///     mining: true,
///     icon: Icon::default(),
/// };
/// let registry = Registry::new(vec![ore], vec![mine]);
///
/// let mut totals = ProductionTotals::default();
/// totals.totals.insert("iron-ore".to_string(), Decimal::TEN);
/// let targets = vec![BuildTarget { item: "iron-ore".to_string(), rate: Decimal::TEN }];
///
/// let graph = build_graph(
///     &registry,
///     &totals,
///     &targets,
///     &HashMap::new(),
///     &FactoryTable::default(),
///     &Settings::default(),
/// );
/// assert_eq!(graph.nodes.len(), 2);
/// assert_eq!(graph.edges.len(), 1);
/// assert_eq!(graph.edges[0].rate, Decimal::TEN);
/// ```
pub fn build_graph(
    registry: &Registry,
    totals: &ProductionTotals,
    targets: &[BuildTarget],
    ignore: &HashMap<String, bool>,
    spec: &dyn FactorySpec,
    settings: &Settings,
) -> FlowGraph {
    let mut nodes = vec![GraphNode {
        name: OUTPUT_NODE.to_string(),
        ingredients: sink_ingredients(
            registry,
            targets.iter().map(|t| (t.item.as_str(), t.rate)),
        ),
        recipe: RecipeRef::Output,
        factory: None,
        count: Decimal::ZERO,
        rate: None,
    }];

    if !totals.waste.is_empty() {
        nodes.push(GraphNode {
            name: SURPLUS_NODE.to_string(),
            ingredients: sink_ingredients(
                registry,
                totals.waste.iter().map(|(name, rate)| (name.as_str(), *rate)),
            ),
            recipe: RecipeRef::Surplus,
            factory: None,
            count: Decimal::ZERO,
            rate: None,
        });
    }

    // Node index of every active recipe, used to find edge sources.
    let mut recipe_nodes: HashMap<RecipeId, NodeId> = HashMap::new();
    for (name, &rate) in &totals.totals {
        if rate.is_zero() {
            continue;
        }
        let Some(id) = registry.recipe_id(name) else {
            warn!(recipe = %name, "skipping unknown recipe in totals");
            continue;
        };
        let recipe = registry.recipe(id);
        recipe_nodes.insert(id, nodes.len());
        nodes.push(GraphNode {
            name: name.clone(),
            ingredients: recipe.ingredients.clone(),
            recipe: RecipeRef::Real(id),
            factory: spec.factory(recipe).map(|f| f.name.clone()),
            count: spec.count(recipe, rate),
            rate: Some(rate),
        });
    }

    let mut edges = Vec::new();
    for (target, node) in nodes.iter().enumerate() {
        let (ingredients, fuel_count) = match node.recipe {
            RecipeRef::Real(id) => {
                let recipe = registry.recipe(id);
                if ignore.get(&recipe.name).copied().unwrap_or(false) {
                    continue;
                }
                let mut ingredients = recipe.fuel_ingredients(registry, settings);
                let fuel_count = ingredients.len();
                ingredients.extend(recipe.ingredients.iter().copied());
                (ingredients, fuel_count)
            }
            RecipeRef::Output | RecipeRef::Surplus => (node.ingredients.clone(), 0),
        };

        for (i, ing) in ingredients.iter().enumerate() {
            let item = registry.item(ing.item);
            let Some(flows) = split_demand(registry, totals, &recipe_nodes, node, ing, settings)
            else {
                warn!(
                    item = %item.name,
                    consumer = %node.name,
                    "skipping flow with overflowing rate"
                );
                continue;
            };

            for (id, sub_rate) in flows {
                let mut value = sub_rate.to_f64().unwrap_or(0.0);
                if item.phase == Phase::Fluid {
                    value /= FLUID_DISPLAY_RATIO;
                }
                edges.push(GraphEdge {
                    source: recipe_nodes[&id],
                    target,
                    item: ing.item,
                    rate: sub_rate,
                    value,
                    fuel: i < fuel_count,
                    extra: registry.recipe(id).product_count() > 1,
                });
            }
        }
    }

    debug!(nodes = nodes.len(), edges = edges.len(), "built flow graph");
    FlowGraph { nodes, edges }
}

/// Splits `consumer`'s demand for one ingredient across the active producers
/// of that item, in proportion to how much of it each one supplies.
///
/// Returns an empty list when nothing supplies the item, and None when a
/// rate overflows.
fn split_demand(
    registry: &Registry,
    totals: &ProductionTotals,
    recipe_nodes: &HashMap<RecipeId, NodeId>,
    consumer: &GraphNode,
    ing: &Ingredient,
    settings: &Settings,
) -> Option<Vec<(RecipeId, Decimal)>> {
    let mut supplies = Vec::new();
    for &id in &registry.item(ing.item).recipes {
        let recipe = registry.recipe(id);
        let Some(rate) = totals.active_rate(&recipe.name) else {
            continue;
        };
        if recipe_nodes.contains_key(&id) {
            supplies.push((id, recipe.gives(ing.item, settings)?.checked_mul(rate)?));
        }
    }

    let total = supplies
        .iter()
        .try_fold(Decimal::ZERO, |acc, &(_, supply)| acc.checked_add(supply))?;
    if total.is_zero() {
        return Some(Vec::new());
    }
    let demand = match (consumer.recipe, consumer.rate) {
        (RecipeRef::Real(_), Some(rate)) => rate.checked_mul(ing.amount)?,
        _ => ing.amount,
    };
    let ratio = demand.checked_div(total)?;

    supplies
        .into_iter()
        .map(|(id, supply)| Some((id, supply.checked_mul(ratio)?)))
        .collect()
}

/// Ingredient list for a sink from `(item name, rate)` pairs.
fn sink_ingredients<'a>(
    registry: &Registry,
    entries: impl Iterator<Item = (&'a str, Decimal)>,
) -> Vec<Ingredient> {
    entries
        .filter_map(|(name, rate)| match registry.item_id(name) {
            Some(item) => Some(Ingredient::new(rate, item)),
            None => {
                warn!(item = %name, "skipping unknown item in sink");
                None
            }
        })
        .collect()
}
