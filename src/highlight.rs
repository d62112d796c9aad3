//! Hover and click state for a drawn flow graph.
//!
//! Hovering a node highlights it and every edge touching it. An edge can be
//! shared by two hovered nodes, so each edge keeps a count of the nodes
//! currently highlighting it and stays lit while that count is non-zero.

use std::collections::HashMap;

use crate::graph::{EdgeId, FlowGraph, NodeId};
use crate::models::Registry;

/// Highlight counters for one rendered graph.
///
/// # Example
///
/// ```
/// use prodflow::graph::{FlowGraph, GraphEdge, GraphNode, RecipeRef};
/// use prodflow::highlight::HighlightState;
/// use prodflow::models::ItemId;
/// use rust_decimal::Decimal;
///
/// let node = |name: &str, recipe| GraphNode {
///     name: name.to_string(),
///     ingredients: vec![],
///     recipe,
///     factory: None,
///     count: Decimal::ZERO,
///     rate: None,
/// };
/// let graph = FlowGraph {
///     nodes: vec![node("output", RecipeRef::Output), node("surplus", RecipeRef::Surplus)],
///     edges: vec![GraphEdge {
///         source: 1,
///         target: 0,
///         item: ItemId(0),
///         rate: Decimal::ONE,
///         value: 1.0,
///         fuel: false,
///         extra: false,
///     }],
/// };
///
/// let mut state = HighlightState::new(&graph);
/// state.hover_enter(0);
/// state.hover_enter(1);
/// state.hover_leave(0);
/// assert!(state.is_edge_highlighted(0));
/// state.hover_leave(1);
/// assert!(!state.is_edge_highlighted(0));
/// ```
#[derive(Debug, Clone)]
pub struct HighlightState {
    /// Edges touching each node
    node_edges: Vec<Vec<EdgeId>>,
    /// Whether each node is currently hovered
    nodes: Vec<bool>,
    /// Number of hovered nodes lighting each edge
    edges: Vec<u32>,
}

impl HighlightState {
    pub fn new(graph: &FlowGraph) -> Self {
        HighlightState {
            node_edges: (0..graph.nodes.len()).map(|n| graph.incident(n)).collect(),
            nodes: vec![false; graph.nodes.len()],
            edges: vec![0; graph.edges.len()],
        }
    }

    /// Marks `node` hovered. Repeated calls without a leave have no effect.
    pub fn hover_enter(&mut self, node: NodeId) {
        match self.nodes.get_mut(node) {
            Some(hovered) if !*hovered => *hovered = true,
            _ => return,
        }
        for &edge in &self.node_edges[node] {
            self.edges[edge] += 1;
        }
    }

    /// Clears the hover on `node`.
    pub fn hover_leave(&mut self, node: NodeId) {
        match self.nodes.get_mut(node) {
            Some(hovered) if *hovered => *hovered = false,
            _ => return,
        }
        for &edge in &self.node_edges[node] {
            self.edges[edge] = self.edges[edge].saturating_sub(1);
        }
    }

    pub fn is_node_highlighted(&self, node: NodeId) -> bool {
        self.nodes.get(node).copied().unwrap_or(false)
    }

    pub fn is_edge_highlighted(&self, edge: EdgeId) -> bool {
        self.edges.get(edge).is_some_and(|&count| count > 0)
    }

    /// Edges currently lit, in index order.
    pub fn highlighted_edges(&self) -> Vec<EdgeId> {
        (0..self.edges.len())
            .filter(|&e| self.is_edge_highlighted(e))
            .collect()
    }
}

/// Recipe name a click on `node` refers to. Sinks are not clickable.
pub fn click(graph: &FlowGraph, registry: &Registry, node: NodeId) -> Option<String> {
    let recipe = graph.nodes.get(node)?.recipe.recipe_id()?;
    Some(registry.recipe(recipe).name.clone())
}

/// Flips whether `recipe` is ignored, returning the new state.
///
/// # Example
///
/// ```
/// use prodflow::highlight::toggle_ignore;
/// use std::collections::HashMap;
///
/// let mut ignore = HashMap::new();
/// assert!(toggle_ignore(&mut ignore, "iron-plate"));
/// assert!(!toggle_ignore(&mut ignore, "iron-plate"));
/// ```
pub fn toggle_ignore(ignore: &mut HashMap<String, bool>, recipe: &str) -> bool {
    let entry = ignore.entry(recipe.to_string()).or_insert(false);
    *entry = !*entry;
    *entry
}
