//! Data models and structures for prodflow.
//!
//! This module contains the registries of items and recipes, the solver
//! output consumed by the graph builder, and the display settings shared
//! by every stage of a render.

use std::collections::HashMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Index of an [`Item`] inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub usize);

/// Index of a [`Recipe`] inside a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeId(pub usize);

/// Physical phase of an item. Fluids are drawn with thinner links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Solid,
    Fluid,
}

/// Position of an icon on the sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Icon {
    pub col: u32,
    pub row: u32,
}

/// A named resource that recipes consume and produce.
#[derive(Debug, Clone)]
pub struct Item {
    /// The name of the item (e.g., "iron-plate", "petroleum-gas")
    pub name: String,
    /// Solid or fluid
    pub phase: Phase,
    /// Energy released when burned as fuel, in MJ (None = not a fuel)
    pub fuel_value: Option<Decimal>,
    /// Sprite sheet position
    pub icon: Icon,
    /// Recipes producing this item
    pub recipes: Vec<RecipeId>,
    /// Recipes consuming this item as a regular ingredient
    pub uses: Vec<RecipeId>,
}

/// An item together with an amount.
///
/// For recipes the amount is per execution; for the output and surplus sinks
/// it is an absolute rate per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ingredient {
    pub item: ItemId,
    pub amount: Decimal,
}

impl Ingredient {
    pub fn new(amount: Decimal, item: ItemId) -> Self {
        Ingredient { item, amount }
    }
}

/// Extra fuel input required by a recipe's building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuelRule {
    /// Energy burned per execution, in MJ
    pub energy: Decimal,
}

/// A production rule converting ingredients into products.
///
/// # Example
///
/// ```
/// use prodflow::models::{Icon, Ingredient, ItemId, Recipe, Settings};
/// use rust_decimal::Decimal;
///
/// let recipe = Recipe {
///     name: "iron-gear-wheel".to_string(),
///     time: Decimal::new(5, 1),
///     ingredients: vec![Ingredient::new(Decimal::TWO, ItemId(0))],
///     products: vec![Ingredient::new(Decimal::ONE, ItemId(1))],
///     category: "crafting".to_string(),
///     fuel: None,
///     mining: false,
///     icon: Icon::default(),
/// };
///
/// let settings = Settings::default();
/// assert_eq!(recipe.gives(ItemId(1), &settings), Some(Decimal::ONE));
/// assert_eq!(recipe.gives(ItemId(0), &settings), Some(Decimal::ZERO));
/// ```
#[derive(Debug, Clone)]
pub struct Recipe {
    /// The name of the recipe
    pub name: String,
    /// Seconds per execution at crafting speed 1
    pub time: Decimal,
    /// Inputs per execution, in order
    pub ingredients: Vec<Ingredient>,
    /// Outputs per execution, in order
    pub products: Vec<Ingredient>,
    /// Building category used to assign a factory
    pub category: String,
    /// Fuel consumption, for recipes made in burner buildings
    pub fuel: Option<FuelRule>,
    /// Whether mining productivity applies
    pub mining: bool,
    /// Sprite sheet position
    pub icon: Icon,
}

impl Recipe {
    /// Returns how many of `item` one execution yields under `settings`.
    ///
    /// None when the yield overflows.
    pub fn gives(&self, item: ItemId, settings: &Settings) -> Option<Decimal> {
        let base = self
            .products
            .iter()
            .filter(|p| p.item == item)
            .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.amount))?;
        if self.mining {
            base.checked_mul(Decimal::ONE.checked_add(settings.mining_productivity)?)
        } else {
            Some(base)
        }
    }

    /// Evaluates the fuel rule against the currently selected fuel.
    ///
    /// Returns an empty list when the recipe burns nothing, when no fuel is
    /// selected, or when the selected item has no usable fuel value.
    pub fn fuel_ingredients(&self, registry: &Registry, settings: &Settings) -> Vec<Ingredient> {
        let Some(rule) = self.fuel else {
            return Vec::new();
        };
        let Some(fuel) = settings.fuel.as_deref().and_then(|name| registry.item_id(name)) else {
            return Vec::new();
        };
        registry
            .item(fuel)
            .fuel_value
            .and_then(|value| rule.energy.checked_div(value))
            .map(|amount| vec![Ingredient::new(amount, fuel)])
            .unwrap_or_default()
    }

    /// Number of distinct product items.
    pub fn product_count(&self) -> usize {
        let mut seen: Vec<ItemId> = Vec::with_capacity(self.products.len());
        for p in &self.products {
            if !seen.contains(&p.item) {
                seen.push(p.item);
            }
        }
        seen.len()
    }
}

/// A building that executes recipes of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    pub name: String,
    pub category: String,
    /// Crafting speed multiplier
    pub speed: Decimal,
    pub icon: Icon,
}

/// Name-keyed store of every known item and recipe.
///
/// Items and recipes are addressed by [`ItemId`] / [`RecipeId`]; producer and
/// consumer back-links on each item are filled in by [`Registry::new`].
#[derive(Debug, Clone, Default)]
pub struct Registry {
    items: Vec<Item>,
    recipes: Vec<Recipe>,
    item_index: HashMap<String, ItemId>,
    recipe_index: HashMap<String, RecipeId>,
}

impl Registry {
    /// Builds a registry and links every item to the recipes that produce and
    /// consume it.
    pub fn new(mut items: Vec<Item>, recipes: Vec<Recipe>) -> Self {
        for item in &mut items {
            item.recipes.clear();
            item.uses.clear();
        }
        for (i, recipe) in recipes.iter().enumerate() {
            let id = RecipeId(i);
            for ing in &recipe.ingredients {
                let uses = &mut items[ing.item.0].uses;
                if !uses.contains(&id) {
                    uses.push(id);
                }
            }
            for prod in &recipe.products {
                let producers = &mut items[prod.item.0].recipes;
                if !producers.contains(&id) {
                    producers.push(id);
                }
            }
        }
        let item_index = items
            .iter()
            .enumerate()
            .map(|(i, item)| (item.name.clone(), ItemId(i)))
            .collect();
        let recipe_index = recipes
            .iter()
            .enumerate()
            .map(|(i, recipe)| (recipe.name.clone(), RecipeId(i)))
            .collect();
        Registry {
            items,
            recipes,
            item_index,
            recipe_index,
        }
    }

    pub fn item(&self, id: ItemId) -> &Item {
        &self.items[id.0]
    }

    pub fn recipe(&self, id: RecipeId) -> &Recipe {
        &self.recipes[id.0]
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.item_index.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_index.get(name).copied()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }
}

/// Solver output: run-rate per recipe and leftover rate per item.
///
/// Both maps keep the order the solver emitted them in, which fixes node
/// order in the resulting graph.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ProductionTotals {
    /// Executions per second, keyed by recipe name
    #[serde(default)]
    pub totals: IndexMap<String, Decimal>,
    /// Unconsumed items per second, keyed by item name
    #[serde(default)]
    pub waste: IndexMap<String, Decimal>,
}

impl ProductionTotals {
    /// Run-rate of an active recipe. Zero totals count as inactive.
    pub fn active_rate(&self, recipe: &str) -> Option<Decimal> {
        self.totals.get(recipe).copied().filter(|r| !r.is_zero())
    }
}

/// A top-level demand configured by the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuildTarget {
    pub item: String,
    /// Items per second
    pub rate: Decimal,
}

/// Time unit rates are displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateUnit {
    Second,
    #[default]
    Minute,
    Hour,
}

impl RateUnit {
    /// Short suffix shown after rates ("/m").
    pub fn name(&self) -> &'static str {
        match self {
            RateUnit::Second => "s",
            RateUnit::Minute => "m",
            RateUnit::Hour => "h",
        }
    }

    /// Seconds per unit.
    pub fn multiplier(&self) -> Decimal {
        match self {
            RateUnit::Second => Decimal::ONE,
            RateUnit::Minute => Decimal::from(60),
            RateUnit::Hour => Decimal::from(3600),
        }
    }
}

impl std::str::FromStr for RateUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" | "second" => Ok(RateUnit::Second),
            "m" | "minute" => Ok(RateUnit::Minute),
            "h" | "hour" => Ok(RateUnit::Hour),
            other => Err(format!("unknown rate unit: {other}")),
        }
    }
}

/// Global display settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Item burned by buildings with a fuel rule
    pub fuel: Option<String>,
    /// Bonus output fraction for mining recipes (0.1 = +10%)
    pub mining_productivity: Decimal,
    pub rate_unit: RateUnit,
    /// Decimal places for rates
    pub rate_precision: u32,
    /// Decimal places for building counts
    pub count_precision: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            fuel: None,
            mining_productivity: Decimal::ZERO,
            rate_unit: RateUnit::default(),
            rate_precision: 3,
            count_precision: 1,
        }
    }
}

// ============================================================================
// CSV Row Structures
// ============================================================================

/// CSV row structure for items.
#[derive(Debug, Deserialize)]
pub struct ItemRow {
    pub name: String,
    pub phase: Phase,
    /// Fuel value in MJ (optional)
    pub fuel_value: Option<Decimal>,
    pub icon_col: u32,
    pub icon_row: u32,
}

/// CSV row structure for recipes.
#[derive(Debug, Deserialize)]
pub struct RecipeRow {
    pub name: String,
    pub time: Decimal,
    /// `item:amount` entries separated by `;`
    pub ingredients: String,
    /// `item:amount` entries separated by `;`
    pub products: String,
    pub category: String,
    /// MJ burned per execution (optional)
    pub fuel_energy: Option<Decimal>,
    #[serde(default)]
    pub mining: bool,
    pub icon_col: u32,
    pub icon_row: u32,
}

/// CSV row structure for factories.
#[derive(Debug, Deserialize)]
pub struct FactoryRow {
    pub name: String,
    pub category: String,
    pub speed: Decimal,
    pub icon_col: u32,
    pub icon_row: u32,
}
