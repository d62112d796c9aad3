//! Building assignment for recipe nodes.
//!
//! The graph builder asks a [`FactorySpec`] which building runs a recipe and
//! how many of them a given run-rate needs. [`FactoryTable`] is the stock
//! implementation backed by `factories.csv`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{Factory, Recipe};

/// Resolves buildings for recipes.
pub trait FactorySpec {
    /// The building assigned to `recipe`, if any serves its category.
    fn factory(&self, recipe: &Recipe) -> Option<&Factory>;

    /// Buildings needed to execute `recipe` `rate` times per second.
    /// Zero when no building is assigned; saturates at [`Decimal::MAX`].
    fn count(&self, recipe: &Recipe, rate: Decimal) -> Decimal;
}

/// Factory list with optional per-category overrides.
///
/// # Example
///
/// ```
/// use prodflow::factory::{FactorySpec, FactoryTable};
/// use prodflow::models::{Factory, Icon, Recipe};
/// use rust_decimal::Decimal;
///
/// let table = FactoryTable::new(vec![Factory {
///     name: "assembling-machine-1".to_string(),
///     category: "crafting".to_string(),
///     speed: Decimal::new(5, 1),
///     icon: Icon::default(),
/// }]);
/// let recipe = Recipe {
///     name: "iron-gear-wheel".to_string(),
///     time: Decimal::new(5, 1),
///     ingredients: vec![],
///     products: vec![],
///     category: "crafting".to_string(),
///     fuel: None,
///     mining: false,
///     icon: Icon::default(),
/// };
///
/// // 3 runs/s * 0.5 s / 0.5 speed = 3 machines
/// assert_eq!(table.count(&recipe, Decimal::from(3)), Decimal::from(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FactoryTable {
    factories: Vec<Factory>,
    /// category -> factory name
    overrides: HashMap<String, String>,
}

impl FactoryTable {
    pub fn new(factories: Vec<Factory>) -> Self {
        FactoryTable {
            factories,
            overrides: HashMap::new(),
        }
    }

    /// Uses the factory called `factory` for `category` instead of the first
    /// one listed.
    pub fn set_override(&mut self, category: &str, factory: &str) {
        self.overrides
            .insert(category.to_string(), factory.to_string());
    }

    /// Applies `category=factory` entries, as given on the command line.
    /// Malformed entries are skipped with a warning.
    pub fn apply_overrides<I>(&mut self, entries: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for entry in entries {
            let entry = entry.as_ref();
            match entry.split_once('=') {
                Some((category, factory)) => self.set_override(category.trim(), factory.trim()),
                None => warn!(entry = %entry, "ignoring malformed factory override"),
            }
        }
    }

    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }
}

impl FactorySpec for FactoryTable {
    fn factory(&self, recipe: &Recipe) -> Option<&Factory> {
        let mut candidates = self
            .factories
            .iter()
            .filter(|f| f.category == recipe.category);
        match self.overrides.get(&recipe.category) {
            Some(name) => candidates.find(|f| &f.name == name),
            None => candidates.next(),
        }
    }

    fn count(&self, recipe: &Recipe, rate: Decimal) -> Decimal {
        match self.factory(recipe) {
            Some(factory) if !factory.speed.is_zero() => rate
                .checked_mul(recipe.time)
                .and_then(|work| work.checked_div(factory.speed))
                .map_or(Decimal::MAX, |count| count.ceil()),
            _ => Decimal::ZERO,
        }
    }
}
