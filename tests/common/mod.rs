//! Shared fixtures for integration tests.

#![allow(dead_code)]

use prodflow::models::{FuelRule, Icon, Ingredient, Item, Phase, ProductionTotals, Recipe, Registry};
use rust_decimal::Decimal;

/// A recipe as `(name, ingredients, products)` with `item:amount` pairs.
pub type RecipeSpec<'a> = (&'a str, &'a [(&'a str, i64)], &'a [(&'a str, i64)]);

pub fn item(name: &str, phase: Phase) -> Item {
    Item {
        name: name.to_string(),
        phase,
        fuel_value: None,
        icon: Icon::default(),
        recipes: vec![],
        uses: vec![],
    }
}

/// Builds a registry from item names and compact recipe descriptions.
pub fn registry(items: Vec<Item>, recipes: &[RecipeSpec]) -> Registry {
    let id = |name: &str| {
        prodflow::models::ItemId(
            items
                .iter()
                .position(|i| i.name == name)
                .unwrap_or_else(|| panic!("unknown item {name}")),
        )
    };
    let list = |entries: &[(&str, i64)]| -> Vec<Ingredient> {
        entries
            .iter()
            .map(|&(name, amount)| Ingredient::new(Decimal::from(amount), id(name)))
            .collect()
    };
    let recipes = recipes
        .iter()
        .map(|&(name, ingredients, products)| Recipe {
            name: name.to_string(),
            time: Decimal::ONE,
            ingredients: list(ingredients),
            products: list(products),
            category: "crafting".to_string(),
            fuel: None,
            mining: false,
            icon: Icon::default(),
        })
        .collect();
    Registry::new(items, recipes)
}

/// Same as [`registry`] but gives `burner` a fuel rule.
pub fn registry_with_fuel(
    items: Vec<Item>,
    recipes: &[RecipeSpec],
    burner: &str,
    energy: Decimal,
) -> Registry {
    let base = registry(items, recipes);
    let items = base.items().to_vec();
    let recipes = base
        .recipes()
        .iter()
        .cloned()
        .map(|mut r| {
            if r.name == burner {
                r.fuel = Some(FuelRule { energy });
            }
            r
        })
        .collect();
    Registry::new(items, recipes)
}

pub fn totals(totals: &[(&str, Decimal)], waste: &[(&str, Decimal)]) -> ProductionTotals {
    ProductionTotals {
        totals: totals.iter().map(|(n, r)| (n.to_string(), *r)).collect(),
        waste: waste.iter().map(|(n, r)| (n.to_string(), *r)).collect(),
    }
}
