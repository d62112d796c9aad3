//! Data loading functionality for prodflow.
//!
//! Item, recipe and factory tables are read from CSV files in a data
//! directory; solver output is read from JSON. Each loader also has a
//! `_from_str` variant used for data embedded in the WebAssembly build.

use csv::ReaderBuilder;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    BuildTarget, Factory, FactoryRow, FuelRule, Icon, Ingredient, Item, ItemId, ItemRow,
    ProductionTotals, Recipe, RecipeRow, Registry,
};

/// Parses a `;`-separated list of `item:amount` entries into ingredients.
///
/// Empty entries are skipped so that trailing separators are harmless.
fn parse_ingredients(
    s: &str,
    context: &str,
    item_index: &HashMap<String, ItemId>,
) -> Result<Vec<Ingredient>> {
    let mut result = Vec::new();
    for part in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, amount) = part.split_once(':').ok_or_else(|| Error::InvalidEntry {
            context: context.to_string(),
            entry: part.to_string(),
        })?;
        let amount: Decimal = amount.trim().parse().map_err(|_| Error::InvalidEntry {
            context: context.to_string(),
            entry: part.to_string(),
        })?;
        let name = name.trim();
        let item = *item_index.get(name).ok_or_else(|| Error::UnknownItem {
            name: name.to_string(),
        })?;
        result.push(Ingredient::new(amount, item));
    }
    Ok(result)
}

/// Loads items from CSV text.
///
/// # Arguments
///
/// * `data` - Contents of an items CSV file
///
/// # Returns
///
/// Every item in file order, with empty producer and consumer lists,
/// or an error if the text cannot be parsed.
///
/// # CSV Format
///
/// Expected columns: `name, phase, fuel_value, icon_col, icon_row`
pub fn load_items_from_str(data: &str) -> Result<Vec<Item>> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut items = Vec::new();
    for result in rdr.deserialize() {
        let row: ItemRow = result?;
        items.push(Item {
            name: row.name,
            phase: row.phase,
            fuel_value: row.fuel_value,
            icon: Icon {
                col: row.icon_col,
                row: row.icon_row,
            },
            recipes: Vec::new(),
            uses: Vec::new(),
        });
    }
    Ok(items)
}

/// Loads recipes from CSV text, resolving item names against `items`.
///
/// # Arguments
///
/// * `data` - Contents of a recipes CSV file
/// * `items` - Items loaded by [`load_items_from_str`]; ids are positions in this slice
///
/// # CSV Format
///
/// Expected columns: `name, time, ingredients, products, category, fuel_energy, mining, icon_col, icon_row`
///
/// # Errors
///
/// Returns [`Error::UnknownItem`] if an ingredient or product names an item
/// not present in `items`.
pub fn load_recipes_from_str(data: &str, items: &[Item]) -> Result<Vec<Recipe>> {
    let item_index: HashMap<String, ItemId> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.name.clone(), ItemId(i)))
        .collect();

    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut recipes = Vec::new();
    for result in rdr.deserialize() {
        let row: RecipeRow = result?;
        let ingredients = parse_ingredients(&row.ingredients, &row.name, &item_index)?;
        let products = parse_ingredients(&row.products, &row.name, &item_index)?;
        recipes.push(Recipe {
            name: row.name,
            time: row.time,
            ingredients,
            products,
            category: row.category,
            fuel: row.fuel_energy.map(|energy| FuelRule { energy }),
            mining: row.mining,
            icon: Icon {
                col: row.icon_col,
                row: row.icon_row,
            },
        });
    }
    Ok(recipes)
}

/// Loads factories from CSV text.
///
/// # CSV Format
///
/// Expected columns: `name, category, speed, icon_col, icon_row`
pub fn load_factories_from_str(data: &str) -> Result<Vec<Factory>> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut factories = Vec::new();
    for result in rdr.deserialize() {
        let row: FactoryRow = result?;
        factories.push(Factory {
            name: row.name,
            category: row.category,
            speed: row.speed,
            icon: Icon {
                col: row.icon_col,
                row: row.icon_row,
            },
        });
    }
    Ok(factories)
}

/// Loads the item and recipe registry from a data directory.
///
/// # Arguments
///
/// * `data_dir` - Directory containing `items.csv` and `recipes.csv`
///
/// # Returns
///
/// A [`Registry`] with producers and consumers linked, or an error if either
/// file cannot be read or parsed.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use prodflow::data::load_registry;
///
/// let registry = load_registry(Path::new("data")).unwrap();
/// println!("Loaded {} recipes", registry.recipes().len());
/// ```
pub fn load_registry(data_dir: &Path) -> Result<Registry> {
    let items = load_items_from_str(&fs::read_to_string(data_dir.join("items.csv"))?)?;
    let recipes =
        load_recipes_from_str(&fs::read_to_string(data_dir.join("recipes.csv"))?, &items)?;
    debug!(items = items.len(), recipes = recipes.len(), "loaded registry");
    Ok(Registry::new(items, recipes))
}

/// Loads factories from `factories.csv` in a data directory.
///
/// # Arguments
///
/// * `data_dir` - Directory containing `factories.csv`
///
/// # Returns
///
/// Factories in file order; the first one listed for a category is its
/// default building.
pub fn load_factories(data_dir: &Path) -> Result<Vec<Factory>> {
    load_factories_from_str(&fs::read_to_string(data_dir.join("factories.csv"))?)
}

/// Parses solver output JSON.
///
/// Rates may be given as JSON numbers or as decimal strings.
pub fn load_totals_from_str(data: &str) -> Result<ProductionTotals> {
    Ok(serde_json::from_str(data)?)
}

/// Reads solver output JSON from a file.
///
/// # Arguments
///
/// * `path` - Path to a JSON file with `totals` and `waste` maps
pub fn load_totals(path: &Path) -> Result<ProductionTotals> {
    load_totals_from_str(&fs::read_to_string(path)?)
}

/// Checks that every recipe and item named by `totals` exists in `registry`.
///
/// # Errors
///
/// Returns [`Error::UnknownRecipe`] or [`Error::UnknownItem`] for the first
/// name not found.
pub fn validate_totals(totals: &ProductionTotals, registry: &Registry) -> Result<()> {
    if let Some(name) = totals.totals.keys().find(|n| registry.recipe_id(n).is_none()) {
        return Err(Error::UnknownRecipe { name: name.clone() });
    }
    if let Some(name) = totals.waste.keys().find(|n| registry.item_id(n).is_none()) {
        return Err(Error::UnknownItem { name: name.clone() });
    }
    Ok(())
}

/// Parses build targets of the form `item:rate`, separated by commas.
///
/// # Example
///
/// ```
/// use prodflow::data::parse_targets;
///
/// let targets = parse_targets("electronic-circuit:2, iron-gear-wheel:0.5").unwrap();
/// assert_eq!(targets.len(), 2);
/// assert_eq!(targets[1].item, "iron-gear-wheel");
/// ```
pub fn parse_targets(s: &str) -> Result<Vec<BuildTarget>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|part| {
            let invalid = || Error::InvalidTarget {
                target: part.to_string(),
            };
            let (item, rate) = part.split_once(':').ok_or_else(invalid)?;
            let rate: Decimal = rate.trim().parse().map_err(|_| invalid())?;
            Ok(BuildTarget {
                item: item.trim().to_string(),
                rate,
            })
        })
        .collect()
}
