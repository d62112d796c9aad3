//! WebAssembly bindings for prodflow.
//!
//! This module provides JavaScript-accessible functions that build, colour
//! and describe a flow graph from the bundled sample data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::data::{
    load_factories_from_str, load_items_from_str, load_recipes_from_str, validate_totals,
};
use crate::display::MonospaceMeasure;
use crate::error::Result;
use crate::factory::FactoryTable;
use crate::models::{BuildTarget, ProductionTotals, Registry, Settings};
use crate::render::{render_graph, JsonSurface};

/// JavaScript-friendly input for rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct JsRenderInput {
    pub totals: ProductionTotals,
    #[serde(default)]
    pub targets: Vec<BuildTarget>,
    #[serde(default)]
    pub ignore: HashMap<String, bool>,
    #[serde(default)]
    pub settings: Settings,
    /// category -> factory name
    #[serde(default)]
    pub factories: HashMap<String, String>,
}

/// JavaScript-friendly render result.
#[derive(Debug, Clone, Serialize)]
pub struct JsRenderResult {
    pub success: bool,
    pub error: Option<String>,
    pub scene: Option<serde_json::Value>,
}

impl JsRenderResult {
    fn failure(message: String) -> Self {
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&js_sys::JsString::from(message.as_str()).into());
        JsRenderResult {
            success: false,
            error: Some(message),
            scene: None,
        }
    }
}

/// Registry and factories built from the CSV files bundled into the binary.
fn embedded_data() -> Result<(Registry, FactoryTable)> {
    let items = load_items_from_str(include_str!("../data/items.csv"))?;
    let recipes = load_recipes_from_str(include_str!("../data/recipes.csv"), &items)?;
    let factories = load_factories_from_str(include_str!("../data/factories.csv"))?;
    Ok((Registry::new(items, recipes), FactoryTable::new(factories)))
}

fn render_scene(input: JsRenderInput) -> Result<serde_json::Value> {
    let (registry, mut table) = embedded_data()?;
    for (category, factory) in &input.factories {
        table.set_override(category, factory);
    }
    validate_totals(&input.totals, &registry)?;

    let mut surface = JsonSurface::default();
    render_graph(
        &mut surface,
        &registry,
        &input.totals,
        &input.targets,
        &input.ignore,
        &table,
        &input.settings,
        &MonospaceMeasure::default(),
    )?;
    Ok(surface.output.unwrap_or_default())
}

/// Build the flow graph scene for the given solver output.
///
/// Takes a JSON string input and returns a JSON string result.
#[wasm_bindgen]
pub fn render(input_json: &str) -> String {
    let result = match serde_json::from_str::<JsRenderInput>(input_json) {
        Ok(input) => match render_scene(input) {
            Ok(scene) => JsRenderResult {
                success: true,
                error: None,
                scene: Some(scene),
            },
            Err(e) => JsRenderResult::failure(e.to_string()),
        },
        Err(e) => JsRenderResult::failure(format!("Invalid input: {}", e)),
    };
    serde_json::to_string(&result).unwrap_or_default()
}

/// Get the version of the renderer.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Get the list of bundled recipes with the building each one is assigned.
/// Returns JSON array of recipe names and factories.
#[wasm_bindgen]
pub fn get_recipes() -> String {
    #[derive(Serialize)]
    struct RecipeInfo {
        name: String,
        category: String,
        factory: Option<String>,
    }

    use crate::factory::FactorySpec;

    let Ok((registry, table)) = embedded_data() else {
        return "[]".to_string();
    };
    let recipes: Vec<RecipeInfo> = registry
        .recipes()
        .iter()
        .map(|recipe| RecipeInfo {
            name: recipe.name.clone(),
            category: recipe.category.clone(),
            factory: table.factory(recipe).map(|f| f.name.clone()),
        })
        .collect();

    serde_json::to_string(&recipes).unwrap_or_default()
}
