//! Tests for scene building, render surfaces and the wasm entry points.

mod common;

use common::{item, registry, totals};
use prodflow::color::{darker, PALETTE};
use prodflow::display::MonospaceMeasure;
use prodflow::error::{Error, Result};
use prodflow::factory::FactoryTable;
use prodflow::models::{BuildTarget, Phase, Settings};
use prodflow::render::{render_graph, JsonSurface, RenderSurface, Scene};
use prodflow::wasm::{get_recipes, get_version, render};
use rust_decimal_macros::dec;
use std::collections::HashMap;

struct FailingSurface;

impl RenderSurface for FailingSurface {
    fn draw(&mut self, _scene: &Scene) -> Result<()> {
        Err(Error::Render {
            message: "no canvas".to_string(),
        })
    }
}

struct RecordingSurface {
    scenes: Vec<Scene>,
}

impl RenderSurface for RecordingSurface {
    fn draw(&mut self, scene: &Scene) -> Result<()> {
        self.scenes.push(scene.clone());
        Ok(())
    }
}

#[test]
fn test_render_graph_draws_once() {
    let reg = registry(
        vec![item("ore", Phase::Solid), item("water", Phase::Fluid)],
        &[("mine", &[], &[("ore", 1)]), ("pump", &[], &[("water", 1)])],
    );
    let mut ignore = HashMap::new();
    ignore.insert("pump".to_string(), true);
    let mut surface = RecordingSurface { scenes: vec![] };

    let (graph, colors) = render_graph(
        &mut surface,
        &reg,
        &totals(&[("mine", dec!(1)), ("pump", dec!(4))], &[]),
        &[
            BuildTarget {
                item: "ore".to_string(),
                rate: dec!(1),
            },
            BuildTarget {
                item: "water".to_string(),
                rate: dec!(4),
            },
        ],
        &ignore,
        &FactoryTable::default(),
        &Settings::default(),
        &MonospaceMeasure::default(),
    )
    .unwrap();

    assert_eq!(surface.scenes.len(), 1);
    let scene = &surface.scenes[0];
    assert_eq!(scene.nodes.len(), graph.nodes.len());
    assert_eq!(scene.links.len(), graph.edges.len());

    assert!(scene.nodes[0].sink);
    assert!(scene.nodes[0].icon.is_none());
    assert!(!scene.nodes[1].ignored);
    assert!(scene.nodes[2].ignored);

    for node in &scene.nodes {
        assert!(PALETTE.contains(&node.stroke.as_str()));
        assert_eq!(node.fill, darker(&node.stroke));
    }

    let water = scene.links.iter().find(|l| l.item == "water").unwrap();
    assert_eq!(water.value, 2.0);
    assert_eq!(water.label, "240/m");
    assert_eq!(Some(water.color.as_str()), colors.item_color(reg.item_id("water").unwrap()));
}

#[test]
fn test_render_graph_propagates_surface_errors() {
    let reg = registry(vec![item("ore", Phase::Solid)], &[("mine", &[], &[("ore", 1)])]);
    let result = render_graph(
        &mut FailingSurface,
        &reg,
        &totals(&[("mine", dec!(1))], &[]),
        &[],
        &HashMap::new(),
        &FactoryTable::default(),
        &Settings::default(),
        &MonospaceMeasure::default(),
    );

    assert!(matches!(result, Err(Error::Render { .. })));
}

#[test]
fn test_json_surface_captures_scene() {
    let reg = registry(vec![item("ore", Phase::Solid)], &[("mine", &[], &[("ore", 1)])]);
    let mut surface = JsonSurface::default();
    render_graph(
        &mut surface,
        &reg,
        &totals(&[("mine", dec!(1))], &[]),
        &[BuildTarget {
            item: "ore".to_string(),
            rate: dec!(1),
        }],
        &HashMap::new(),
        &FactoryTable::default(),
        &Settings::default(),
        &MonospaceMeasure::default(),
    )
    .unwrap();

    let scene = surface.output.unwrap();
    assert_eq!(scene["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(scene["links"][0]["source"], 1);
    assert_eq!(scene["links"][0]["title"], "Mine \u{2192} Output\nOre \u{00d7} 60/m");
    assert_eq!(scene["layout"]["node_padding"], 32.0);
}

#[test]
fn test_wasm_render_with_sample_data() {
    let input = r#"{
        "totals": {
            "totals": {"iron-gear-wheel": 1, "iron-plate": 2, "iron-ore": 2},
            "waste": {}
        },
        "targets": [{"item": "iron-gear-wheel", "rate": 1}],
        "settings": {"rate_unit": "second"},
        "factories": {"crafting": "assembling-machine-2"}
    }"#;
    let result: serde_json::Value = serde_json::from_str(&render(input)).unwrap();

    assert_eq!(result["success"], true);
    let nodes = result["scene"]["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    let gear = nodes.iter().find(|n| n["name"] == "iron-gear-wheel").unwrap();
    assert_eq!(gear["factory"], "assembling-machine-2");
    assert_eq!(result["scene"]["links"].as_array().unwrap().len(), 3);
}

#[test]
fn test_wasm_render_reports_errors() {
    let result: serde_json::Value = serde_json::from_str(&render("not json")).unwrap();
    assert_eq!(result["success"], false);
    assert!(result["error"].as_str().unwrap().starts_with("Invalid input"));

    let unknown = r#"{"totals": {"totals": {"unobtainium": 1}}}"#;
    let result: serde_json::Value = serde_json::from_str(&render(unknown)).unwrap();
    assert_eq!(result["success"], false);
    assert_eq!(result["error"], "Unknown recipe: unobtainium");
}

#[test]
fn test_wasm_render_survives_huge_rates() {
    let input = r#"{
        "totals": {
            "totals": {"iron-gear-wheel": "50000000000000000000000000000", "iron-plate": "1"},
            "waste": {}
        },
        "targets": []
    }"#;
    let result: serde_json::Value = serde_json::from_str(&render(input)).unwrap();

    assert_eq!(result["success"], true);
    let nodes = result["scene"]["nodes"].as_array().unwrap();
    assert!(nodes.iter().any(|n| n["name"] == "iron-gear-wheel"));
    // The gear's plate demand overflows, and nothing produces iron ore.
    assert!(result["scene"]["links"].as_array().unwrap().is_empty());
}

#[test]
fn test_wasm_metadata() {
    assert_eq!(get_version(), env!("CARGO_PKG_VERSION"));
    let recipes: serde_json::Value = serde_json::from_str(&get_recipes()).unwrap();
    let plate = recipes
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "iron-plate")
        .unwrap();
    assert_eq!(plate["factory"], "stone-furnace");
}
