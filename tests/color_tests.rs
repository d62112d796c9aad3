//! Tests for colour class assignment.

mod common;

use common::{item, registry, registry_with_fuel, totals};
use prodflow::color::{assign_colors, palette_color, PALETTE};
use prodflow::data::{load_factories, load_registry, load_totals, parse_targets};
use prodflow::factory::FactoryTable;
use prodflow::graph::{build_graph, RecipeRef};
use prodflow::models::{BuildTarget, Phase, Settings};
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};
use std::path::Path;

fn target(item: &str, rate: rust_decimal::Decimal) -> BuildTarget {
    BuildTarget {
        item: item.to_string(),
        rate,
    }
}

#[test]
fn test_mutually_adjacent_items_get_distinct_classes() {
    let reg = registry(
        vec![item("a", Phase::Solid), item("b", Phase::Solid), item("c", Phase::Solid)],
        &[
            ("mine-a", &[], &[("a", 1)]),
            ("mine-b", &[], &[("b", 1)]),
            ("combine", &[("a", 1), ("b", 1)], &[("c", 1)]),
        ],
    );
    let settings = Settings::default();
    let graph = build_graph(
        &reg,
        &totals(&[("mine-a", dec!(1)), ("mine-b", dec!(1)), ("combine", dec!(1))], &[]),
        &[target("c", dec!(1))],
        &HashMap::new(),
        &FactoryTable::default(),
        &settings,
    );
    let colors = assign_colors(&graph, &reg, &settings);

    let classes: HashSet<usize> = colors.items.values().copied().collect();
    assert_eq!(colors.items.len(), 3);
    assert_eq!(classes, HashSet::from([0, 1, 2]));
}

#[test]
fn test_unrelated_items_share_a_class() {
    let reg = registry(
        vec![item("x", Phase::Solid), item("y", Phase::Solid)],
        &[("make-x", &[], &[("x", 1)]), ("make-y", &[], &[("y", 1)])],
    );
    let settings = Settings::default();
    let graph = build_graph(
        &reg,
        &totals(&[("make-x", dec!(1)), ("make-y", dec!(1))], &[]),
        &[target("x", dec!(1)), target("y", dec!(1))],
        &HashMap::new(),
        &FactoryTable::default(),
        &settings,
    );
    let colors = assign_colors(&graph, &reg, &settings);

    assert_eq!(colors.items.values().collect::<HashSet<_>>().len(), 1);
}

#[test]
fn test_single_product_recipe_matches_its_product() {
    let reg = registry(
        vec![item("ore", Phase::Solid), item("plate", Phase::Solid)],
        &[("mine", &[], &[("ore", 1)]), ("smelt", &[("ore", 1)], &[("plate", 1)])],
    );
    let settings = Settings::default();
    let graph = build_graph(
        &reg,
        &totals(&[("mine", dec!(1)), ("smelt", dec!(1))], &[]),
        &[target("plate", dec!(1))],
        &HashMap::new(),
        &FactoryTable::default(),
        &settings,
    );
    let colors = assign_colors(&graph, &reg, &settings);

    let plate = reg.item_id("plate").unwrap();
    let smelt = RecipeRef::Real(reg.recipe_id("smelt").unwrap());
    assert_eq!(colors.recipes[&smelt], colors.items[&plate]);
    assert_eq!(colors.recipe_color(smelt), colors.item_color(plate));
}

#[test]
fn test_multi_product_recipes_use_separate_counter() {
    let reg = registry(
        vec![
            item("crude", Phase::Fluid),
            item("heavy", Phase::Fluid),
            item("light", Phase::Fluid),
        ],
        &[
            ("pump", &[], &[("crude", 10)]),
            ("refine", &[("crude", 10)], &[("heavy", 1), ("light", 1)]),
        ],
    );
    let settings = Settings::default();
    let graph = build_graph(
        &reg,
        &totals(&[("pump", dec!(1)), ("refine", dec!(1))], &[("heavy", dec!(1))]),
        &[target("light", dec!(1))],
        &HashMap::new(),
        &FactoryTable::default(),
        &settings,
    );
    let colors = assign_colors(&graph, &reg, &settings);

    // Node order: output, surplus, pump, refine.
    assert_eq!(colors.recipes[&RecipeRef::Output], 0);
    assert_eq!(colors.recipes[&RecipeRef::Surplus], 1);
    let refine = RecipeRef::Real(reg.recipe_id("refine").unwrap());
    assert_eq!(colors.recipes[&refine], 2);
}

#[test]
fn test_fuel_use_counts_as_adjacency() {
    let mut coal = item("coal", Phase::Solid);
    coal.fuel_value = Some(dec!(1));
    let reg = registry_with_fuel(
        vec![item("ore", Phase::Solid), item("plate", Phase::Solid), coal],
        &[
            ("mine", &[], &[("ore", 1)]),
            ("coal", &[], &[("coal", 1)]),
            ("smelt", &[("ore", 1)], &[("plate", 1)]),
        ],
        "smelt",
        dec!(1),
    );
    let settings = Settings {
        fuel: Some("coal".to_string()),
        ..Settings::default()
    };
    let graph = build_graph(
        &reg,
        &totals(&[("mine", dec!(1)), ("coal", dec!(1)), ("smelt", dec!(1))], &[]),
        &[target("plate", dec!(1))],
        &HashMap::new(),
        &FactoryTable::default(),
        &settings,
    );
    let colors = assign_colors(&graph, &reg, &settings);

    let coal = colors.items[&reg.item_id("coal").unwrap()];
    let ore = colors.items[&reg.item_id("ore").unwrap()];
    let plate = colors.items[&reg.item_id("plate").unwrap()];
    assert_ne!(coal, ore);
    assert_ne!(coal, plate);
    assert_ne!(ore, plate);
}

#[test]
fn test_hub_leaves_share_one_class() {
    // "hub" touches a, b and c; a, b and c only touch hub. Once hub has a
    // class every leaf sees one used colour, so all leaves share class 1.
    let reg = registry(
        vec![
            item("hub", Phase::Solid),
            item("a", Phase::Solid),
            item("b", Phase::Solid),
            item("c", Phase::Solid),
        ],
        &[
            ("make-hub", &[], &[("hub", 3)]),
            ("make-a", &[("hub", 1)], &[("a", 1)]),
            ("make-b", &[("hub", 1)], &[("b", 1)]),
            ("make-c", &[("hub", 1)], &[("c", 1)]),
        ],
    );
    let settings = Settings::default();
    let graph = build_graph(
        &reg,
        &totals(
            &[
                ("make-hub", dec!(1)),
                ("make-a", dec!(1)),
                ("make-b", dec!(1)),
                ("make-c", dec!(1)),
            ],
            &[],
        ),
        &[target("a", dec!(1)), target("b", dec!(1)), target("c", dec!(1))],
        &HashMap::new(),
        &FactoryTable::default(),
        &settings,
    );
    let colors = assign_colors(&graph, &reg, &settings);

    assert_eq!(colors.items[&reg.item_id("hub").unwrap()], 0);
    for leaf in ["a", "b", "c"] {
        assert_eq!(colors.items[&reg.item_id(leaf).unwrap()], 1);
    }
}

#[test]
fn test_most_constrained_item_is_coloured_first() {
    // Path p1 - p2 - p3 - p4 - p5 - p6, listed as p2, p5, p3, p4, p1, p6.
    // Colouring strictly in that order gives p2 = p5 = 0, p3 = 1 and then
    // p4 sees both and needs a third class. Picking the item with the most
    // coloured neighbours each round colours p4 right after p3 instead.
    let names = ["p1", "p2", "p3", "p4", "p5", "p6"];
    let reg = registry(
        names.iter().map(|n| item(n, Phase::Solid)).collect(),
        &[
            ("src-p1", &[], &[("p1", 1)]),
            ("src-p2", &[], &[("p2", 1)]),
            ("src-p3", &[], &[("p3", 1)]),
            ("src-p4", &[], &[("p4", 1)]),
            ("src-p5", &[], &[("p5", 1)]),
            ("src-p6", &[], &[("p6", 1)]),
            ("p1-to-p2", &[("p1", 1)], &[("p2", 1)]),
            ("p2-to-p3", &[("p2", 1)], &[("p3", 1)]),
            ("p3-to-p4", &[("p3", 1)], &[("p4", 1)]),
            ("p4-to-p5", &[("p4", 1)], &[("p5", 1)]),
            ("p5-to-p6", &[("p5", 1)], &[("p6", 1)]),
        ],
    );
    let settings = Settings::default();
    let sources: Vec<String> = names.iter().map(|n| format!("src-{n}")).collect();
    let active: Vec<(&str, rust_decimal::Decimal)> =
        sources.iter().map(|s| (s.as_str(), dec!(1))).collect();
    let targets: Vec<BuildTarget> = ["p2", "p5", "p3", "p4", "p1", "p6"]
        .iter()
        .map(|n| target(n, dec!(1)))
        .collect();
    let graph = build_graph(
        &reg,
        &totals(&active, &[]),
        &targets,
        &HashMap::new(),
        &FactoryTable::default(),
        &settings,
    );
    let colors = assign_colors(&graph, &reg, &settings);

    let classes: Vec<usize> = names
        .iter()
        .map(|n| colors.items[&reg.item_id(n).unwrap()])
        .collect();
    assert_eq!(classes, vec![1, 0, 1, 0, 1, 0]);
}

#[test]
fn test_palette_wraps_around() {
    assert_eq!(palette_color(0), PALETTE[0]);
    assert_eq!(palette_color(10), PALETTE[0]);
    assert_eq!(palette_color(13), PALETTE[3]);
}

#[test]
fn test_sample_plan_colouring_is_valid_and_deterministic() {
    let data_dir = Path::new("data");
    if !data_dir.exists() {
        return;
    }

    let reg = load_registry(data_dir).expect("Failed to load registry");
    let table = FactoryTable::new(load_factories(data_dir).expect("Failed to load factories"));
    let t = load_totals(&data_dir.join("totals.json")).expect("Failed to load totals");
    let targets = parse_targets("electronic-circuit:1").unwrap();
    let settings = Settings {
        fuel: Some("coal".to_string()),
        ..Settings::default()
    };
    let graph = build_graph(&reg, &t, &targets, &HashMap::new(), &table, &settings);
    let colors = assign_colors(&graph, &reg, &settings);

    for node in &graph.nodes {
        let Some(id) = node.recipe.recipe_id() else {
            continue;
        };
        let recipe = reg.recipe(id);
        let fuel = recipe.fuel_ingredients(&reg, &settings);
        let members: HashSet<_> = recipe
            .ingredients
            .iter()
            .chain(&recipe.products)
            .chain(&fuel)
            .map(|i| i.item)
            .collect();
        let classes: Vec<usize> = members
            .iter()
            .filter_map(|i| colors.items.get(i).copied())
            .filter(|&c| c < PALETTE.len())
            .collect();
        let distinct: HashSet<_> = classes.iter().collect();
        assert_eq!(distinct.len(), classes.len(), "collision in {}", recipe.name);
    }

    assert_eq!(colors, assign_colors(&graph, &reg, &settings));
}
