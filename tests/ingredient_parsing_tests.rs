//! # Ingredient Parsing Tests
//!
//! End-to-end checks of the parser and unit converter through the public API.

use bakehouse::ingredient_parser::{parse_ingredient, parse_ingredient_list};
use bakehouse::unit_converter::convert_to_grams;

#[test]
fn test_sifted_flour_line() {
    let result = parse_ingredient("2 1/4 cups all-purpose flour, sifted");

    assert_eq!(result.quantity, Some(2.25));
    assert_eq!(result.unit.as_deref(), Some("cups"));
    assert_eq!(result.ingredient_name, "all-purpose flour");
    assert_eq!(result.prep_notes.as_deref(), Some("sifted"));
    assert!(result.is_flour);

    let grams = result.unit_grams.unwrap();
    assert!((grams - 281.34).abs() < 0.01, "got {grams}");
}

#[test]
fn test_conversion_is_linear_in_quantity() {
    let cases = [
        ("cup", "all-purpose flour"),
        ("tbsp", "honey"),
        ("T", "butter"),
        ("oz", "chocolate chips"),
        ("lb", "anything at all"),
        ("ml", "whole milk"),
        ("stick", "unsalted butter"),
    ];

    for quantity in [0.25, 1.0, 3.5] {
        for (unit, name) in cases {
            let single = convert_to_grams(quantity, unit, name).unwrap();
            let double = convert_to_grams(2.0 * quantity, unit, name).unwrap();
            assert!(
                (double - 2.0 * single).abs() < 1e-9,
                "{quantity} {unit} {name}: {double} != 2 * {single}"
            );
        }
    }
}

#[test]
fn test_round_trip_through_display() {
    let lines = [
        "2 1/4 cups all-purpose flour",
        "500 g bread flour",
        "1.5 tsp instant yeast",
        "3 T olive oil",
        "1 stick butter",
        "½ cup whole milk",
        "12 oz dark chocolate",
    ];

    for line in lines {
        let first = parse_ingredient(line);
        let second = parse_ingredient(&first.to_string());
        assert_eq!(first.quantity, second.quantity, "quantity for {line}");
        assert_eq!(first.unit, second.unit, "unit for {line}");
        assert_eq!(first.ingredient_name, second.ingredient_name, "name for {line}");
    }
}

#[test]
fn test_unit_grams_only_with_quantity() {
    let recipe = parse_ingredient_list(
        "salt to taste\n\
         a dash of vanilla extract\n\
         cup of sugar\n\
         2 cups sugar\n\
         4 eggs\n\
         olive oil, as needed",
    );

    for ingredient in &recipe {
        if ingredient.unit_grams.is_some() {
            assert!(ingredient.quantity.is_some(), "{}", ingredient.raw_text);
        }
    }

    assert_eq!(recipe[2].unit.as_deref(), Some("cup"));
    assert_eq!(recipe[2].unit_grams, None);
    assert_eq!(recipe[4].unit_grams, Some(200.0));
    assert_eq!(recipe[5].prep_notes.as_deref(), Some("as needed"));
    assert_eq!(recipe[5].ingredient_name, "olive oil");
}

#[test]
fn test_realistic_recipe() {
    let text = r#"
    1 cup (2 sticks) unsalted butter, softened
    3/4 cup granulated sugar
    3/4 cup packed brown sugar
    2 large eggs
    2 tsp vanilla extract
    2 1/4 cups flour
    1 tsp baking soda
    1 tsp salt
    2 cups chocolate chips
    "#;

    let recipe = parse_ingredient_list(text);
    assert_eq!(recipe.len(), 9);

    assert_eq!(recipe[0].ingredient_name, "(2 sticks) unsalted butter");
    assert_eq!(recipe[0].prep_notes.as_deref(), Some("softened"));
    assert!(recipe[0].unit_grams.is_some());

    assert_eq!(recipe[3].ingredient_name, "large eggs");
    assert_eq!(recipe[3].unit_grams, Some(100.0));

    let flour = &recipe[5];
    assert!(flour.is_flour);
    assert!((flour.unit_grams.unwrap() - 281.34).abs() < 0.01);

    assert!(recipe.iter().filter(|i| i.is_flour).count() == 1);
    assert!(recipe.iter().all(|i| i.unit_grams.is_some()));
}
