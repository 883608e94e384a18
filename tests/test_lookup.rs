use histamine_catalog::admin::{self, HistamineInfoInput};
use histamine_catalog::dto::{FoodNameResponse, FoodTypeResponse};
use histamine_catalog::models::{CompatibilityScore, Ynu};
use diesel::prelude::*;

use histamine_catalog::query::{self, FoodId, NameQuery};
use histamine_catalog::schema::foods;
use histamine_catalog::CatalogError;

mod helpers;
use helpers as h;

#[test]
fn test_find_food_projects_full_aggregate() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    let apple = h::seed_apple(&mut conn);
    assert_eq!(apple.food_id, 1);

    let food = query::find_food(&mut conn, FoodId::new(1).unwrap()).unwrap();

    assert_eq!(food.id, 1);
    assert_eq!(
        food.food_names,
        vec![
            FoodNameResponse {
                language: "en".to_string(),
                name: "Apple".to_string(),
                is_primary: true,
            },
            FoodNameResponse {
                language: "en".to_string(),
                name: "Apples".to_string(),
                is_primary: false,
            },
        ]
    );
    let info = food.histamine_info.expect("histamine info present");
    assert_eq!(info.compatibility_score, CompatibilityScore::One);
    assert_eq!(info.rapid_histamine_formation, Ynu::Unknown);
    assert_eq!(info.other_amines, Ynu::Unknown);
    assert_eq!(info.liberator, Ynu::Unknown);
    assert_eq!(info.blocker, Ynu::Unknown);
    assert_eq!(info.notes, "");
    assert_eq!(
        food.food_types,
        vec![FoodTypeResponse {
            food_type_name: "fruit".to_string()
        }]
    );
}

#[test]
fn test_find_food_unknown_id_is_not_found() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    h::seed_apple(&mut conn);

    let result = query::find_food(&mut conn, FoodId::new(999).unwrap());
    assert!(matches!(result, Err(CatalogError::NotFound(_))));
}

#[test]
fn test_food_without_related_rows_projects_empty() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    let food = admin::create_food(&mut conn).unwrap();

    let projected = query::find_food(&mut conn, FoodId::new(food.id.into()).unwrap()).unwrap();
    assert!(projected.food_names.is_empty());
    assert!(projected.food_types.is_empty());
    // never a record of fabricated defaults
    assert_eq!(projected.histamine_info, None);
}

#[test]
fn test_find_all_foods_keeps_every_related_row() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    let apple = h::seed_apple(&mut conn);

    let pear = admin::create_food(&mut conn).unwrap();
    for (language, text) in [("en", "Pear"), ("de", "Birne"), ("fr", "Poire"), ("en", "Pears")] {
        admin::add_food_name(&mut conn, pear.id, &h::name(language, text, false)).unwrap();
    }
    let raw = admin::create_food_type(&mut conn, "raw").unwrap();
    admin::tag_food(&mut conn, pear.id, apple.fruit_type_id).unwrap();
    admin::tag_food(&mut conn, pear.id, raw.id).unwrap();
    admin::create_food(&mut conn).unwrap();

    let all = query::find_all_foods(&mut conn).unwrap();
    let ids: Vec<i32> = all.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![apple.food_id, pear.id, pear.id + 1]);

    assert_eq!(all[0].food_names.len(), 2);
    assert_eq!(all[1].food_names.len(), 4);
    assert_eq!(all[1].food_names[1].name, "Birne");
    assert_eq!(all[1].histamine_info, None);
    let pear_types: Vec<&str> = all[1]
        .food_types
        .iter()
        .map(|t| t.food_type_name.as_str())
        .collect();
    assert_eq!(pear_types, vec!["fruit", "raw"]);
    assert!(all[2].food_names.is_empty());
    assert!(all[2].food_types.is_empty());
}

#[test]
fn test_find_all_foods_beyond_sqlite_variable_limit() {
    // more foods than SQLite accepts bound parameters in one statement
    const FOOD_COUNT: usize = 33_000;

    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    let apple = h::seed_apple(&mut conn);
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        for _ in 1..FOOD_COUNT {
            diesel::insert_into(foods::table)
                .default_values()
                .execute(conn)?;
        }
        Ok(())
    })
    .unwrap();

    let last = admin::create_food(&mut conn).unwrap();
    admin::add_food_name(&mut conn, last.id, &h::name("en", "Quince", true)).unwrap();
    admin::tag_food(&mut conn, last.id, apple.fruit_type_id).unwrap();

    let all = query::find_all_foods(&mut conn).unwrap();
    assert_eq!(all.len(), FOOD_COUNT + 1);
    assert_eq!(all[0].id, apple.food_id);
    assert_eq!(all[0].food_names.len(), 2);
    assert!(all[0].histamine_info.is_some());

    let quince = all.last().unwrap();
    assert_eq!(quince.id, last.id);
    assert_eq!(quince.food_names[0].name, "Quince");
    assert_eq!(quince.food_types[0].food_type_name, "fruit");
    assert_eq!(quince.histamine_info, None);

    let tagged = all.iter().filter(|f| !f.food_types.is_empty()).count();
    assert_eq!(tagged, 2);
}

#[test]
fn test_find_all_foods_on_empty_catalog() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    assert!(query::find_all_foods(&mut conn).unwrap().is_empty());
}

#[test]
fn test_name_lookup_is_case_insensitive_and_exact() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    h::seed_apple(&mut conn);

    let found = query::find_food_by_name(&mut conn, &NameQuery::parse("apple").unwrap()).unwrap();
    assert_eq!(found.id, 1);

    let found = query::find_food_by_name(&mut conn, &NameQuery::parse("  APPLES ").unwrap()).unwrap();
    assert_eq!(found.id, 1);

    let partial = query::find_food_by_name(&mut conn, &NameQuery::parse("App").unwrap());
    assert!(matches!(partial, Err(CatalogError::NotFound(_))));
}

#[test]
fn test_name_lookup_folds_non_ascii_case() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    let food = admin::create_food(&mut conn).unwrap();
    admin::add_food_name(&mut conn, food.id, &h::name("de", "Äpfel", true)).unwrap();

    let found = query::find_food_by_name(&mut conn, &NameQuery::parse("äPFEL").unwrap()).unwrap();
    assert_eq!(found.id, food.id);
}

#[test]
fn test_name_lookup_prefers_lowest_food_id() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    let first = admin::create_food(&mut conn).unwrap();
    let second = admin::create_food(&mut conn).unwrap();
    // inserted for the later food first so insertion order alone would pick it
    admin::add_food_name(&mut conn, second.id, &h::name("en", "Lime", true)).unwrap();
    admin::add_food_name(&mut conn, first.id, &h::name("de", "Lime", false)).unwrap();

    for _ in 0..3 {
        let found = query::find_food_by_name(&mut conn, &NameQuery::parse("lime").unwrap()).unwrap();
        assert_eq!(found.id, first.id);
    }
}

#[test]
fn test_histamine_lookup_flattens_match() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    h::seed_apple(&mut conn);

    let info =
        query::find_histamine_info_by_name(&mut conn, &NameQuery::parse("apples").unwrap()).unwrap();
    assert_eq!(info.food, "Apples");
    assert_eq!(info.language, "en");
    assert_eq!(info.compatibility_score, CompatibilityScore::One);
    assert_eq!(info.information_source.as_deref(), Some("SIGHI"));
}

#[test]
fn test_histamine_lookup_without_source_reports_none() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    let food = admin::create_food(&mut conn).unwrap();
    admin::add_food_name(&mut conn, food.id, &h::name("en", "Spinach", true)).unwrap();
    admin::create_histamine_info(
        &mut conn,
        food.id,
        &HistamineInfoInput {
            compatibility_score: CompatibilityScore::Three,
            liberator: Ynu::True,
            notes: "high in histamine".to_string(),
            ..Default::default()
        },
    )
    .unwrap();

    let info =
        query::find_histamine_info_by_name(&mut conn, &NameQuery::parse("spinach").unwrap()).unwrap();
    assert_eq!(info.liberator, Ynu::True);
    assert_eq!(info.notes, "high in histamine");
    assert_eq!(info.information_source, None);
}

#[test]
fn test_histamine_lookup_needs_histamine_info() {
    let pool = h::test_pool();
    let mut conn = pool.get().unwrap();
    let food = admin::create_food(&mut conn).unwrap();
    admin::add_food_name(&mut conn, food.id, &h::name("en", "Rice", true)).unwrap();

    let result = query::find_histamine_info_by_name(&mut conn, &NameQuery::parse("rice").unwrap());
    assert!(matches!(result, Err(CatalogError::NotFound(_))));

    let result = query::find_histamine_info_by_name(&mut conn, &NameQuery::parse("bread").unwrap());
    assert!(matches!(result, Err(CatalogError::NotFound(_))));
}

#[test]
fn test_blank_name_query_is_rejected() {
    assert!(matches!(NameQuery::parse(""), Err(CatalogError::BadRequest(_))));
    assert!(matches!(NameQuery::parse("   "), Err(CatalogError::BadRequest(_))));
}
