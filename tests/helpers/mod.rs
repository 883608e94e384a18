use diesel::SqliteConnection;

use histamine_catalog::admin::{self, FoodNameInput, HistamineInfoInput};
use histamine_catalog::models::CompatibilityScore;
use histamine_catalog::{create_pool, DbPool};

/// Fresh in-memory catalog. One connection, so every checkout sees the same
/// database.
pub fn test_pool() -> DbPool {
    create_pool(":memory:", 1).expect("in-memory pool")
}

#[allow(dead_code)]
pub fn name(language: &str, name: &str, is_primary: bool) -> FoodNameInput {
    FoodNameInput {
        language: language.to_string(),
        name: name.to_string(),
        is_primary,
    }
}

#[allow(dead_code)]
pub struct Apple {
    pub food_id: i32,
    pub fruit_type_id: i32,
    pub source_id: i32,
}

/// Food 1: "Apple" (primary) and "Apples" in English, compatibility score
/// "1", tagged "fruit", citing "SIGHI".
#[allow(dead_code)]
pub fn seed_apple(conn: &mut SqliteConnection) -> Apple {
    let food = admin::create_food(conn).expect("create food");
    admin::add_food_name(conn, food.id, &name("en", "Apple", true)).expect("primary name");
    admin::add_food_name(conn, food.id, &name("en", "Apples", false)).expect("plural name");

    let source = admin::create_information_source(conn, "SIGHI").expect("source");
    admin::create_histamine_info(
        conn,
        food.id,
        &HistamineInfoInput {
            compatibility_score: CompatibilityScore::One,
            information_source_id: Some(source.id),
            ..Default::default()
        },
    )
    .expect("histamine info");

    let fruit = admin::create_food_type(conn, "fruit").expect("food type");
    admin::tag_food(conn, food.id, fruit.id).expect("tag");

    Apple {
        food_id: food.id,
        fruit_type_id: fruit.id,
        source_id: source.id,
    }
}
