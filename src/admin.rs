//! Administrative writes. Every operation validates its input, runs in a
//! single transaction and leaves uniqueness to the schema, so a rejected
//! write never leaves a partial change behind.

use std::collections::HashMap;

use diesel::prelude::*;
use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    CompatibilityScore, Food, FoodName, FoodType, FoodTypeRelation, HistamineInfo,
    InformationSource, NewFoodName, NewFoodType, NewFoodTypeRelation, NewHistamineInfo,
    NewInformationSource, Ynu,
};
use crate::schema::{
    food_names, food_type_relations, food_types, foods, histamine_infos, information_sources,
};

pub const MAX_LANGUAGE_LEN: usize = 5;
pub const MAX_FOOD_NAME_LEN: usize = 250;
pub const MAX_SOURCE_NAME_LEN: usize = 50;
pub const MAX_FOOD_TYPE_LEN: usize = 250;

pub const NO_PRIMARY_NAME: &str = "(no primary name)";

#[derive(Debug, Clone, Deserialize)]
pub struct FoodNameInput {
    pub language: String,
    pub name: String,
    #[serde(default)]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistamineInfoInput {
    pub compatibility_score: CompatibilityScore,
    pub rapid_histamine_formation: Ynu,
    pub other_amines: Ynu,
    pub liberator: Ynu,
    pub blocker: Ynu,
    pub notes: String,
    pub information_source_id: Option<i32>,
}

impl HistamineInfoInput {
    fn to_row(&self, food_id: i32) -> NewHistamineInfo<'_> {
        NewHistamineInfo {
            food_id,
            compatibility_score: self.compatibility_score,
            rapid_histamine_formation: self.rapid_histamine_formation,
            other_amines: self.other_amines,
            liberator: self.liberator,
            blocker: self.blocker,
            notes: &self.notes,
            information_source_id: self.information_source_id,
        }
    }
}

/// One row of the admin food list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodOverview {
    pub id: i32,
    pub primary_name: String,
}

fn clean_text<'a>(field: &str, value: &'a str, max_len: usize) -> CatalogResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CatalogError::BadRequest(format!("{field} must not be blank")));
    }
    if value.chars().count() > max_len {
        return Err(CatalogError::BadRequest(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value)
}

fn ensure_food(conn: &mut SqliteConnection, food_id: i32) -> CatalogResult<()> {
    let found = foods::table
        .find(food_id)
        .select(foods::id)
        .first::<i32>(conn)
        .optional()?;
    found
        .map(|_| ())
        .ok_or_else(|| CatalogError::NotFound(format!("Food {food_id} not found")))
}

fn ensure_deleted(affected: usize, what: &str, id: i32) -> CatalogResult<()> {
    if affected == 0 {
        return Err(CatalogError::NotFound(format!("{what} {id} not found")));
    }
    Ok(())
}

pub fn create_food(conn: &mut SqliteConnection) -> CatalogResult<Food> {
    let food = diesel::insert_into(foods::table)
        .default_values()
        .returning(Food::as_returning())
        .get_result(conn)?;
    info!("created food {}", food.id);
    Ok(food)
}

/// Deletes the food together with its names, histamine info and type tags.
pub fn delete_food(conn: &mut SqliteConnection, food_id: i32) -> CatalogResult<()> {
    let affected = diesel::delete(foods::table.find(food_id)).execute(conn)?;
    ensure_deleted(affected, "Food", food_id)?;
    info!("deleted food {}", food_id);
    Ok(())
}

pub fn add_food_name(
    conn: &mut SqliteConnection,
    food_id: i32,
    input: &FoodNameInput,
) -> CatalogResult<FoodName> {
    let language = clean_text("language", &input.language, MAX_LANGUAGE_LEN)?;
    let name = clean_text("name", &input.name, MAX_FOOD_NAME_LEN)?;

    let food_name = conn.transaction::<_, CatalogError, _>(|conn| {
        ensure_food(conn, food_id)?;
        Ok(diesel::insert_into(food_names::table)
            .values(NewFoodName {
                food_id,
                language,
                name,
                is_primary: input.is_primary,
            })
            .returning(FoodName::as_returning())
            .get_result(conn)?)
    })?;
    info!("added name '{}' ({}) to food {}", food_name.name, food_name.language, food_id);
    Ok(food_name)
}

pub fn delete_food_name(conn: &mut SqliteConnection, food_name_id: i32) -> CatalogResult<()> {
    let affected = diesel::delete(food_names::table.find(food_name_id)).execute(conn)?;
    ensure_deleted(affected, "Food name", food_name_id)
}

pub fn create_information_source(
    conn: &mut SqliteConnection,
    name: &str,
) -> CatalogResult<InformationSource> {
    let name = clean_text("information source name", name, MAX_SOURCE_NAME_LEN)?;
    let source = diesel::insert_into(information_sources::table)
        .values(NewInformationSource { name })
        .returning(InformationSource::as_returning())
        .get_result(conn)?;
    info!("created information source '{}'", source.name);
    Ok(source)
}

/// Histamine records citing the source keep existing with no source.
pub fn delete_information_source(conn: &mut SqliteConnection, source_id: i32) -> CatalogResult<()> {
    let affected = diesel::delete(information_sources::table.find(source_id)).execute(conn)?;
    ensure_deleted(affected, "Information source", source_id)
}

fn ensure_source(conn: &mut SqliteConnection, source_id: Option<i32>) -> CatalogResult<()> {
    let Some(source_id) = source_id else {
        return Ok(());
    };
    information_sources::table
        .find(source_id)
        .select(information_sources::id)
        .first::<i32>(conn)
        .optional()?
        .map(|_| ())
        .ok_or_else(|| CatalogError::NotFound(format!("Information source {source_id} not found")))
}

pub fn create_histamine_info(
    conn: &mut SqliteConnection,
    food_id: i32,
    input: &HistamineInfoInput,
) -> CatalogResult<HistamineInfo> {
    let created = conn.transaction::<_, CatalogError, _>(|conn| {
        ensure_food(conn, food_id)?;
        ensure_source(conn, input.information_source_id)?;
        Ok(diesel::insert_into(histamine_infos::table)
            .values(input.to_row(food_id))
            .returning(HistamineInfo::as_returning())
            .get_result(conn)?)
    })?;
    info!(
        "created histamine info for food {} (score {})",
        food_id, created.compatibility_score
    );
    Ok(created)
}

pub fn update_histamine_info(
    conn: &mut SqliteConnection,
    food_id: i32,
    input: &HistamineInfoInput,
) -> CatalogResult<HistamineInfo> {
    let updated = conn.transaction::<_, CatalogError, _>(|conn| {
        ensure_source(conn, input.information_source_id)?;
        diesel::update(histamine_infos::table.find(food_id))
            .set(input.to_row(food_id))
            .returning(HistamineInfo::as_returning())
            .get_result(conn)
            .optional()?
            .ok_or_else(|| {
                CatalogError::NotFound(format!("No histamine info for food {food_id}"))
            })
    })?;
    info!("updated histamine info for food {}", food_id);
    Ok(updated)
}

pub fn create_food_type(conn: &mut SqliteConnection, name: &str) -> CatalogResult<FoodType> {
    let name = clean_text("food type name", name, MAX_FOOD_TYPE_LEN)?;
    let food_type = diesel::insert_into(food_types::table)
        .values(NewFoodType { name })
        .returning(FoodType::as_returning())
        .get_result(conn)?;
    info!("created food type '{}'", food_type.name);
    Ok(food_type)
}

/// Removes the type and every tag that used it.
pub fn delete_food_type(conn: &mut SqliteConnection, food_type_id: i32) -> CatalogResult<()> {
    let affected = diesel::delete(food_types::table.find(food_type_id)).execute(conn)?;
    ensure_deleted(affected, "Food type", food_type_id)
}

pub fn tag_food(
    conn: &mut SqliteConnection,
    food_id: i32,
    food_type_id: i32,
) -> CatalogResult<FoodTypeRelation> {
    conn.transaction::<_, CatalogError, _>(|conn| {
        ensure_food(conn, food_id)?;
        food_types::table
            .find(food_type_id)
            .select(food_types::id)
            .first::<i32>(conn)
            .optional()?
            .ok_or_else(|| CatalogError::NotFound(format!("Food type {food_type_id} not found")))?;
        Ok(diesel::insert_into(food_type_relations::table)
            .values(NewFoodTypeRelation {
                food_id,
                food_type_id,
            })
            .returning(FoodTypeRelation::as_returning())
            .get_result(conn)?)
    })
}

pub fn untag_food(conn: &mut SqliteConnection, food_id: i32, food_type_id: i32) -> CatalogResult<()> {
    let affected = diesel::delete(
        food_type_relations::table
            .filter(food_type_relations::food_id.eq(food_id))
            .filter(food_type_relations::food_type_id.eq(food_type_id)),
    )
    .execute(conn)?;
    if affected == 0 {
        return Err(CatalogError::NotFound(format!(
            "Food {food_id} is not tagged with type {food_type_id}"
        )));
    }
    Ok(())
}

/// The first primary name of the food in any language, or a placeholder.
pub fn primary_name(conn: &mut SqliteConnection, food_id: i32) -> CatalogResult<String> {
    let name = food_names::table
        .filter(food_names::food_id.eq(food_id))
        .filter(food_names::is_primary.eq(true))
        .order(food_names::id.asc())
        .select(food_names::name)
        .first::<String>(conn)
        .optional()?;
    Ok(name.unwrap_or_else(|| NO_PRIMARY_NAME.to_string()))
}

pub fn food_overview(conn: &mut SqliteConnection) -> CatalogResult<Vec<FoodOverview>> {
    conn.transaction::<_, CatalogError, _>(|conn| {
        let ids = foods::table
            .order(foods::id.asc())
            .select(foods::id)
            .load::<i32>(conn)?;
        let mut primaries: HashMap<i32, String> = HashMap::new();
        for (food_id, name) in food_names::table
            .filter(food_names::is_primary.eq(true))
            .order(food_names::id.asc())
            .select((food_names::food_id, food_names::name))
            .load::<(i32, String)>(conn)?
        {
            // earliest primary name wins
            primaries.entry(food_id).or_insert(name);
        }

        Ok(ids
            .into_iter()
            .map(|id| FoodOverview {
                id,
                primary_name: primaries
                    .remove(&id)
                    .unwrap_or_else(|| NO_PRIMARY_NAME.to_string()),
            })
            .collect())
    })
}
