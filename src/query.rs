use diesel::prelude::*;

use crate::db::casefold;
use crate::dto::{FoodHistamineResponse, FoodResponse};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Food, FoodName, FoodType, FoodTypeRelation, HistamineInfo};
use crate::schema::{
    food_names, food_type_relations, food_types, foods, histamine_infos, information_sources,
};

/// A validated, strictly positive food id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodId(i32);

impl FoodId {
    pub fn new(id: i64) -> CatalogResult<Self> {
        match i32::try_from(id) {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(CatalogError::BadRequest(format!(
                "food id must be a positive integer, got {}",
                id
            ))),
        }
    }

    /// Parses a path segment. Only plain ASCII digits are accepted, no sign
    /// and no surrounding whitespace.
    pub fn parse(raw: &str) -> CatalogResult<Self> {
        let invalid =
            || CatalogError::BadRequest(format!("food id must be a positive integer, got '{}'", raw));
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let id = raw.parse::<i64>().map_err(|_| invalid())?;
        Self::new(id)
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// A trimmed, non-blank name query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery(String);

impl NameQuery {
    pub fn parse(raw: &str) -> CatalogResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::BadRequest("query parameter is required".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn find_all_foods(conn: &mut SqliteConnection) -> CatalogResult<Vec<FoodResponse>> {
    conn.transaction::<_, CatalogError, _>(|conn| {
        let all_foods = foods::table
            .order(foods::id.asc())
            .select(Food::as_select())
            .load(conn)?;
        Ok(project_catalog(conn, all_foods)?)
    })
}

pub fn find_food(conn: &mut SqliteConnection, food_id: FoodId) -> CatalogResult<FoodResponse> {
    log::debug!("looking up food {}", food_id.get());
    conn.transaction::<_, CatalogError, _>(|conn| {
        let food = foods::table
            .find(food_id.get())
            .select(Food::as_select())
            .first(conn)
            .optional()?
            .ok_or_else(|| CatalogError::NotFound("Food not found".to_string()))?;
        single(project_foods(conn, vec![food])?)
    })
}

pub fn find_food_by_name(
    conn: &mut SqliteConnection,
    query: &NameQuery,
) -> CatalogResult<FoodResponse> {
    conn.transaction::<_, CatalogError, _>(|conn| {
        let name = resolve_name(conn, query)?;
        let food = foods::table
            .find(name.food_id)
            .select(Food::as_select())
            .first(conn)?;
        single(project_foods(conn, vec![food])?)
    })
}

pub fn find_histamine_info_by_name(
    conn: &mut SqliteConnection,
    query: &NameQuery,
) -> CatalogResult<FoodHistamineResponse> {
    conn.transaction::<_, CatalogError, _>(|conn| {
        let name = resolve_name(conn, query)?;
        let (info, source) = histamine_infos::table
            .left_join(information_sources::table)
            .filter(histamine_infos::food_id.eq(name.food_id))
            .select((HistamineInfo::as_select(), information_sources::name.nullable()))
            .first::<(HistamineInfo, Option<String>)>(conn)
            .optional()?
            .ok_or_else(|| CatalogError::NotFound("No histamine info available".to_string()))?;
        Ok(FoodHistamineResponse::new(name, info, source))
    })
}

/// Exact, case-insensitive match over names in every language. Ties go to
/// the lowest food id, then to the earliest inserted name.
fn resolve_name(conn: &mut SqliteConnection, query: &NameQuery) -> CatalogResult<FoodName> {
    log::debug!("resolving food name '{}'", query.as_str());
    food_names::table
        .filter(casefold(food_names::name).eq(query.as_str().to_lowercase()))
        .order((food_names::food_id.asc(), food_names::id.asc()))
        .select(FoodName::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| CatalogError::NotFound("Food not found".to_string()))
}

/// Loads names, histamine info and type tags of the given foods with one
/// query per relation. Binds one parameter per food, so it is meant for a
/// handful of foods; whole-catalog listings go through `project_catalog`.
pub fn project_foods(
    conn: &mut SqliteConnection,
    foods: Vec<Food>,
) -> QueryResult<Vec<FoodResponse>> {
    let names = FoodName::belonging_to(&foods)
        .select(FoodName::as_select())
        .order(food_names::id.asc())
        .load::<FoodName>(conn)?;

    let infos = HistamineInfo::belonging_to(&foods)
        .select(HistamineInfo::as_select())
        .load::<HistamineInfo>(conn)?;

    let types = FoodTypeRelation::belonging_to(&foods)
        .inner_join(food_types::table)
        .select((FoodTypeRelation::as_select(), FoodType::as_select()))
        .order(food_type_relations::id.asc())
        .load::<(FoodTypeRelation, FoodType)>(conn)?;

    Ok(assemble(foods, names, infos, types))
}

/// Same projection for every food in the catalog. The related tables are
/// read whole, so the query size does not grow with the number of foods.
pub fn project_catalog(
    conn: &mut SqliteConnection,
    all_foods: Vec<Food>,
) -> QueryResult<Vec<FoodResponse>> {
    let names = food_names::table
        .select(FoodName::as_select())
        .order(food_names::id.asc())
        .load::<FoodName>(conn)?;

    let infos = histamine_infos::table
        .select(HistamineInfo::as_select())
        .order(histamine_infos::food_id.asc())
        .load::<HistamineInfo>(conn)?;

    let types = food_type_relations::table
        .inner_join(food_types::table)
        .select((FoodTypeRelation::as_select(), FoodType::as_select()))
        .order(food_type_relations::id.asc())
        .load::<(FoodTypeRelation, FoodType)>(conn)?;

    Ok(assemble(all_foods, names, infos, types))
}

fn assemble(
    foods: Vec<Food>,
    names: Vec<FoodName>,
    infos: Vec<HistamineInfo>,
    types: Vec<(FoodTypeRelation, FoodType)>,
) -> Vec<FoodResponse> {
    let names = names.grouped_by(&foods);
    let infos = infos.grouped_by(&foods);
    let types = types.grouped_by(&foods);

    foods
        .into_iter()
        .zip(names)
        .zip(infos)
        .zip(types)
        .map(|(((food, names), infos), types)| FoodResponse {
            id: food.id,
            food_names: names.into_iter().map(Into::into).collect(),
            histamine_info: infos.into_iter().next().map(Into::into),
            food_types: types.into_iter().map(|(_, food_type)| food_type.into()).collect(),
        })
        .collect()
}

fn single(mut projected: Vec<FoodResponse>) -> CatalogResult<FoodResponse> {
    projected
        .pop()
        .ok_or_else(|| CatalogError::NotFound("Food not found".to_string()))
}
