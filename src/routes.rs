use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::db::DbPool;
use crate::error::CatalogError;
use crate::query::{self, FoodId, NameQuery};

#[derive(Debug, Deserialize)]
pub struct NameLookupParams {
    pub query: Option<String>,
}

#[get("/api/foods")]
async fn list_foods(pool: web::Data<DbPool>) -> Result<HttpResponse, CatalogError> {
    let foods = web::block(move || {
        let mut conn = pool.get()?;
        query::find_all_foods(&mut conn)
    })
    .await??;
    Ok(HttpResponse::Ok().json(foods))
}

//path segment is validated here so a bad id never reaches the store
#[get("/api/foods/{food_id}")]
async fn get_food(
    food_id: web::Path<String>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, CatalogError> {
    let food_id = FoodId::parse(&food_id)?;
    let food = web::block(move || {
        let mut conn = pool.get()?;
        query::find_food(&mut conn, food_id)
    })
    .await??;
    Ok(HttpResponse::Ok().json(food))
}

#[get("/api/food-histamine-info")]
async fn food_histamine_info(
    params: web::Query<NameLookupParams>,
    pool: web::Data<DbPool>,
) -> Result<HttpResponse, CatalogError> {
    let name = NameQuery::parse(params.query.as_deref().unwrap_or_default())?;
    let info = web::block(move || {
        let mut conn = pool.get()?;
        query::find_histamine_info_by_name(&mut conn, &name)
    })
    .await??;
    Ok(HttpResponse::Ok().json(info))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_foods)
        .service(get_food)
        .service(food_histamine_info);
}
