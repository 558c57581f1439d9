use actix_web::web;
use actix_web::HttpResponse;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};

use crate::db::{get_conn, DbPool};
use crate::error::AppError;
use crate::models::catalog_models::{Ingredient, IngredientQuery, Tag};
use crate::schema::{ingredients, tags};

// SQLite LIKE ignores ASCII case, so prefixes are compared with substr.
define_sql_function!(fn substr(value: Text, start: Integer, length: Integer) -> Text);

pub async fn list_tags(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;

    let list = tags::table
        .select(Tag::as_select())
        .order((tags::name, tags::id))
        .load::<Tag>(&mut conn)?;

    Ok(HttpResponse::Ok().json(list))
}

pub async fn get_tag(
    pool: web::Data<DbPool>,
    tag_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;

    let tag = tags::table
        .find(tag_id.into_inner())
        .select(Tag::as_select())
        .first::<Tag>(&mut conn)
        .optional()?
        .ok_or(AppError::NotFound("Tag not found"))?;

    Ok(HttpResponse::Ok().json(tag))
}

/// `?name=` narrows the list to names starting with that exact prefix.
pub async fn list_ingredients(
    pool: web::Data<DbPool>,
    query: web::Query<IngredientQuery>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;

    let mut select = ingredients::table
        .select(Ingredient::as_select())
        .order((ingredients::name, ingredients::id))
        .into_boxed();

    if let Some(prefix) = query.name.as_deref().filter(|p| !p.is_empty()) {
        let length = i32::try_from(prefix.chars().count()).unwrap_or(i32::MAX);
        select = select.filter(substr(ingredients::name, 1, length).eq(prefix.to_string()));
    }

    let list = select.load::<Ingredient>(&mut conn)?;
    Ok(HttpResponse::Ok().json(list))
}

pub async fn get_ingredient(
    pool: web::Data<DbPool>,
    ingredient_id: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;

    let ingredient = ingredients::table
        .find(ingredient_id.into_inner())
        .select(Ingredient::as_select())
        .first::<Ingredient>(&mut conn)
        .optional()?
        .ok_or(AppError::NotFound("Ingredient not found"))?;

    Ok(HttpResponse::Ok().json(ingredient))
}
