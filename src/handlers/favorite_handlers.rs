use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web::{self, ReqData};
use actix_web::HttpResponse;
use serde_json::json;
use tracing::info;

use crate::config::Config;
use crate::db::{get_conn, DbPool};
use crate::error::AppError;
use crate::models::recipe_models::RecipeAction;
use crate::models::token_models::Claims;
use crate::utils::auth_utils::current_user;
use crate::utils::engagement_utils;
use crate::utils::recipe_utils::{find_recipe, represent_recipe};
use crate::utils::shopping_list_utils::{aggregate, basket_lines, render_pdf, FILENAME};

pub async fn add_favorite(
    pool: web::Data<DbPool>,
    recipe_id: web::Path<i32>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let user = current_user(&mut conn, &claims)?;
    let recipe = find_recipe(&mut conn, recipe_id.into_inner())?;

    engagement_utils::add_favorite(&mut conn, user.id, recipe.id)?;
    info!(user_id = user.id, recipe_id = recipe.id, "favorite added");

    let body = represent_recipe(&mut conn, RecipeAction::Favorite, recipe, Some(user.id))?;
    Ok(HttpResponse::Created().json(body))
}

pub async fn remove_favorite(
    pool: web::Data<DbPool>,
    recipe_id: web::Path<i32>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let user = current_user(&mut conn, &claims)?;
    let recipe = find_recipe(&mut conn, recipe_id.into_inner())?;

    engagement_utils::remove_favorite(&mut conn, user.id, recipe.id)?;
    info!(user_id = user.id, recipe_id = recipe.id, "favorite removed");
    Ok(HttpResponse::NoContent().finish())
}

pub async fn add_to_shopping_cart(
    pool: web::Data<DbPool>,
    recipe_id: web::Path<i32>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let user = current_user(&mut conn, &claims)?;
    let recipe = find_recipe(&mut conn, recipe_id.into_inner())?;

    engagement_utils::add_to_basket(&mut conn, user.id, recipe.id)?;
    info!(user_id = user.id, recipe_id = recipe.id, "added to shopping cart");

    let body = represent_recipe(&mut conn, RecipeAction::ShoppingCart, recipe, Some(user.id))?;
    Ok(HttpResponse::Created().json(body))
}

pub async fn remove_from_shopping_cart(
    pool: web::Data<DbPool>,
    recipe_id: web::Path<i32>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let user = current_user(&mut conn, &claims)?;
    let recipe = find_recipe(&mut conn, recipe_id.into_inner())?;

    engagement_utils::remove_from_basket(&mut conn, user.id, recipe.id)?;
    info!(user_id = user.id, recipe_id = recipe.id, "removed from shopping cart");
    Ok(HttpResponse::NoContent().finish())
}

/// The caller's basket as a printable shopping list.
pub async fn download_shopping_cart(
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let user = current_user(&mut conn, &claims)?;

    let items = aggregate(basket_lines(&mut conn, user.id)?);
    if items.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({ "detail": "Shopping cart is empty" })));
    }

    let document = render_pdf(&items, config.pdf_font_path.as_deref())?;
    info!(user_id = user.id, items = items.len(), bytes = document.len(), "shopping list rendered");

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(FILENAME.to_string())],
        })
        .body(document))
}
