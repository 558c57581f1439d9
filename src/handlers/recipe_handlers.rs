use actix_web::web::{self, ReqData};
use actix_web::HttpResponse;
use tracing::info;

use crate::db::{get_conn, DbPool};
use crate::error::AppError;
use crate::models::recipe_models::{RecipeAction, RecipeFilter, RecipePayload};
use crate::models::token_models::Claims;
use crate::utils::auth_utils::{check_author_or_staff, current_user};
use crate::utils::recipe_utils::{self, find_recipe, represent_recipe, represent_recipes};

pub async fn list_recipes(
    pool: web::Data<DbPool>,
    query: web::Query<Vec<(String, String)>>,
    claims: Option<ReqData<Claims>>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let viewer = match claims {
        Some(claims) => Some(claims.user_id()?),
        None => None,
    };

    let filter = RecipeFilter::from_pairs(&query)?;
    let recipes = recipe_utils::list_recipes(&mut conn, &filter, viewer)?;
    let body = represent_recipes(&mut conn, RecipeAction::List, recipes, viewer)?;

    Ok(HttpResponse::Ok().json(body))
}

pub async fn get_recipe(
    pool: web::Data<DbPool>,
    recipe_id: web::Path<i32>,
    claims: Option<ReqData<Claims>>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let viewer = match claims {
        Some(claims) => Some(claims.user_id()?),
        None => None,
    };

    let recipe = find_recipe(&mut conn, recipe_id.into_inner())?;
    let body = represent_recipe(&mut conn, RecipeAction::Retrieve, recipe, viewer)?;

    Ok(HttpResponse::Ok().json(body))
}

pub async fn create_recipe(
    pool: web::Data<DbPool>,
    payload: web::Json<RecipePayload>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let author = current_user(&mut conn, &claims)?;

    let recipe = recipe_utils::create_recipe(&mut conn, author.id, &payload)?;
    info!(recipe_id = recipe.id, author_id = author.id, "recipe created");

    let body = represent_recipe(&mut conn, RecipeAction::Create, recipe, Some(author.id))?;
    Ok(HttpResponse::Created().json(body))
}

/// PUT and PATCH share this handler; both replace the whole recipe.
pub async fn update_recipe(
    pool: web::Data<DbPool>,
    recipe_id: web::Path<i32>,
    payload: web::Json<RecipePayload>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let caller = current_user(&mut conn, &claims)?;

    let recipe = find_recipe(&mut conn, recipe_id.into_inner())?;
    check_author_or_staff(&recipe, &caller)?;

    let recipe = recipe_utils::update_recipe(&mut conn, recipe.id, &payload)?;
    info!(recipe_id = recipe.id, user_id = caller.id, "recipe updated");

    let body = represent_recipe(&mut conn, RecipeAction::Update, recipe, Some(caller.id))?;
    Ok(HttpResponse::Ok().json(body))
}

pub async fn delete_recipe(
    pool: web::Data<DbPool>,
    recipe_id: web::Path<i32>,
    claims: ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut conn = get_conn(&pool)?;
    let caller = current_user(&mut conn, &claims)?;

    let recipe = find_recipe(&mut conn, recipe_id.into_inner())?;
    check_author_or_staff(&recipe, &caller)?;

    recipe_utils::delete_recipe(&mut conn, recipe.id)?;
    info!(recipe_id = recipe.id, user_id = caller.id, "recipe deleted");

    Ok(HttpResponse::NoContent().finish())
}
