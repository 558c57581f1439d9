use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::error::AppError;
use crate::models::recipe_models::{Recipe, RecipeAction};
use crate::models::user_models::{SubscriptionResponse, User, UserResponse};
use crate::schema::{recipes, subscriptions, users};
use crate::utils::recipe_utils::represent_recipes;

pub fn find_user(conn: &mut SqliteConnection, user_id: i32) -> Result<User, AppError> {
    users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(AppError::NotFound("User not found"))
}

/// An author seen by one of their followers: newest recipes first, cut to
/// `limit` when given, with the uncut count alongside.
pub fn subscription_view(
    conn: &mut SqliteConnection,
    author: &User,
    limit: Option<usize>,
) -> Result<SubscriptionResponse, AppError> {
    let recipes_count: i64 = recipes::table
        .filter(recipes::author_id.eq(author.id))
        .count()
        .get_result(conn)?;

    let mut query = recipes::table
        .filter(recipes::author_id.eq(author.id))
        .select(Recipe::as_select())
        .order((recipes::pub_date.desc(), recipes::id.desc()))
        .into_boxed();
    if let Some(limit) = limit {
        query = query.limit(i64::try_from(limit).unwrap_or(i64::MAX));
    }
    let authored: Vec<Recipe> = query.load(conn)?;

    Ok(SubscriptionResponse {
        author: UserResponse::new(author, true),
        recipes: represent_recipes(conn, RecipeAction::Subscriptions, authored, None)?,
        recipes_count,
    })
}

/// Authors the follower subscribes to, oldest subscription first.
pub fn list_subscriptions(
    conn: &mut SqliteConnection,
    follower_id: i32,
    limit: Option<usize>,
) -> Result<Vec<SubscriptionResponse>, AppError> {
    let authors: Vec<User> = subscriptions::table
        .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
        .filter(subscriptions::follower_id.eq(follower_id))
        .order(subscriptions::id)
        .select(User::as_select())
        .load(conn)?;

    authors
        .iter()
        .map(|author| subscription_view(conn, author, limit))
        .collect()
}
