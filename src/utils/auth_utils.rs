use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::error::AppError;
use crate::models::recipe_models::Recipe;
use crate::models::token_models::Claims;
use crate::models::user_models::User;
use crate::schema::users;

/// Resolve the token subject to a user row. A token for a deleted user is
/// treated like no token at all.
pub fn current_user(conn: &mut SqliteConnection, claims: &Claims) -> Result<User, AppError> {
    let user_id = claims.user_id()?;
    users::table
        .find(user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?
        .ok_or(AppError::Unauthorized)
}

/// Check that the recipe belongs to the logged-in user, unless they are staff.
pub fn check_author_or_staff(recipe: &Recipe, caller: &User) -> Result<(), AppError> {
    if recipe.author_id == caller.id || caller.is_staff {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
