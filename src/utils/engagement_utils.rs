use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;

use crate::error::AppError;
use crate::models::favorite_models::{NewFavorite, NewShoppingBasket, NewSubscription};
use crate::schema::{favorites, shopping_baskets, subscriptions};

/// A unique index backs every relation, so a second insert of the same pair
/// fails in the store and turns into a conflict here. A target removed since
/// it was looked up trips the foreign key instead.
fn relation_insert_error(err: DieselError, duplicate: &'static str, missing: &'static str) -> AppError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AppError::Conflict(duplicate)
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            AppError::NotFound(missing)
        }
        other => AppError::Database(other),
    }
}

fn not_found_if_nothing(affected: usize, message: &'static str) -> Result<(), AppError> {
    if affected == 0 {
        Err(AppError::NotFound(message))
    } else {
        Ok(())
    }
}

pub fn add_favorite(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> Result<(), AppError> {
    diesel::insert_into(favorites::table)
        .values(&NewFavorite {
            user_id,
            recipe_id,
            added_at: Utc::now().naive_utc(),
        })
        .execute(conn)
        .map_err(|e| relation_insert_error(e, "Recipe is already in favorites", "Recipe not found"))?;
    Ok(())
}

pub fn remove_favorite(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> Result<(), AppError> {
    let affected = diesel::delete(
        favorites::table
            .filter(favorites::user_id.eq(user_id))
            .filter(favorites::recipe_id.eq(recipe_id)),
    )
    .execute(conn)?;
    not_found_if_nothing(affected, "Recipe is not in favorites")
}

pub fn add_to_basket(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> Result<(), AppError> {
    diesel::insert_into(shopping_baskets::table)
        .values(&NewShoppingBasket {
            user_id,
            recipe_id,
            added_at: Utc::now().naive_utc(),
        })
        .execute(conn)
        .map_err(|e| {
            relation_insert_error(e, "Recipe is already in the shopping cart", "Recipe not found")
        })?;
    Ok(())
}

pub fn remove_from_basket(conn: &mut SqliteConnection, user_id: i32, recipe_id: i32) -> Result<(), AppError> {
    let affected = diesel::delete(
        shopping_baskets::table
            .filter(shopping_baskets::user_id.eq(user_id))
            .filter(shopping_baskets::recipe_id.eq(recipe_id)),
    )
    .execute(conn)?;
    not_found_if_nothing(affected, "Recipe is not in the shopping cart")
}

pub fn subscribe(conn: &mut SqliteConnection, follower_id: i32, author_id: i32) -> Result<(), AppError> {
    if follower_id == author_id {
        return Err(AppError::validation("errors", "You cannot subscribe to yourself."));
    }
    diesel::insert_into(subscriptions::table)
        .values(&NewSubscription {
            follower_id,
            author_id,
            created_at: Utc::now().naive_utc(),
        })
        .execute(conn)
        .map_err(|e| relation_insert_error(e, "Already subscribed to this author", "User not found"))?;
    Ok(())
}

pub fn unsubscribe(conn: &mut SqliteConnection, follower_id: i32, author_id: i32) -> Result<(), AppError> {
    let affected = diesel::delete(
        subscriptions::table
            .filter(subscriptions::follower_id.eq(follower_id))
            .filter(subscriptions::author_id.eq(author_id)),
    )
    .execute(conn)?;
    not_found_if_nothing(affected, "Not subscribed to this author")
}

pub fn is_subscribed(conn: &mut SqliteConnection, follower_id: i32, author_id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        subscriptions::table
            .filter(subscriptions::follower_id.eq(follower_id))
            .filter(subscriptions::author_id.eq(author_id)),
    ))
    .get_result(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed".to_string()),
        );
        assert!(matches!(
            relation_insert_error(err, "dup", "gone"),
            AppError::Conflict("dup")
        ));
    }

    #[test]
    fn foreign_key_violation_becomes_not_found() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("FOREIGN KEY constraint failed".to_string()),
        );
        assert!(matches!(
            relation_insert_error(err, "dup", "gone"),
            AppError::NotFound("gone")
        ));
    }

    #[test]
    fn other_store_errors_pass_through() {
        let err = relation_insert_error(DieselError::NotFound, "dup", "gone");
        assert!(matches!(err, AppError::Database(DieselError::NotFound)));
    }

    #[test]
    fn zero_rows_is_not_found() {
        assert!(matches!(not_found_if_nothing(0, "gone"), Err(AppError::NotFound("gone"))));
        assert!(not_found_if_nothing(1, "gone").is_ok());
    }
}
